pub struct DefaultsConfig {
    pub dimension: f64,
    pub resolution: f64,
    pub binary: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            dimension: 24.0,
            resolution: 0.5,
            binary: false,
        }
    }
}
