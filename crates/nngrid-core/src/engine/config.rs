use crate::core::grid::geometry::GridGeometry;
use crate::core::grid::kernel::KernelMode;
use nalgebra::Point3;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for '{parameter}': {reason}")]
    Invalid {
        parameter: &'static str,
        reason: String,
    },
}

/// Placement and sampling of the grid shared by both sides of a session.
#[derive(Debug, Clone, PartialEq)]
pub struct GridConfig {
    pub center: Point3<f64>,
    /// Edge length of the cube in Angstroms.
    pub side_length: f64,
    /// Spacing between neighbouring sample points in Angstroms.
    pub resolution: f64,
    pub kernel: KernelMode,
}

impl GridConfig {
    /// Cells per axis: the side length in resolution units, rounded.
    pub fn cell_count(&self) -> usize {
        (self.side_length / self.resolution).round() as usize
    }

    pub fn geometry(&self) -> GridGeometry {
        GridGeometry::centered(&self.center, self.cell_count(), self.resolution)
    }
}

#[derive(Default)]
pub struct GridConfigBuilder {
    center: Option<Point3<f64>>,
    side_length: Option<f64>,
    resolution: Option<f64>,
    kernel: Option<KernelMode>,
}

impl GridConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn center(mut self, center: Point3<f64>) -> Self {
        self.center = Some(center);
        self
    }
    pub fn side_length(mut self, side_length: f64) -> Self {
        self.side_length = Some(side_length);
        self
    }
    pub fn resolution(mut self, resolution: f64) -> Self {
        self.resolution = Some(resolution);
        self
    }
    pub fn kernel(mut self, kernel: KernelMode) -> Self {
        self.kernel = Some(kernel);
        self
    }
    pub fn binary(self, binary: bool) -> Self {
        self.kernel(if binary {
            KernelMode::Binary
        } else {
            KernelMode::Smoothed
        })
    }

    pub fn build(self) -> Result<GridConfig, ConfigError> {
        let config = GridConfig {
            center: self.center.ok_or(ConfigError::MissingParameter("center"))?,
            side_length: self
                .side_length
                .ok_or(ConfigError::MissingParameter("side_length"))?,
            resolution: self
                .resolution
                .ok_or(ConfigError::MissingParameter("resolution"))?,
            kernel: self.kernel.unwrap_or_default(),
        };
        validate(&config)?;
        Ok(config)
    }
}

fn validate(config: &GridConfig) -> Result<(), ConfigError> {
    if !config.center.iter().all(|c| c.is_finite()) {
        return Err(ConfigError::Invalid {
            parameter: "center",
            reason: format!("coordinates must be finite, got {:?}", config.center),
        });
    }
    if !(config.resolution.is_finite() && config.resolution > 0.0) {
        return Err(ConfigError::Invalid {
            parameter: "resolution",
            reason: format!("must be positive, got {}", config.resolution),
        });
    }
    if !(config.side_length.is_finite() && config.side_length > 0.0) {
        return Err(ConfigError::Invalid {
            parameter: "side_length",
            reason: format!("must be positive, got {}", config.side_length),
        });
    }
    if config.cell_count() == 0 {
        return Err(ConfigError::Invalid {
            parameter: "side_length",
            reason: format!(
                "{} is less than one cell at resolution {}",
                config.side_length, config.resolution
            ),
        });
    }
    Ok(())
}
