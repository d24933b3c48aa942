use nalgebra::Point3;
use nngrid::core::grid::kernel::KernelMode;
use nngrid::engine::config::{ConfigError, GridConfig, GridConfigBuilder};
use nngrid::workflows::grid::GridOutputs;
use std::path::PathBuf;

/// Fully merged run settings: CLI flags over the config file over defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub receptor_path: PathBuf,
    pub ligand_path: PathBuf,
    /// `None` means the grid is centered on the first ligand pose.
    pub center: Option<Point3<f64>>,
    pub dimension: f64,
    pub resolution: f64,
    pub kernel: KernelMode,
    pub types_path: Option<PathBuf>,
    pub receptor_map_path: Option<PathBuf>,
    pub ligand_map_path: Option<PathBuf>,
    pub outputs: GridOutputs,
}

impl AppConfig {
    pub fn grid_config(&self, center: Point3<f64>) -> Result<GridConfig, ConfigError> {
        GridConfigBuilder::new()
            .center(center)
            .side_length(self.dimension)
            .resolution(self.resolution)
            .kernel(self.kernel)
            .build()
    }
}
