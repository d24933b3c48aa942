use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::models::AppConfig;
use crate::cli::GridArgs;
use crate::error::{CliError, Result};
use nalgebra::Point3;
use nngrid::core::grid::kernel::KernelMode;
use nngrid::workflows::grid::GridOutputs;

pub fn build_config(args: &GridArgs) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };

    let mut file_config = apply_set_values(file_config, &args.set_values)?;
    let grid_file = file_config.grid.take().unwrap_or_default();

    let center = match &args.center {
        Some(coords) => Some(point_from_slice(coords)?),
        None => grid_file.center.map(|[x, y, z]| Point3::new(x, y, z)),
    };
    let dimension = args
        .dimension
        .or(grid_file.dimension)
        .unwrap_or(defaults.dimension);
    let resolution = args
        .resolution
        .or(grid_file.resolution)
        .unwrap_or(defaults.resolution);
    let binary = args.binary || grid_file.binary.unwrap_or(defaults.binary);
    let kernel = if binary {
        KernelMode::Binary
    } else {
        KernelMode::Smoothed
    };

    if args.no_binmap && !args.map {
        return Err(CliError::Argument(
            "--no-binmap without --map leaves nothing to write".to_string(),
        ));
    }

    Ok(AppConfig {
        receptor_path: args.receptor.clone(),
        ligand_path: args.ligand.clone(),
        center,
        dimension,
        resolution,
        kernel,
        types_path: args
            .types
            .clone()
            .or_else(|| file_config.types.and_then(|t| t.path)),
        receptor_map_path: args.receptor_map.clone().or(file_config.receptor_map),
        ligand_map_path: args.ligand_map.clone().or(file_config.ligand_map),
        outputs: GridOutputs {
            base: args.output.clone(),
            binmaps: !args.no_binmap,
            maps: args.map,
        },
    })
}

fn point_from_slice(coords: &[f64]) -> Result<Point3<f64>> {
    match coords {
        [x, y, z] => Ok(Point3::new(*x, *y, *z)),
        _ => Err(CliError::Argument(format!(
            "--center takes exactly three coordinates, got {}",
            coords.len()
        ))),
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value_str: &str, kind: &str) -> Result<T> {
    value_str.trim().parse().map_err(|_| {
        CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value_str))
    })
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };

        let grid = config.grid.get_or_insert_with(Default::default);
        match key {
            "grid.dimension" => grid.dimension = Some(parse_value(key, value_str, "float")?),
            "grid.resolution" => grid.resolution = Some(parse_value(key, value_str, "float")?),
            "grid.binary" => grid.binary = Some(parse_value(key, value_str, "boolean")?),
            "grid.center" => {
                let coords = value_str
                    .split(',')
                    .map(|c| parse_value(key, c, "float"))
                    .collect::<Result<Vec<f64>>>()?;
                let [x, y, z] = coords[..] else {
                    return Err(CliError::Config(format!(
                        "Invalid value for {}: expected X,Y,Z, got '{}'",
                        key, value_str
                    )));
                };
                grid.center = Some([x, y, z]);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn base_grid_args() -> GridArgs {
        GridArgs {
            receptor: PathBuf::from("rec.bgf"),
            ligand: PathBuf::from("lig.bgf"),
            output: "out".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn build_config_uses_defaults_without_file_or_flags() {
        let app = build_config(&base_grid_args()).expect("build ok");
        let defaults = DefaultsConfig::default();

        assert_eq!(app.center, None);
        assert_eq!(app.dimension, defaults.dimension);
        assert_eq!(app.resolution, defaults.resolution);
        assert_eq!(app.kernel, KernelMode::Smoothed);
        assert_eq!(app.types_path, None);
        assert_eq!(
            app.outputs,
            GridOutputs {
                base: "out".to_string(),
                binmaps: true,
                maps: false,
            }
        );
    }

    #[test]
    fn build_config_reads_file_and_cli_overrides_it() {
        let dir = tempdir().unwrap();
        let cfg_path = dir.path().join("run.toml");
        let toml = r#"
            ligand-map = "lig.map"

            [grid]
            center = [1.0, 2.0, 3.0]
            dimension = 16.0
            resolution = 1.0
            binary = true

            [types]
            path = "types.toml"
            "#;
        fs::write(&cfg_path, toml).unwrap();

        let mut args = base_grid_args();
        args.config = Some(cfg_path);
        args.resolution = Some(0.25);
        args.receptor_map = Some(PathBuf::from("rec.map"));

        let app = build_config(&args).expect("build ok");
        assert_eq!(app.center, Some(Point3::new(1.0, 2.0, 3.0)));
        assert_eq!(app.dimension, 16.0);
        assert_eq!(app.resolution, 0.25);
        assert_eq!(app.kernel, KernelMode::Binary);
        assert_eq!(app.types_path, Some(PathBuf::from("types.toml")));
        assert_eq!(app.receptor_map_path, Some(PathBuf::from("rec.map")));
        assert_eq!(app.ligand_map_path, Some(PathBuf::from("lig.map")));
    }

    #[test]
    fn cli_center_overrides_file_center() {
        let mut args = base_grid_args();
        args.center = Some(vec![-1.0, 0.5, 4.0]);
        args.set_values = vec!["grid.center=9,9,9".to_string()];

        let app = build_config(&args).expect("build ok");
        assert_eq!(app.center, Some(Point3::new(-1.0, 0.5, 4.0)));
    }

    #[test]
    fn set_values_override() {
        let mut args = base_grid_args();
        args.set_values = vec![
            "grid.dimension=12".to_string(),
            "grid.resolution=0.375".to_string(),
            "grid.binary=true".to_string(),
            "grid.center=1, 2, 3".to_string(),
        ];

        let app = build_config(&args).expect("build ok");
        assert_eq!(app.dimension, 12.0);
        assert_eq!(app.resolution, 0.375);
        assert_eq!(app.kernel, KernelMode::Binary);
        assert_eq!(app.center, Some(Point3::new(1.0, 2.0, 3.0)));
    }

    #[test]
    fn set_values_reject_unknown_keys_and_bad_values() {
        let mut args = base_grid_args();
        args.set_values = vec!["grid.spacing=0.5".to_string()];
        assert!(matches!(build_config(&args), Err(CliError::Config(_))));

        args.set_values = vec!["grid.resolution".to_string()];
        assert!(matches!(build_config(&args), Err(CliError::Config(_))));

        args.set_values = vec!["grid.center=1,2".to_string()];
        assert!(matches!(build_config(&args), Err(CliError::Config(_))));
    }

    #[test]
    fn disabling_every_output_is_rejected() {
        let mut args = base_grid_args();
        args.no_binmap = true;
        assert!(matches!(build_config(&args), Err(CliError::Argument(_))));

        args.map = true;
        let app = build_config(&args).expect("build ok");
        assert!(!app.outputs.binmaps);
        assert!(app.outputs.maps);
    }
}
