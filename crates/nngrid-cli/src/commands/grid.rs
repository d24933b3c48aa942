use crate::cli::GridArgs;
use crate::config::{self, AppConfig};
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use nalgebra::Point3;
use nngrid::{
    core::io::{
        bgf::BgfStructureReader,
        traits::{SourceError, StructureSource},
    },
    core::models::{
        atom::{Atom, centroid},
        type_map::TypeMap,
        types::AtomTypeTable,
    },
    engine::progress::ProgressReporter,
    workflows::grid::{self as grid_workflow, GridJob},
};
use std::path::Path;
use tracing::info;

pub fn run(args: GridArgs) -> Result<()> {
    let app = config::build_config(&args)?;

    let table = load_type_table(&app)?;
    let receptor_map = load_type_map(&table, app.receptor_map_path.as_deref())?;
    let ligand_map = load_type_map(&table, app.ligand_map_path.as_deref())?;

    info!("Loading receptor from {:?}", &app.receptor_path);
    let receptor_atoms = read_first_structure(&app.receptor_path, &table)?;

    let center = match app.center {
        Some(center) => center,
        None => ligand_center(&app.ligand_path, &table)?,
    };
    let grid_config = app.grid_config(center)?;
    info!(
        "Grid centered at ({:.3}, {:.3}, {:.3}), side {} Å, resolution {} Å.",
        center.x, center.y, center.z, app.dimension, app.resolution
    );

    let ligands = BgfStructureReader::open(&app.ligand_path, &table)?;
    let job = GridJob {
        table: &table,
        receptor_atoms: &receptor_atoms,
        receptor_map,
        ligand_map,
        ligands,
    };

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    let summary = grid_workflow::run(&grid_config, job, &app.outputs, &reporter)?;

    if summary.poses == 0 {
        println!("Warning: no ligand poses were read from {}.", app.ligand_path.display());
    } else {
        println!(
            "Gridded {} pose(s) with grid parameters {}; wrote {} file(s).",
            summary.poses,
            summary.parameter_summary,
            summary.files.len()
        );
    }

    Ok(())
}

fn load_type_table(app: &AppConfig) -> Result<AtomTypeTable> {
    match &app.types_path {
        Some(path) => {
            info!("Loading atom type table from {:?}", path);
            AtomTypeTable::load(path).map_err(|e| CliError::FileParsing {
                path: path.clone(),
                source: e.into(),
            })
        }
        None => Ok(AtomTypeTable::xs_default()),
    }
}

fn load_type_map(table: &AtomTypeTable, path: Option<&Path>) -> Result<TypeMap> {
    match path {
        Some(path) => TypeMap::load(table, path).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        }),
        None => Ok(TypeMap::identity(table.len())),
    }
}

fn parse_error(path: &Path, e: SourceError) -> CliError {
    CliError::FileParsing {
        path: path.to_path_buf(),
        source: e.into(),
    }
}

fn read_first_structure(path: &Path, table: &AtomTypeTable) -> Result<Vec<Atom>> {
    let mut reader = BgfStructureReader::open(path, table)?;
    reader
        .next_structure()
        .map_err(|e| parse_error(path, e))?
        .ok_or_else(|| CliError::Argument(format!("{} holds no structure", path.display())))
}

fn ligand_center(path: &Path, table: &AtomTypeTable) -> Result<Point3<f64>> {
    let atoms = read_first_structure(path, table)?;
    let center = centroid(&atoms).ok_or_else(|| {
        CliError::Argument(format!(
            "cannot center the grid on {}: its first pose has no typed atoms; pass --center",
            path.display()
        ))
    })?;
    info!("No center given; using the first ligand pose centroid.");
    Ok(center)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn atom_line(serial: usize, x: f64, y: f64, z: f64, ff_type: &str) -> String {
        format!(
            "HETATM {:>5} {:<5} {:<3} {:1} {:<5}{:>10.5}{:>10.5}{:>10.5} {:<5}{:>3}{:>2} {:>8.5}",
            serial, "C1", "LIG", "X", "444", x, y, z, ff_type, 1, 0, 0.0
        )
    }

    fn write_bgf(path: &Path, structures: &[Vec<(f64, f64, f64, &str)>]) {
        let mut text = String::new();
        for atoms in structures {
            for (i, (x, y, z, t)) in atoms.iter().enumerate() {
                text.push_str(&atom_line(i + 1, *x, *y, *z, t));
                text.push('\n');
            }
            text.push_str("END\n");
        }
        fs::write(path, text).unwrap();
    }

    #[test]
    fn run_grids_every_ligand_pose() {
        let dir = tempdir().unwrap();
        let receptor = dir.path().join("rec.bgf");
        let ligand = dir.path().join("lig.bgf");
        write_bgf(
            &receptor,
            &[vec![(0.0, 0.0, 0.0, "C_H")]],
        );
        write_bgf(
            &ligand,
            &[
                vec![(1.0, 0.0, 0.0, "O_A")],
                vec![(-1.0, 0.0, 0.0, "O_A")],
            ],
        );
        let base = dir.path().join("out").to_string_lossy().to_string();

        let args = GridArgs {
            receptor,
            ligand,
            output: base.clone(),
            dimension: Some(4.0),
            resolution: Some(1.0),
            ..Default::default()
        };
        run(args).unwrap();

        for pose in 1..=2 {
            let path = PathBuf::from(format!("{base}_{pose}.5.56.binmap"));
            let len = fs::metadata(&path).unwrap().len();
            assert_eq!(len, 125 * 56 * 4);
        }
        assert!(!PathBuf::from(format!("{base}_3.5.56.binmap")).exists());
    }

    #[test]
    fn ligand_center_is_first_pose_centroid() {
        let dir = tempdir().unwrap();
        let ligand = dir.path().join("lig.bgf");
        write_bgf(
            &ligand,
            &[
                vec![
                    (1.0, 2.0, 3.0, "O_A"),
                    (3.0, 2.0, 1.0, "N_P"),
                ],
                vec![(50.0, 50.0, 50.0, "N_P")],
            ],
        );
        let table = AtomTypeTable::xs_default();
        assert_eq!(
            ligand_center(&ligand, &table).unwrap(),
            Point3::new(2.0, 2.0, 2.0)
        );
    }

    #[test]
    fn empty_receptor_file_is_rejected() {
        let dir = tempdir().unwrap();
        let receptor = dir.path().join("rec.bgf");
        fs::write(&receptor, "").unwrap();
        let table = AtomTypeTable::xs_default();
        assert!(matches!(
            read_first_structure(&receptor, &table),
            Err(CliError::Argument(_))
        ));
    }

    #[test]
    fn missing_type_map_file_is_reported_with_its_path() {
        let table = AtomTypeTable::xs_default();
        let path = PathBuf::from("/nonexistent/receptor.map");
        match load_type_map(&table, Some(&path)) {
            Err(CliError::FileParsing { path: p, .. }) => assert_eq!(p, path),
            other => panic!("unexpected result: {:?}", other.map(|m| m.channel_count())),
        }
    }
}
