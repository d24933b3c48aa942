use crate::core::io::traits::StructureSource;
use crate::core::models::atom::Atom;
use crate::core::models::type_map::TypeMap;
use crate::core::models::types::AtomTypeTable;
use crate::engine::config::GridConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::session::GridSession;
use std::path::PathBuf;
use tracing::{info, instrument, warn};

/// Inputs of a gridding run: the receptor, the ligand pose stream, and how
/// atom types map onto channels on each side.
pub struct GridJob<'a, S> {
    pub table: &'a AtomTypeTable,
    pub receptor_atoms: &'a [Atom],
    pub receptor_map: TypeMap,
    pub ligand_map: TypeMap,
    pub ligands: S,
}

/// Which files to produce for every ligand pose.
#[derive(Debug, Clone, PartialEq)]
pub struct GridOutputs {
    /// Prefix of every output path.
    pub base: String,
    /// Write `{base}_{pose}.{params}.binmap`.
    pub binmaps: bool,
    /// Write `{base}_{pose}_rec_{label}.map` and `{base}_{pose}_lig_{label}.map`
    /// for every channel.
    pub maps: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridRunSummary {
    pub poses: usize,
    pub parameter_summary: String,
    pub files: Vec<PathBuf>,
}

/// Grids the receptor once, then every ligand pose in turn, writing the
/// requested outputs for each pose.
#[instrument(skip_all, name = "grid_workflow")]
pub fn run<S: StructureSource>(
    config: &GridConfig,
    job: GridJob<'_, S>,
    outputs: &GridOutputs,
    reporter: &ProgressReporter,
) -> Result<GridRunSummary, EngineError> {
    reporter.report(Progress::PhaseStart { name: "Receptor" });
    let mut session = GridSession::new(
        config.clone(),
        job.table,
        job.receptor_atoms,
        job.receptor_map,
        job.ligand_map,
        job.ligands,
    )?;
    let parameter_summary = session.parameter_summary();
    reporter.report(Progress::PhaseFinish);

    reporter.report(Progress::PhaseStart { name: "Ligands" });
    let mut files = Vec::new();
    while session.load_next_structure() {
        let index = session.structures_loaded();
        let pose_base = format!("{}_{}", outputs.base, index);

        if outputs.binmaps {
            let path = PathBuf::from(format!("{pose_base}.{parameter_summary}.binmap"));
            session.write_binmap_to_path(&path)?;
            files.push(path);
        }
        if outputs.maps {
            files.extend(session.write_maps(&pose_base)?);
        }

        reporter.report(Progress::StructureGridded {
            index,
            atoms: session.last_structure_atoms(),
        });
    }
    reporter.report(Progress::PhaseFinish);

    let poses = session.structures_loaded();
    if poses == 0 {
        let message = "No ligand structures were read; no grids were written.";
        warn!("{}", message);
        reporter.report(Progress::Message(message.to_string()));
    }
    info!(
        poses,
        files = files.len(),
        "Gridding finished with parameters {}.",
        parameter_summary
    );

    Ok(GridRunSummary {
        poses,
        parameter_summary,
        files,
    })
}
