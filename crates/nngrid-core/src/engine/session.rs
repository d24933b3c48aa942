use super::accumulator::GridAccumulator;
use super::channels::ChannelSet;
use super::config::GridConfig;
use super::error::{EngineError, OutputError};
use crate::core::grid::geometry::GridGeometry;
use crate::core::io::binmap::write_binmap;
use crate::core::io::map::write_map_grid;
use crate::core::io::traits::StructureSource;
use crate::core::models::atom::{Atom, AtomRadii};
use crate::core::models::type_map::TypeMap;
use crate::core::models::types::AtomTypeTable;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Receptor and ligand channel grids on one shared geometry.
///
/// The receptor side is gridded once, at construction, and never changes.
/// The ligand side is cleared and rebuilt from scratch for every structure
/// pulled from the source.
pub struct GridSession<'t, S> {
    config: GridConfig,
    geometry: GridGeometry,
    table: &'t AtomTypeTable,
    receptor: ChannelSet,
    ligand: ChannelSet,
    source: S,
    structures_loaded: usize,
    last_structure_atoms: usize,
}

impl<'t, S: StructureSource> GridSession<'t, S> {
    /// Builds the geometry and grids the receptor atoms.
    ///
    /// # Errors
    ///
    /// Returns an error if either type map was built for a different number
    /// of types than `table` holds.
    pub fn new(
        config: GridConfig,
        table: &'t AtomTypeTable,
        receptor_atoms: &[Atom],
        receptor_map: TypeMap,
        ligand_map: TypeMap,
        source: S,
    ) -> Result<Self, EngineError> {
        receptor_map
            .check_type_count(table.type_count())
            .map_err(|source| EngineError::TypeMap {
                side: "receptor",
                source,
            })?;
        ligand_map
            .check_type_count(table.type_count())
            .map_err(|source| EngineError::TypeMap {
                side: "ligand",
                source,
            })?;

        let geometry = config.geometry();
        let points = geometry.points_per_axis();
        let mut receptor = ChannelSet::new(receptor_map, points);
        let ligand = ChannelSet::new(ligand_map, points);

        let accumulator = GridAccumulator::new(&geometry, table, config.kernel);
        let placed = receptor.accumulate_atoms(&accumulator, receptor_atoms);

        info!(
            points_per_axis = points,
            resolution = geometry.resolution(),
            receptor_channels = receptor.channel_count(),
            ligand_channels = ligand.channel_count(),
            "Receptor gridded: {} of {} atoms mapped.",
            placed,
            receptor_atoms.len()
        );

        Ok(Self {
            config,
            geometry,
            table,
            receptor,
            ligand,
            source,
            structures_loaded: 0,
            last_structure_atoms: 0,
        })
    }

    /// Pulls the next structure from the source and regrids the ligand side.
    ///
    /// Returns `false` when the source is exhausted or the structure cannot
    /// be read; the ligand grids then keep their previous contents.
    pub fn load_next_structure(&mut self) -> bool {
        match self.source.next_structure() {
            Ok(Some(atoms)) => {
                self.load_structure(&atoms);
                true
            }
            Ok(None) => {
                debug!(
                    "Structure source exhausted after {} structure(s).",
                    self.structures_loaded
                );
                false
            }
            Err(e) => {
                warn!(
                    "Stopping after {} structure(s): {}",
                    self.structures_loaded, e
                );
                false
            }
        }
    }

    /// Clears the ligand grids and fills them from `atoms`.
    pub fn load_structure(&mut self, atoms: &[Atom]) {
        self.ligand.clear();
        let accumulator = GridAccumulator::new(&self.geometry, self.table, self.config.kernel);
        let placed = self.ligand.accumulate_atoms(&accumulator, atoms);
        self.structures_loaded += 1;
        self.last_structure_atoms = atoms.len();
        debug!(
            structure = self.structures_loaded,
            "Ligand gridded: {} of {} atoms mapped.",
            placed,
            atoms.len()
        );
    }
}

impl<S> GridSession<'_, S> {
    /// `"{points per axis}.{total channels}"`, used to label output files.
    pub fn parameter_summary(&self) -> String {
        format!(
            "{}.{}",
            self.geometry.points_per_axis(),
            self.receptor.channel_count() + self.ligand.channel_count()
        )
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    pub fn table(&self) -> &AtomTypeTable {
        self.table
    }

    pub fn receptor(&self) -> &ChannelSet {
        &self.receptor
    }

    pub fn ligand(&self) -> &ChannelSet {
        &self.ligand
    }

    pub fn structures_loaded(&self) -> usize {
        self.structures_loaded
    }

    /// Atom count of the structure currently gridded on the ligand side.
    pub fn last_structure_atoms(&self) -> usize {
        self.last_structure_atoms
    }

    /// Writes one AutoDock map per channel, receptor channels first, and
    /// returns the paths written.
    ///
    /// Receptor maps go to `{base}_rec_{label}.map` and ligand maps to
    /// `{base}_lig_{label}.map`, so both sides may share labels.
    pub fn write_maps(&self, base: &str) -> Result<Vec<PathBuf>, OutputError> {
        let mut written =
            Vec::with_capacity(self.receptor.channel_count() + self.ligand.channel_count());
        for (side, set) in [("rec", &self.receptor), ("lig", &self.ligand)] {
            for channel in 0..set.channel_count() {
                let label = set.label(self.table, channel);
                let path = PathBuf::from(format!("{}_{}_{}.map", base, side, label));
                let file = File::create(&path).map_err(|e| OutputError::new(&path, e))?;
                let mut writer = BufWriter::new(file);
                write_map_grid(&mut writer, &self.geometry, set.channel(channel))
                    .and_then(|_| writer.flush())
                    .map_err(|e| OutputError::new(&path, e))?;
                written.push(path);
            }
        }
        debug!("Wrote {} map file(s) with base '{}'.", written.len(), base);
        Ok(written)
    }

    /// Writes all channels as one packed binary stream.
    pub fn write_binmap<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        write_binmap(writer, self.receptor.arrays(), self.ligand.arrays())
    }

    pub fn write_binmap_to_path(&self, path: &Path) -> Result<(), OutputError> {
        let file = File::create(path).map_err(|e| OutputError::new(path, e))?;
        let mut writer = BufWriter::new(file);
        self.write_binmap(&mut writer)
            .and_then(|_| writer.flush())
            .map_err(|e| OutputError::new(path, e))
    }
}
