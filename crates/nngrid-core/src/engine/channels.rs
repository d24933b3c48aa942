use super::accumulator::GridAccumulator;
use crate::core::grid::array::ChannelArray;
use crate::core::models::atom::{Atom, AtomRadii};
use crate::core::models::type_map::TypeMap;
use crate::core::models::types::AtomTypeTable;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// The channel arrays of one side (receptor or ligand) and the type map that
/// routes atoms into them.
#[derive(Debug, Clone)]
pub struct ChannelSet {
    map: TypeMap,
    arrays: Vec<ChannelArray>,
}

impl ChannelSet {
    /// Allocates one zero-filled array of `points^3` samples per mapped channel.
    pub fn new(map: TypeMap, points: usize) -> Self {
        let arrays = (0..map.channel_count())
            .map(|_| ChannelArray::zeros(points))
            .collect();
        Self { map, arrays }
    }

    #[inline]
    pub fn map(&self) -> &TypeMap {
        &self.map
    }

    #[inline]
    pub fn channel_count(&self) -> usize {
        self.arrays.len()
    }

    #[inline]
    pub fn channel(&self, index: usize) -> &ChannelArray {
        &self.arrays[index]
    }

    #[inline]
    pub fn arrays(&self) -> &[ChannelArray] {
        &self.arrays
    }

    /// Name of a channel built from every type mapped to it.
    pub fn label(&self, table: &AtomTypeTable, channel: usize) -> String {
        self.map.label(table, channel)
    }

    pub fn clear(&mut self) {
        for array in &mut self.arrays {
            array.fill_zero();
        }
    }

    /// Accumulates every atom whose type is mapped into its channel and
    /// returns how many atoms were placed.
    ///
    /// Atoms are bucketed per channel first, so with the `parallel` feature
    /// each channel is filled by a single task and keeps the input order.
    pub fn accumulate_atoms<R>(
        &mut self,
        accumulator: &GridAccumulator<'_, R>,
        atoms: &[Atom],
    ) -> usize
    where
        R: AtomRadii + Sync + ?Sized,
    {
        let mut buckets: Vec<Vec<&Atom>> = vec![Vec::new(); self.arrays.len()];
        for atom in atoms {
            if let Some(channel) = self.map.channel_of(atom.type_index) {
                buckets[channel].push(atom);
            }
        }
        let placed = buckets.iter().map(Vec::len).sum();

        #[cfg(not(feature = "parallel"))]
        let iterator = self.arrays.iter_mut().zip(buckets.iter());

        #[cfg(feature = "parallel")]
        let iterator = self.arrays.par_iter_mut().zip(buckets.par_iter());

        iterator.for_each(|(array, bucket)| {
            for atom in bucket {
                accumulator.accumulate(atom, array);
            }
        });

        placed
    }
}
