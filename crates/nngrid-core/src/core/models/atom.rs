use nalgebra::{Point3, Vector3};

/// A typed point to be gridded.
///
/// The type index refers to an entry of an [`AtomTypeTable`](super::types::AtomTypeTable),
/// which supplies the atom's radius and the name used when labelling channels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Atom {
    /// The 3D coordinates of the atom in Angstroms.
    pub position: Point3<f64>,
    /// Index of the atom's type in the type table.
    pub type_index: usize,
}

impl Atom {
    pub fn new(position: Point3<f64>, type_index: usize) -> Self {
        Self {
            position,
            type_index,
        }
    }
}

/// Geometric center of `atoms`, or `None` for an empty slice.
pub fn centroid(atoms: &[Atom]) -> Option<Point3<f64>> {
    if atoms.is_empty() {
        return None;
    }
    let sum = atoms
        .iter()
        .fold(Vector3::zeros(), |acc, atom| acc + atom.position.coords);
    Some(Point3::from(sum / atoms.len() as f64))
}

/// Supplies per-type atomic radii to the gridding pipeline.
///
/// Implementations must answer for every index below [`type_count`](AtomRadii::type_count)
/// and may panic on anything larger.
pub trait AtomRadii {
    fn type_count(&self) -> usize;

    fn radius(&self, type_index: usize) -> f64;
}

impl AtomRadii for [f64] {
    fn type_count(&self) -> usize {
        self.len()
    }

    fn radius(&self, type_index: usize) -> f64 {
        self[type_index]
    }
}

impl AtomRadii for Vec<f64> {
    fn type_count(&self) -> usize {
        self.len()
    }

    fn radius(&self, type_index: usize) -> f64 {
        self[type_index]
    }
}
