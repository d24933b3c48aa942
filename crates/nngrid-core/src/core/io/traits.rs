use crate::core::models::atom::Atom;
use std::collections::VecDeque;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },
}

/// A stream of structures sharing one spatial frame, consumed one at a time.
pub trait StructureSource {
    /// Returns the atoms of the next structure, or `Ok(None)` once the
    /// stream is exhausted.
    ///
    /// # Errors
    ///
    /// Returns an error if the next structure cannot be read. Callers treat
    /// an unreadable structure as the end of the stream.
    fn next_structure(&mut self) -> Result<Option<Vec<Atom>>, SourceError>;
}

impl<S: StructureSource + ?Sized> StructureSource for &mut S {
    fn next_structure(&mut self) -> Result<Option<Vec<Atom>>, SourceError> {
        (**self).next_structure()
    }
}

impl<S: StructureSource + ?Sized> StructureSource for Box<S> {
    fn next_structure(&mut self) -> Result<Option<Vec<Atom>>, SourceError> {
        (**self).next_structure()
    }
}

/// In-memory queue of structures.
#[derive(Debug, Clone, Default)]
pub struct VecSource {
    structures: VecDeque<Vec<Atom>>,
}

impl VecSource {
    pub fn new(structures: Vec<Vec<Atom>>) -> Self {
        Self {
            structures: structures.into(),
        }
    }

    pub fn push(&mut self, atoms: Vec<Atom>) {
        self.structures.push_back(atoms);
    }

    pub fn remaining(&self) -> usize {
        self.structures.len()
    }
}

impl StructureSource for VecSource {
    fn next_structure(&mut self) -> Result<Option<Vec<Atom>>, SourceError> {
        Ok(self.structures.pop_front())
    }
}
