use super::traits::{SourceError, StructureSource};
use crate::core::models::atom::Atom;
use crate::core::models::types::AtomTypeTable;
use nalgebra::Point3;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Last column (exclusive) an ATOM/HETATM record must reach: the end of the
/// force-field type field.
const MIN_ATOM_RECORD_LEN: usize = 66;

#[derive(Debug, Error)]
pub enum BgfParseErrorKind {
    #[error("Invalid float format in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: String, value: String },
    #[error("Required field in columns {columns} is empty")]
    MissingRequiredField { columns: String },
    #[error("Line is too short for ATOM/HETATM record (must be at least 66 chars)")]
    LineTooShort,
}

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end).unwrap_or("").trim()
}

fn parse_coordinate(
    line: &str,
    line_num: usize,
    start: usize,
    end: usize,
) -> Result<f64, SourceError> {
    let field = slice_and_trim(line, start, end);
    match field.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(SourceError::Parse {
            line: line_num,
            message: BgfParseErrorKind::InvalidFloat {
                columns: format!("{}-{}", start + 1, end),
                value: field.into(),
            }
            .to_string(),
        }),
    }
}

/// Reads consecutive structures from a BGF stream.
///
/// Each structure is the run of ATOM/HETATM records up to an `END` record or
/// the end of input. Force-field types are resolved through an
/// [`AtomTypeTable`]; atoms whose type the table does not know are dropped.
pub struct BgfStructureReader<'t, R> {
    reader: R,
    table: &'t AtomTypeTable,
    line_num: usize,
    structures_read: usize,
}

impl<'t> BgfStructureReader<'t, BufReader<File>> {
    pub fn open<P: AsRef<Path>>(path: P, table: &'t AtomTypeTable) -> std::io::Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file), table))
    }
}

impl<'t, R: BufRead> BgfStructureReader<'t, R> {
    pub fn new(reader: R, table: &'t AtomTypeTable) -> Self {
        Self {
            reader,
            table,
            line_num: 0,
            structures_read: 0,
        }
    }

    pub fn structures_read(&self) -> usize {
        self.structures_read
    }

    fn parse_atom_record(&self, line: &str) -> Result<Option<Atom>, SourceError> {
        if line.len() < MIN_ATOM_RECORD_LEN {
            return Err(SourceError::Parse {
                line: self.line_num,
                message: BgfParseErrorKind::LineTooShort.to_string(),
            });
        }

        let x = parse_coordinate(line, self.line_num, 30, 40)?;
        let y = parse_coordinate(line, self.line_num, 40, 50)?;
        let z = parse_coordinate(line, self.line_num, 50, 60)?;

        let ff_type = slice_and_trim(line, 61, 66);
        if ff_type.is_empty() {
            return Err(SourceError::Parse {
                line: self.line_num,
                message: BgfParseErrorKind::MissingRequiredField {
                    columns: "62-66".into(),
                }
                .to_string(),
            });
        }

        match self.table.index_of(ff_type) {
            Some(type_index) => Ok(Some(Atom::new(Point3::new(x, y, z), type_index))),
            None => {
                debug!(
                    "Skipping atom with unknown type '{}' on line {}",
                    ff_type, self.line_num
                );
                Ok(None)
            }
        }
    }
}

impl<R: BufRead> StructureSource for BgfStructureReader<'_, R> {
    fn next_structure(&mut self) -> Result<Option<Vec<Atom>>, SourceError> {
        let mut atoms = Vec::new();
        let mut saw_atom_record = false;
        let mut line = String::new();

        loop {
            line.clear();
            if self.reader.read_line(&mut line)? == 0 {
                break;
            }
            self.line_num += 1;
            let record = line.trim_end_matches(['\n', '\r']);

            match record.get(..6).unwrap_or(record).trim() {
                "ATOM" | "HETATM" => {
                    saw_atom_record = true;
                    if let Some(atom) = self.parse_atom_record(record)? {
                        atoms.push(atom);
                    }
                }
                "END" if saw_atom_record => break,
                _ => {}
            }
        }

        if !saw_atom_record {
            return Ok(None);
        }
        self.structures_read += 1;
        Ok(Some(atoms))
    }
}
