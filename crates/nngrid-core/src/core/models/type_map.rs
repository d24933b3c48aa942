use super::types::AtomTypeTable;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TypeMapError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Unknown atom type '{name}' on line {line}")]
    UnknownType { line: usize, name: String },
    #[error("Atom type '{0}' is assigned to more than one channel")]
    DuplicateType(String),
    #[error("Channel {0} has no atom types mapped to it")]
    EmptyChannel(usize),
    #[error("Type map covers {actual} types but the type table has {expected}")]
    SizeMismatch { expected: usize, actual: usize },
}

/// Assignment of atom types to channels for one side of a session.
///
/// Every type index resolves to at most one channel. Several types may share
/// a channel, in which case their densities add up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMap {
    channels: Vec<Option<usize>>,
    channel_count: usize,
}

impl TypeMap {
    /// Builds a map from a per-type channel assignment.
    ///
    /// Channel indices must be dense: every channel below the largest index
    /// needs at least one type.
    pub fn new(channels: Vec<Option<usize>>) -> Result<Self, TypeMapError> {
        let channel_count = channels.iter().flatten().max().map_or(0, |&max| max + 1);
        let mut used = vec![false; channel_count];
        for &channel in channels.iter().flatten() {
            used[channel] = true;
        }
        if let Some(gap) = used.iter().position(|&u| !u) {
            return Err(TypeMapError::EmptyChannel(gap));
        }
        Ok(Self {
            channels,
            channel_count,
        })
    }

    /// Every type gets its own channel, in type order.
    pub fn identity(type_count: usize) -> Self {
        Self {
            channels: (0..type_count).map(Some).collect(),
            channel_count: type_count,
        }
    }

    /// One channel per group; each group lists the type names collapsed into it.
    pub fn from_groups<S: AsRef<str>>(
        table: &AtomTypeTable,
        groups: &[Vec<S>],
    ) -> Result<Self, TypeMapError> {
        let mut channels = vec![None; table.len()];
        for (channel, group) in groups.iter().enumerate() {
            for name in group {
                let name = name.as_ref();
                let type_index =
                    table
                        .index_of(name)
                        .ok_or_else(|| TypeMapError::UnknownType {
                            line: channel + 1,
                            name: name.to_string(),
                        })?;
                if channels[type_index].replace(channel).is_some() {
                    return Err(TypeMapError::DuplicateType(name.to_string()));
                }
            }
        }
        Self::new(channels)
    }

    /// Parses the line-oriented map format: each non-blank line that is not a
    /// `#` comment is one channel, listing whitespace-separated type names.
    pub fn parse(table: &AtomTypeTable, text: &str) -> Result<Self, TypeMapError> {
        let mut channels = vec![None; table.len()];
        let mut channel = 0;
        for (line_num, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            for name in line.split_whitespace() {
                let type_index =
                    table
                        .index_of(name)
                        .ok_or_else(|| TypeMapError::UnknownType {
                            line: line_num + 1,
                            name: name.to_string(),
                        })?;
                if channels[type_index].replace(channel).is_some() {
                    return Err(TypeMapError::DuplicateType(name.to_string()));
                }
            }
            channel += 1;
        }
        Self::new(channels)
    }

    pub fn load(table: &AtomTypeTable, path: &Path) -> Result<Self, TypeMapError> {
        let content = std::fs::read_to_string(path).map_err(|e| TypeMapError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::parse(table, &content)
    }

    /// Checks that this map was built for a table of `type_count` types.
    pub fn check_type_count(&self, type_count: usize) -> Result<(), TypeMapError> {
        if self.channels.len() != type_count {
            return Err(TypeMapError::SizeMismatch {
                expected: type_count,
                actual: self.channels.len(),
            });
        }
        Ok(())
    }

    #[inline]
    pub fn channel_count(&self) -> usize {
        self.channel_count
    }

    #[inline]
    pub fn type_count(&self) -> usize {
        self.channels.len()
    }

    /// Channel receiving atoms of `type_index`, or `None` if the type is ignored.
    ///
    /// # Panics
    ///
    /// Panics if `type_index` is outside the declared type range.
    #[inline]
    pub fn channel_of(&self, type_index: usize) -> Option<usize> {
        assert!(
            type_index < self.channels.len(),
            "atom type index {type_index} out of range for map of {} types",
            self.channels.len()
        );
        self.channels[type_index]
    }

    /// Concatenated names of every type mapped to `channel`, in type order.
    ///
    /// Scans the whole map; meant for naming output files, not for hot loops.
    pub fn label(&self, table: &AtomTypeTable, channel: usize) -> String {
        self.channels
            .iter()
            .enumerate()
            .filter(|(_, c)| **c == Some(channel))
            .map(|(type_index, _)| table.name(type_index))
            .collect()
    }
}
