use super::atom::AtomRadii;
use phf::{OrderedMap, phf_ordered_map};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// The smina atom types in canonical index order, each with a short alias that
/// fits a BGF force-field column and its XS radius (Angstroms).
static XS_TYPES: OrderedMap<&'static str, (&'static str, f64)> = phf_ordered_map! {
    "Hydrogen" => ("H", 0.37),
    "PolarHydrogen" => ("HD", 0.37),
    "AliphaticCarbonXSHydrophobe" => ("C_H", 1.9),
    "AliphaticCarbonXSNonHydrophobe" => ("C_P", 1.9),
    "AromaticCarbonXSHydrophobe" => ("A_H", 1.9),
    "AromaticCarbonXSNonHydrophobe" => ("A_P", 1.9),
    "Nitrogen" => ("N_P", 1.8),
    "NitrogenXSDonor" => ("N_D", 1.8),
    "NitrogenXSDonorAcceptor" => ("N_DA", 1.8),
    "NitrogenXSAcceptor" => ("N_A", 1.8),
    "Oxygen" => ("O_P", 1.7),
    "OxygenXSDonor" => ("O_D", 1.7),
    "OxygenXSDonorAcceptor" => ("O_DA", 1.7),
    "OxygenXSAcceptor" => ("O_A", 1.7),
    "Sulfur" => ("S_P", 2.0),
    "SulfurAcceptor" => ("S_A", 2.0),
    "Phosphorus" => ("P_P", 2.1),
    "Fluorine" => ("F_H", 1.5),
    "Chlorine" => ("Cl_H", 1.8),
    "Bromine" => ("Br_H", 2.0),
    "Iodine" => ("I_H", 2.2),
    "Magnesium" => ("Mg", 1.2),
    "Manganese" => ("Mn", 1.2),
    "Zinc" => ("Zn", 1.2),
    "Calcium" => ("Ca", 1.2),
    "Iron" => ("Fe", 1.2),
    "GenericMetal" => ("Met_D", 1.2),
    "Boron" => ("B", 1.92),
};

/// Index of a smina type name in the built-in XS table.
pub fn xs_type_index(name: &str) -> Option<usize> {
    XS_TYPES.get_index(name)
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AtomType {
    pub name: String,
    pub radius: f64,
    #[serde(default)]
    pub aliases: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TypeTableFile {
    types: Vec<AtomType>,
}

#[derive(Debug, Error)]
pub enum TypeTableError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Type table is empty")]
    Empty,
    #[error("Atom type name '{0}' is defined more than once")]
    DuplicateName(String),
    #[error("Atom type '{name}' has invalid radius {radius}")]
    InvalidRadius { name: String, radius: f64 },
}

/// Ordered table of atom types: names, aliases, and radii.
///
/// A type's position in the table is its type index.
#[derive(Debug, Clone)]
pub struct AtomTypeTable {
    types: Vec<AtomType>,
    lookup: HashMap<String, usize>,
}

impl AtomTypeTable {
    pub fn new(types: Vec<AtomType>) -> Result<Self, TypeTableError> {
        if types.is_empty() {
            return Err(TypeTableError::Empty);
        }

        let mut lookup = HashMap::with_capacity(types.len());
        for (index, atom_type) in types.iter().enumerate() {
            if !(atom_type.radius.is_finite() && atom_type.radius > 0.0) {
                return Err(TypeTableError::InvalidRadius {
                    name: atom_type.name.clone(),
                    radius: atom_type.radius,
                });
            }
            for key in std::iter::once(&atom_type.name).chain(&atom_type.aliases) {
                if key.trim().is_empty() || lookup.insert(key.clone(), index).is_some() {
                    return Err(TypeTableError::DuplicateName(key.clone()));
                }
            }
        }

        Ok(Self { types, lookup })
    }

    /// The 28 smina atom types with their XS radii.
    pub fn xs_default() -> Self {
        let types = XS_TYPES
            .entries()
            .map(|(name, (alias, radius))| AtomType {
                name: name.to_string(),
                radius: *radius,
                aliases: vec![alias.to_string()],
            })
            .collect();
        Self::new(types).expect("built-in XS type table is valid")
    }

    pub fn load(path: &Path) -> Result<Self, TypeTableError> {
        let content = std::fs::read_to_string(path).map_err(|e| TypeTableError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        let file: TypeTableFile = toml::from_str(&content).map_err(|e| TypeTableError::Toml {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::new(file.types)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Resolves a type name or alias to its index.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.lookup.get(name).copied()
    }

    /// # Panics
    ///
    /// Panics if `type_index` is not below [`len`](Self::len).
    pub fn get(&self, type_index: usize) -> &AtomType {
        assert!(
            type_index < self.types.len(),
            "atom type index {type_index} out of range for table of {} types",
            self.types.len()
        );
        &self.types[type_index]
    }

    pub fn name(&self, type_index: usize) -> &str {
        &self.get(type_index).name
    }

    pub fn iter(&self) -> impl Iterator<Item = &AtomType> {
        self.types.iter()
    }
}

impl AtomRadii for AtomTypeTable {
    fn type_count(&self) -> usize {
        self.types.len()
    }

    fn radius(&self, type_index: usize) -> f64 {
        self.get(type_index).radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn atom_type(name: &str, radius: f64) -> AtomType {
        AtomType {
            name: name.to_string(),
            radius,
            aliases: Vec::new(),
        }
    }

    #[test]
    fn xs_default_has_smina_types_in_order() {
        let table = AtomTypeTable::xs_default();
        assert_eq!(table.len(), 28);
        assert_eq!(table.name(0), "Hydrogen");
        assert_eq!(table.name(27), "Boron");
        let carbon = table.index_of("AliphaticCarbonXSHydrophobe").unwrap();
        assert_eq!(carbon, 2);
        assert_eq!(table.radius(carbon), 1.9);
        assert_eq!(xs_type_index("Iron"), Some(25));
        assert_eq!(table.radius(table.index_of("OxygenXSAcceptor").unwrap()), 1.7);
    }

    #[test]
    fn xs_default_short_aliases_fit_bgf_type_column() {
        let table = AtomTypeTable::xs_default();
        for atom_type in table.iter() {
            assert_eq!(atom_type.aliases.len(), 1);
            assert!(atom_type.aliases[0].len() <= 5, "{}", atom_type.aliases[0]);
        }
        assert_eq!(table.index_of("N_DA"), table.index_of("NitrogenXSDonorAcceptor"));
        assert_eq!(table.index_of("Met_D"), Some(26));
    }

    #[test]
    fn index_of_resolves_aliases() {
        let table = AtomTypeTable::new(vec![
            atom_type("C", 1.9),
            AtomType {
                name: "N".into(),
                radius: 1.8,
                aliases: vec!["N_3".into(), "N_R".into()],
            },
        ])
        .unwrap();
        assert_eq!(table.index_of("N_R"), Some(1));
        assert_eq!(table.index_of("C"), Some(0));
        assert_eq!(table.index_of("O"), None);
    }

    #[test]
    fn new_rejects_duplicate_names_and_aliases() {
        let result = AtomTypeTable::new(vec![
            atom_type("C", 1.9),
            AtomType {
                name: "C2".into(),
                radius: 1.9,
                aliases: vec!["C".into()],
            },
        ]);
        assert!(matches!(result, Err(TypeTableError::DuplicateName(name)) if name == "C"));
    }

    #[test]
    fn new_rejects_non_positive_radius() {
        let result = AtomTypeTable::new(vec![atom_type("C", 0.0)]);
        assert!(matches!(result, Err(TypeTableError::InvalidRadius { .. })));
        assert!(matches!(
            AtomTypeTable::new(Vec::new()),
            Err(TypeTableError::Empty)
        ));
    }

    #[test]
    fn load_reads_types_from_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("types.toml");
        fs::write(
            &path,
            r#"
            [[types]]
            name = "C"
            radius = 1.9
            aliases = ["C_3", "C_R"]

            [[types]]
            name = "O"
            radius = 1.7
            "#,
        )
        .unwrap();

        let table = AtomTypeTable::load(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.index_of("C_3"), Some(0));
        assert_eq!(table.radius(1), 1.7);
    }

    #[test]
    fn load_fails_for_missing_file() {
        let dir = tempdir().unwrap();
        let result = AtomTypeTable::load(&dir.path().join("missing.toml"));
        assert!(matches!(result, Err(TypeTableError::Io { .. })));
    }

    #[test]
    fn load_fails_for_malformed_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[[types]]\nname = 3").unwrap();
        let result = AtomTypeTable::load(&path);
        assert!(matches!(result, Err(TypeTableError::Toml { .. })));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn get_panics_for_unknown_index() {
        AtomTypeTable::xs_default().get(28);
    }
}
