use nalgebra::Vector3;
use serde::Deserialize;
use std::collections::BTreeMap;

/// A single named atom with its Cartesian position.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The atom name as it appears in the coordinate file (e.g., "O", "H").
    pub name: String,
    /// Cartesian position in Å.
    pub position: Vector3<f64>,
}

impl Atom {
    pub fn new(name: &str, position: Vector3<f64>) -> Self {
        Self {
            name: name.to_string(),
            position,
        }
    }
}

/// The ordered set of atoms a driver session works on.
///
/// Order is significant: it is the order the peer uses on the wire.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AtomSet {
    atoms: Vec<Atom>,
}

impl AtomSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, atom: Atom) {
        self.atoms.push(atom);
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.atoms.iter().map(|a| a.name.as_str())
    }

    pub fn positions(&self) -> impl Iterator<Item = &Vector3<f64>> + '_ {
        self.atoms.iter().map(|a| &a.position)
    }
}

impl FromIterator<Atom> for AtomSet {
    fn from_iter<I: IntoIterator<Item = Atom>>(iter: I) -> Self {
        Self {
            atoms: iter.into_iter().collect(),
        }
    }
}

/// Mapping from atom name to the integer type id the evaluator understands.
///
/// The map is fixed for the lifetime of a session. Type ids are non-negative by
/// construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct TypeMap {
    types: BTreeMap<String, usize>,
}

impl TypeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `name` with `type_id`, returning the previous id if the name was already present.
    pub fn insert(&mut self, name: &str, type_id: usize) -> Option<usize> {
        self.types.insert(name.to_string(), type_id)
    }

    pub fn get(&self, name: &str) -> Option<usize> {
        self.types.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.types.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<'a> FromIterator<(&'a str, usize)> for TypeMap {
    fn from_iter<I: IntoIterator<Item = (&'a str, usize)>>(iter: I) -> Self {
        Self {
            types: iter
                .into_iter()
                .map(|(name, id)| (name.to_string(), id))
                .collect(),
        }
    }
}
