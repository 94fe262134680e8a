use crate::core::models::atom::TypeMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MappingError {
    #[error("Atom '{name}' at index {index} has no entry in the type map")]
    UnknownAtomType { name: String, index: usize },
    #[error("Per-atom buffer has {actual} values, expected {expected} ({atoms} atoms x {components})")]
    LengthMismatch {
        expected: usize,
        actual: usize,
        atoms: usize,
        components: usize,
    },
}

/// Reorders per-atom data between wire order and backend order.
///
/// Backend order groups atoms by ascending type id. Atoms of the same type keep
/// their relative wire order, so the permutation is fully determined by the
/// name sequence and the type map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtomOrderMapper {
    /// `permutation[k]` is the wire index of the atom at backend position `k`.
    permutation: Vec<usize>,
    /// Type ids in backend order.
    types: Vec<usize>,
}

impl AtomOrderMapper {
    /// Builds the mapping for `names`, given in wire order.
    ///
    /// # Errors
    ///
    /// Returns [`MappingError::UnknownAtomType`] for the first name absent from `type_map`.
    pub fn new<'a, I>(names: I, type_map: &TypeMap) -> Result<Self, MappingError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let wire_types = names
            .into_iter()
            .enumerate()
            .map(|(index, name)| {
                type_map
                    .get(name)
                    .ok_or_else(|| MappingError::UnknownAtomType {
                        name: name.to_string(),
                        index,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut permutation: Vec<usize> = (0..wire_types.len()).collect();
        // Stable sort keeps wire order within each type.
        permutation.sort_by_key(|&i| wire_types[i]);
        let types = permutation.iter().map(|&i| wire_types[i]).collect();

        Ok(Self { permutation, types })
    }

    pub fn num_atoms(&self) -> usize {
        self.permutation.len()
    }

    /// Type ids in backend order.
    pub fn get_types(&self) -> &[usize] {
        &self.types
    }

    pub fn permutation(&self) -> &[usize] {
        &self.permutation
    }

    /// Regroups a flat per-atom buffer from wire order into backend order.
    pub fn forward(&self, values: &[f64], components: usize) -> Result<Vec<f64>, MappingError> {
        self.check_len(values, components)?;
        let mut out = Vec::with_capacity(values.len());
        for &wire_idx in &self.permutation {
            let start = wire_idx * components;
            out.extend_from_slice(&values[start..start + components]);
        }
        Ok(out)
    }

    /// Restores a flat per-atom buffer from backend order into wire order.
    pub fn backward(&self, values: &[f64], components: usize) -> Result<Vec<f64>, MappingError> {
        self.check_len(values, components)?;
        let mut out = vec![0.0; values.len()];
        for (backend_idx, &wire_idx) in self.permutation.iter().enumerate() {
            let src = backend_idx * components;
            let dst = wire_idx * components;
            out[dst..dst + components].copy_from_slice(&values[src..src + components]);
        }
        Ok(out)
    }

    fn check_len(&self, values: &[f64], components: usize) -> Result<(), MappingError> {
        let expected = self.permutation.len() * components;
        if values.len() != expected {
            return Err(MappingError::LengthMismatch {
                expected,
                actual: values.len(),
                atoms: self.permutation.len(),
                components,
            });
        }
        Ok(())
    }
}
