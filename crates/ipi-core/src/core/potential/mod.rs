//! The seam between the protocol layer and whatever evaluates energies and forces.
//!
//! A [`ComputeOracle`] receives atoms in backend order and backend units (Å)
//! and answers in eV and eV/Å. The driver treats it as opaque; the
//! [`lennard_jones`] module provides a reference implementation so the driver
//! can be exercised without an external evaluator.

pub mod lennard_jones;
pub mod params;
pub mod potentials;

use crate::core::models::cell::SimulationCell;
use nalgebra::{Matrix3, Vector3};
use thiserror::Error;

/// Result of a single evaluation, in backend units and backend atom order.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// Total potential energy in eV.
    pub energy: f64,
    /// One force per atom in eV/Å.
    pub forces: Vec<Vector3<f64>>,
    /// Virial tensor in eV.
    pub virial: Matrix3<f64>,
}

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("Evaluator returned {actual} forces for {expected} atoms")]
    ShapeMismatch { expected: usize, actual: usize },
    #[error("Received {positions} positions but {types} atom types")]
    InputMismatch { positions: usize, types: usize },
    #[error("No pair parameters for atom types {0} and {1}")]
    MissingPairParameters(usize, usize),
    #[error("Cutoff {cutoff} Å exceeds half of the narrowest cell width ({limit} Å)")]
    CutoffTooLarge { cutoff: f64, limit: f64 },
}

/// An energy/force evaluator.
pub trait ComputeOracle {
    /// Evaluates one configuration.
    ///
    /// `types` and `positions` are both in backend order and have the same length.
    /// Positions are in Å and have already been wrapped into `cell`.
    fn compute(
        &mut self,
        types: &[usize],
        positions: &[Vector3<f64>],
        cell: &SimulationCell,
    ) -> Result<Evaluation, OracleError>;
}

impl<T: ComputeOracle + ?Sized> ComputeOracle for Box<T> {
    fn compute(
        &mut self,
        types: &[usize],
        positions: &[Vector3<f64>],
        cell: &SimulationCell,
    ) -> Result<Evaluation, OracleError> {
        (**self).compute(types, positions, cell)
    }
}

impl<T: ComputeOracle + ?Sized> ComputeOracle for &mut T {
    fn compute(
        &mut self,
        types: &[usize],
        positions: &[Vector3<f64>],
        cell: &SimulationCell,
    ) -> Result<Evaluation, OracleError> {
        (**self).compute(types, positions, cell)
    }
}
