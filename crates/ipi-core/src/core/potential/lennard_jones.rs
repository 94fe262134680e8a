use super::params::{PairTable, ParamLoadError};
use super::potentials::{lennard_jones_12_6, lennard_jones_12_6_force_over_r};
use super::{ComputeOracle, Evaluation, OracleError};
use crate::core::models::cell::SimulationCell;
use crate::core::utils::geometry::minimum_image_displacement;
use nalgebra::{Matrix3, Vector3};
use std::path::Path;
use tracing::trace;

/// A truncated 12-6 Lennard-Jones pair potential under periodic boundary conditions.
///
/// Each pair within the cutoff interacts with its nearest periodic image only.
/// The cutoff must therefore stay below half the narrowest cell width, which is
/// checked on every evaluation since the cell can change between frames.
#[derive(Debug, Clone)]
pub struct LennardJonesOracle {
    table: PairTable,
}

impl LennardJonesOracle {
    pub fn new(table: PairTable) -> Self {
        Self { table }
    }

    pub fn load(path: &Path) -> Result<Self, ParamLoadError> {
        PairTable::load(path).map(Self::new)
    }

    pub fn cutoff(&self) -> f64 {
        self.table.cutoff
    }
}

impl ComputeOracle for LennardJonesOracle {
    fn compute(
        &mut self,
        types: &[usize],
        positions: &[Vector3<f64>],
        cell: &SimulationCell,
    ) -> Result<Evaluation, OracleError> {
        if types.len() != positions.len() {
            return Err(OracleError::InputMismatch {
                positions: positions.len(),
                types: types.len(),
            });
        }

        let limit = 0.5 * cell.perpendicular_widths().min();
        if self.table.cutoff > limit {
            return Err(OracleError::CutoffTooLarge {
                cutoff: self.table.cutoff,
                limit,
            });
        }

        let cutoff_sq = self.table.cutoff * self.table.cutoff;
        let mut energy = 0.0;
        let mut forces = vec![Vector3::zeros(); positions.len()];
        let mut virial = Matrix3::zeros();

        for i in 0..positions.len() {
            for j in (i + 1)..positions.len() {
                let param = self
                    .table
                    .get(types[i], types[j])
                    .ok_or(OracleError::MissingPairParameters(types[i], types[j]))?;

                let r_ij = minimum_image_displacement(cell, &positions[i], &positions[j]);
                let dist_sq = r_ij.norm_squared();
                if dist_sq > cutoff_sq {
                    continue;
                }
                let dist = dist_sq.sqrt();

                energy += lennard_jones_12_6(dist, param.r_min, param.well_depth);
                let f_ij = r_ij * lennard_jones_12_6_force_over_r(dist, param.r_min, param.well_depth);
                forces[i] += f_ij;
                forces[j] -= f_ij;
                virial += r_ij * f_ij.transpose();
            }
        }

        trace!(energy, atoms = positions.len(), "Lennard-Jones evaluation finished.");
        Ok(Evaluation {
            energy,
            forces,
            virial,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::potential::params::PairParam;

    fn argon() -> LennardJonesOracle {
        let mut table = PairTable::new(5.0);
        table.insert(PairParam {
            types: [0, 0],
            r_min: 3.8,
            well_depth: 0.0104,
        });
        LennardJonesOracle::new(table)
    }

    fn box_of(edge: f64) -> SimulationCell {
        SimulationCell::orthorhombic(edge, edge, edge).unwrap()
    }

    #[test]
    fn dimer_at_r_min_sits_in_the_well_without_force() {
        let positions = [Vector3::new(1.0, 1.0, 1.0), Vector3::new(4.8, 1.0, 1.0)];
        let eval = argon().compute(&[0, 0], &positions, &box_of(20.0)).unwrap();
        assert!((eval.energy + 0.0104).abs() < 1e-12);
        assert!(eval.forces.iter().all(|f| f.norm() < 1e-12));
    }

    #[test]
    fn forces_are_equal_and_opposite_across_the_boundary() {
        let positions = [Vector3::new(0.5, 5.0, 5.0), Vector3::new(16.5, 5.0, 5.0)];
        let eval = argon().compute(&[0, 0], &positions, &box_of(20.0)).unwrap();
        // Nearest image separation is 4.0 Å through the x face.
        assert!((eval.energy - lennard_jones_12_6(4.0, 3.8, 0.0104)).abs() < 1e-12);
        assert!((eval.forces[0] + eval.forces[1]).norm() < 1e-12);
        // Slightly beyond r_min, so atom 0 is pulled towards its image at -3.5.
        assert!(eval.forces[0].x < 0.0);
    }

    #[test]
    fn virial_is_symmetric_outer_product_sum() {
        let positions = [
            Vector3::new(1.0, 1.0, 1.0),
            Vector3::new(3.5, 2.0, 1.5),
            Vector3::new(2.0, 4.0, 2.5),
        ];
        let eval = argon()
            .compute(&[0, 0, 0], &positions, &box_of(20.0))
            .unwrap();
        assert!((eval.virial - eval.virial.transpose()).norm() < 1e-12);
        let net: Vector3<f64> = eval.forces.iter().sum();
        assert!(net.norm() < 1e-12);
    }

    #[test]
    fn pairs_beyond_cutoff_do_not_interact() {
        let positions = [Vector3::new(0.0, 0.0, 0.0), Vector3::new(6.0, 0.0, 0.0)];
        let eval = argon().compute(&[0, 0], &positions, &box_of(20.0)).unwrap();
        assert_eq!(eval.energy, 0.0);
    }

    #[test]
    fn small_cell_is_rejected() {
        let positions = [Vector3::zeros()];
        let err = argon().compute(&[0], &positions, &box_of(8.0)).unwrap_err();
        assert!(matches!(err, OracleError::CutoffTooLarge { .. }));
    }

    #[test]
    fn missing_pair_parameters_are_reported() {
        let positions = [Vector3::zeros(), Vector3::new(4.0, 0.0, 0.0)];
        let err = argon().compute(&[0, 1], &positions, &box_of(20.0)).unwrap_err();
        assert!(matches!(err, OracleError::MissingPairParameters(0, 1)));
    }

    #[test]
    fn mismatched_inputs_are_rejected() {
        let err = argon()
            .compute(&[0, 0], &[Vector3::zeros()], &box_of(20.0))
            .unwrap_err();
        assert!(matches!(
            err,
            OracleError::InputMismatch {
                positions: 1,
                types: 2
            }
        ));
    }
}
