use crate::core::units;
use nalgebra::{Matrix3, Vector3};

/// A periodic simulation cell described by its basis vectors.
///
/// The basis matrix `h` stores one lattice vector per row, which matches the
/// row-major order of the nine doubles the peer sends on the wire. The inverse
/// is kept alongside it exactly as supplied, because the peer is responsible for
/// keeping the two consistent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationCell {
    /// Lattice vectors as rows, in Å.
    h: Matrix3<f64>,
    /// Inverse of `h`, in 1/Å.
    inverse: Matrix3<f64>,
}

impl SimulationCell {
    /// Creates a cell from a basis and its inverse without checking their consistency.
    pub fn new(h: Matrix3<f64>, inverse: Matrix3<f64>) -> Self {
        Self { h, inverse }
    }

    /// Creates a cell from a basis and computes the inverse.
    ///
    /// Returns `None` if the basis is singular.
    pub fn from_basis(h: Matrix3<f64>) -> Option<Self> {
        h.try_inverse().map(|inverse| Self { h, inverse })
    }

    /// Creates an orthorhombic cell with edge lengths `a`, `b` and `c`.
    pub fn orthorhombic(a: f64, b: f64, c: f64) -> Option<Self> {
        Self::from_basis(Matrix3::from_diagonal(&Vector3::new(a, b, c)))
    }

    /// Builds a backend-unit cell from the row-major wire matrices, which are in bohr.
    ///
    /// The basis is scaled by the length factor and the inverse by its reciprocal.
    pub fn from_wire(h: &[f64; 9], inverse: &[f64; 9]) -> Self {
        let h = Matrix3::from_row_slice(h).map(units::length_to_backend);
        let inverse = Matrix3::from_row_slice(inverse).map(units::length_to_wire);
        Self::new(h, inverse)
    }

    pub fn basis(&self) -> &Matrix3<f64> {
        &self.h
    }

    pub fn inverse(&self) -> &Matrix3<f64> {
        &self.inverse
    }

    /// The `i`-th lattice vector.
    pub fn lattice_vector(&self, i: usize) -> Vector3<f64> {
        self.h.row(i).transpose()
    }

    /// Converts a Cartesian position into fractional coordinates.
    #[inline]
    pub fn to_fractional(&self, position: &Vector3<f64>) -> Vector3<f64> {
        self.inverse.tr_mul(position)
    }

    /// Converts fractional coordinates back into a Cartesian position.
    #[inline]
    pub fn to_cartesian(&self, fractional: &Vector3<f64>) -> Vector3<f64> {
        self.h.tr_mul(fractional)
    }

    pub fn volume(&self) -> f64 {
        self.h.determinant().abs()
    }

    /// Distances between opposite faces of the cell, one per lattice direction.
    pub fn perpendicular_widths(&self) -> Vector3<f64> {
        let a = self.lattice_vector(0);
        let b = self.lattice_vector(1);
        let c = self.lattice_vector(2);
        let volume = self.volume();
        Vector3::new(
            volume / b.cross(&c).norm(),
            volume / c.cross(&a).norm(),
            volume / a.cross(&b).norm(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_vec_close(a: &Vector3<f64>, b: &Vector3<f64>) {
        assert!((a - b).norm() < 1e-10, "{:?} != {:?}", a, b);
    }

    #[test]
    fn orthorhombic_cell_maps_between_cartesian_and_fractional() {
        let cell = SimulationCell::orthorhombic(10.0, 20.0, 5.0).unwrap();
        let frac = cell.to_fractional(&Vector3::new(5.0, 5.0, 5.0));
        assert_vec_close(&frac, &Vector3::new(0.5, 0.25, 1.0));
        assert_vec_close(&cell.to_cartesian(&frac), &Vector3::new(5.0, 5.0, 5.0));
    }

    #[test]
    fn triclinic_rows_are_lattice_vectors() {
        let h = Matrix3::new(4.0, 0.0, 0.0, 1.0, 3.0, 0.0, 0.5, 0.5, 6.0);
        let cell = SimulationCell::from_basis(h).unwrap();

        assert_vec_close(
            &cell.to_cartesian(&Vector3::new(0.0, 1.0, 0.0)),
            &Vector3::new(1.0, 3.0, 0.0),
        );
        let r = Vector3::new(2.3, -1.7, 4.4);
        assert_vec_close(&cell.to_cartesian(&cell.to_fractional(&r)), &r);
    }

    #[test]
    fn from_wire_scales_basis_and_inverse_consistently() {
        let a = 10.0 / units::LENGTH;
        let h = [a, 0.0, 0.0, 0.0, a, 0.0, 0.0, 0.0, a];
        let ih = [1.0 / a, 0.0, 0.0, 0.0, 1.0 / a, 0.0, 0.0, 0.0, 1.0 / a];
        let cell = SimulationCell::from_wire(&h, &ih);

        assert!((cell.basis()[(0, 0)] - 10.0).abs() < 1e-12);
        assert!((cell.inverse()[(2, 2)] - 0.1).abs() < 1e-12);
        assert!((cell.basis() * cell.inverse() - Matrix3::identity()).norm() < 1e-12);
    }

    #[test]
    fn singular_basis_is_rejected() {
        assert!(SimulationCell::from_basis(Matrix3::zeros()).is_none());
    }

    #[test]
    fn perpendicular_widths_of_a_sheared_cell() {
        let h = Matrix3::new(10.0, 0.0, 0.0, 5.0, 10.0, 0.0, 0.0, 0.0, 8.0);
        let cell = SimulationCell::from_basis(h).unwrap();
        let widths = cell.perpendicular_widths();
        assert!((cell.volume() - 800.0).abs() < 1e-9);
        assert!((widths.z - 8.0).abs() < 1e-9);
        assert!((widths.y - 10.0).abs() < 1e-9);
        assert!(widths.x < 10.0);
    }
}
