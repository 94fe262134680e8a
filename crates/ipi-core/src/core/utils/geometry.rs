use crate::core::models::cell::SimulationCell;
use nalgebra::Vector3;

/// Reduces a fractional coordinate into `[0, 1)`.
///
/// `x - floor(x)` can round to exactly `1.0` for tiny negative inputs, and can
/// come out negative for some huge ones, so both ends are corrected explicitly.
#[inline]
pub fn wrap_fraction(x: f64) -> f64 {
    let mut wrapped = x - x.floor();
    if wrapped < 0.0 {
        wrapped += 1.0;
    }
    if wrapped >= 1.0 {
        wrapped -= 1.0;
    }
    wrapped
}

/// Wraps every position into the primary image of `cell`.
///
/// Each position goes to fractional coordinates through the cell inverse, each
/// component is reduced into `[0, 1)`, and the result goes back through the basis.
pub fn wrap_into_cell(cell: &SimulationCell, positions: &mut [Vector3<f64>]) {
    for position in positions.iter_mut() {
        let fractional = cell.to_fractional(position).map(wrap_fraction);
        *position = cell.to_cartesian(&fractional);
    }
}

/// Shortest fractional separation between two images, each component in `[-0.5, 0.5]`.
#[inline]
pub fn minimum_image_fraction(delta: &Vector3<f64>) -> Vector3<f64> {
    delta.map(|d| d - d.round())
}

/// Minimum-image displacement from `b` to `a` in Cartesian coordinates.
pub fn minimum_image_displacement(
    cell: &SimulationCell,
    a: &Vector3<f64>,
    b: &Vector3<f64>,
) -> Vector3<f64> {
    let delta = cell.to_fractional(&(a - b));
    cell.to_cartesian(&minimum_image_fraction(&delta))
}

/// Splits a flat `[x0, y0, z0, x1, ...]` buffer into vectors.
///
/// Trailing values that do not fill a whole vector are dropped.
pub fn unflatten(values: &[f64]) -> Vec<Vector3<f64>> {
    values
        .chunks_exact(3)
        .map(|c| Vector3::new(c[0], c[1], c[2]))
        .collect()
}

/// Joins vectors into a flat `[x0, y0, z0, x1, ...]` buffer.
pub fn flatten(vectors: &[Vector3<f64>]) -> Vec<f64> {
    vectors.iter().flat_map(|v| [v.x, v.y, v.z]).collect()
}
