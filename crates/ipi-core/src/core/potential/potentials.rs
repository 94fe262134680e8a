#[inline]
pub fn lennard_jones_12_6(dist: f64, r_min: f64, well_depth: f64) -> f64 {
    if dist < 1e-6 {
        return 1e10;
    }
    let rho = r_min / dist;
    let rho6 = rho.powi(6);
    let rho12 = rho6 * rho6;
    well_depth * (rho12 - 2.0 * rho6)
}

/// `-dE/dr` divided by `r`, so that the force on atom `i` is this factor times `r_i - r_j`.
#[inline]
pub fn lennard_jones_12_6_force_over_r(dist: f64, r_min: f64, well_depth: f64) -> f64 {
    if dist < 1e-6 {
        return 0.0;
    }
    let rho = r_min / dist;
    let rho6 = rho.powi(6);
    let rho12 = rho6 * rho6;
    12.0 * well_depth * (rho12 - rho6) / (dist * dist)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lennard_jones_minimum_is_at_r_min_with_depth_epsilon() {
        let e = lennard_jones_12_6(3.0, 3.0, 0.2);
        assert!((e + 0.2).abs() < 1e-12);
        assert!(lennard_jones_12_6_force_over_r(3.0, 3.0, 0.2).abs() < 1e-12);
    }

    #[test]
    fn lennard_jones_is_repulsive_inside_and_attractive_outside_r_min() {
        assert!(lennard_jones_12_6_force_over_r(2.5, 3.0, 0.2) > 0.0);
        assert!(lennard_jones_12_6_force_over_r(4.0, 3.0, 0.2) < 0.0);
    }

    #[test]
    fn force_matches_numerical_derivative() {
        let (r_min, eps, r) = (3.4, 0.0104, 3.9);
        let h = 1e-6;
        let numeric =
            -(lennard_jones_12_6(r + h, r_min, eps) - lennard_jones_12_6(r - h, r_min, eps))
                / (2.0 * h);
        let analytic = lennard_jones_12_6_force_over_r(r, r_min, eps) * r;
        assert!((numeric - analytic).abs() < 1e-8);
    }

    #[test]
    fn overlapping_atoms_are_capped() {
        assert_eq!(lennard_jones_12_6(0.0, 3.0, 0.2), 1e10);
        assert_eq!(lennard_jones_12_6_force_over_r(0.0, 3.0, 0.2), 0.0);
    }
}
