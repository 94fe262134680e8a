//! Conversion between the wire unit system (bohr, hartree) and the backend
//! unit system (Å, eV).
//!
//! All conversions are elementwise and operate in place. None of them can fail.

/// Bohr to Å.
pub const LENGTH: f64 = 0.52917721;
/// Hartree to eV.
pub const ENERGY: f64 = 27.21138602;
/// Hartree/bohr to eV/Å.
pub const FORCE: f64 = ENERGY / LENGTH;

/// Sign applied to every virial component on its way back to the wire.
pub const VIRIAL_SIGN: f64 = 1.0;

#[inline]
pub fn length_to_backend(value: f64) -> f64 {
    value * LENGTH
}

#[inline]
pub fn length_to_wire(value: f64) -> f64 {
    value / LENGTH
}

#[inline]
pub fn energy_to_backend(value: f64) -> f64 {
    value * ENERGY
}

#[inline]
pub fn energy_to_wire(value: f64) -> f64 {
    value / ENERGY
}

#[inline]
pub fn force_to_backend(value: f64) -> f64 {
    value * FORCE
}

#[inline]
pub fn force_to_wire(value: f64) -> f64 {
    value / FORCE
}

/// Virial components carry energy dimensions only.
#[inline]
pub fn virial_to_wire(value: f64) -> f64 {
    energy_to_wire(value) * VIRIAL_SIGN
}

pub fn lengths_to_backend(values: &mut [f64]) {
    values.iter_mut().for_each(|v| *v = length_to_backend(*v));
}

pub fn lengths_to_wire(values: &mut [f64]) {
    values.iter_mut().for_each(|v| *v = length_to_wire(*v));
}

pub fn forces_to_backend(values: &mut [f64]) {
    values.iter_mut().for_each(|v| *v = force_to_backend(*v));
}

pub fn forces_to_wire(values: &mut [f64]) {
    values.iter_mut().for_each(|v| *v = force_to_wire(*v));
}

pub fn virial_components_to_wire(values: &mut [f64]) {
    values.iter_mut().for_each(|v| *v = virial_to_wire(*v));
}
