//! # Core Module
//!
//! Stateless building blocks that sit between the wire format and the evaluator.
//!
//! ## Architecture
//!
//! - **Units** ([`units`]) - Conversion factors between atomic units and Å/eV
//! - **Molecular Representation** ([`models`]) - Atoms, type maps and the periodic cell
//! - **Geometry** ([`utils`]) - Wrapping into the primary cell and minimum-image helpers
//! - **Atom Ordering** ([`ordering`]) - The permutation between wire order and backend order
//! - **File I/O** ([`io`]) - Coordinate files that define the atom names of a session
//! - **Evaluators** ([`potential`]) - The [`potential::ComputeOracle`] seam and a reference backend
//!
//! Nothing in this module holds state across protocol messages; that is the job of
//! [`crate::engine`].

pub mod io;
pub mod models;
pub mod ordering;
pub mod potential;
pub mod units;
pub mod utils;
