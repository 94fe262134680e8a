//! # Core Models Module
//!
//! Plain data structures shared by every layer of the driver.
//!
//! ## Key Components
//!
//! - [`atom`] - Named atoms, the ordered [`atom::AtomSet`] and the name-to-type [`atom::TypeMap`]
//! - [`cell`] - The periodic [`cell::SimulationCell`] with its basis and inverse
//!
//! All lengths held by these models are in backend units (Å). Conversion from the
//! wire happens at the boundary, see [`crate::core::units`].

pub mod atom;
pub mod cell;
