//! # ipidriver
//!
//! A client for the i-PI socket protocol. The driver connects to an i-PI
//! server, receives cells and coordinates, evaluates energies, forces and
//! virials with a pluggable backend, and returns them in the server's units.
//!
//! ## Architecture
//!
//! The library has three layers:
//!
//! - **[`core`]: The Foundation.** Stateless pieces: unit conversion, the periodic
//!   cell, wrapping into the primary image, the atom-order mapping, coordinate
//!   files, and the [`core::potential::ComputeOracle`] seam.
//!
//! - **[`engine`]: The Protocol.** The wire codec and the per-connection state
//!   machine ([`engine::session::ProtocolEngine`]) that owns the cached frame.
//!
//! - **[`workflows`]: The Public API.** Runs a complete session from a
//!   [`engine::config::DriverConfig`].

pub mod core;
pub mod engine;
pub mod workflows;
