//! # Workflows Module
//!
//! Top-level entry points that tie [`crate::core`] and [`crate::engine`] together.
//!
//! - **Drive Workflow** ([`drive`]) - Load the atom set, connect to the peer and serve
//!   energies and forces until the peer hangs up.

pub mod drive;
