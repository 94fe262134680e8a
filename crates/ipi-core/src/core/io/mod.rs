//! Reading of coordinate files that define the atom set of a session.
//!
//! Only the atom names and their order matter to the driver; positions are
//! superseded by the first POSDATA message from the peer.

pub mod traits;
pub mod xyz;
