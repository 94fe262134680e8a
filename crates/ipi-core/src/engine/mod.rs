//! # Engine Module
//!
//! The stateful half of the driver: everything that lives for the duration of a
//! connection to the i-PI peer.
//!
//! ## Architecture
//!
//! - **Framing** ([`codec`]) - Headers, payload layouts and the fixed reply tokens
//! - **Session** ([`session`]) - The [`session::ProtocolEngine`] state machine
//! - **State Tracking** ([`state`]) - Connection phases and the cached frame
//! - **Transport** ([`transport`]) - TCP and unix domain socket endpoints
//! - **Configuration** ([`config`]) - Driver settings and their builder
//! - **Progress Monitoring** ([`progress`]) - Callback hooks for frame events
//! - **Error Handling** ([`error`]) - Framing, protocol and evaluator failures
//!
//! Every error surfaced here ends the session. The only normal way for a session
//! to end is the peer closing the connection between two messages.

pub mod codec;
pub mod config;
pub mod error;
pub mod progress;
pub mod session;
pub mod state;
pub mod transport;
