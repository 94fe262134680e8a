use super::config::ConfigError;
use crate::core::io::xyz::XyzError;
use crate::core::ordering::MappingError;
use crate::core::potential::OracleError;
use crate::core::potential::params::ParamLoadError;
use std::io;
use thiserror::Error;

/// The channel ended or failed while a message was being transferred.
#[derive(Debug, Error)]
pub enum FramingError {
    /// The peer closed the connection before sending any byte of a new message.
    #[error("Channel closed by peer")]
    ChannelClosed,
    #[error("Channel closed after {received} of {expected} bytes")]
    Truncated { expected: usize, received: usize },
    #[error("I/O error on channel: {0}")]
    Io(#[from] io::Error),
}

/// The peer sent something the protocol does not allow at this point.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolViolation {
    #[error("Unexpected header '{0}'")]
    UnexpectedHeader(String),
    #[error("Atom count changed from {expected} to {received}")]
    AtomCountChanged { expected: usize, received: usize },
    #[error("Peer sent {received} atoms but the coordinate file defines {configured}")]
    AtomCountMismatch { configured: usize, received: usize },
    #[error("Negative {field} on the wire: {value}")]
    NegativeValue { field: &'static str, value: i32 },
    #[error("INIT payload of {len} bytes exceeds the limit of {max} bytes")]
    InitPayloadTooLarge { len: usize, max: usize },
    #[error("GETFORCE received but no frame has been computed")]
    NoPendingResult,
    #[error("{command} received before INIT")]
    NotInitialized { command: &'static str },
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Framing error: {0}")]
    Framing(#[from] FramingError),

    #[error("Protocol violation: {0}")]
    Protocol(#[from] ProtocolViolation),

    #[error("Atom '{name}' (index {index}) has no entry in the type map")]
    UnknownAtomType { name: String, index: usize },

    #[error("Compute oracle failed: {0}")]
    Oracle(#[from] OracleError),

    #[error("Failed to connect to {endpoint}: {source}")]
    Connection {
        endpoint: String,
        #[source]
        source: io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Failed to read coordinate file: {0}")]
    CoordinateFile(#[from] XyzError),

    #[error("Failed to load potential parameters: {0}")]
    Parameters(#[from] ParamLoadError),

    #[error("Internal logic error: {0}")]
    Internal(String),
}

impl From<MappingError> for EngineError {
    fn from(e: MappingError) -> Self {
        match e {
            MappingError::UnknownAtomType { name, index } => {
                EngineError::UnknownAtomType { name, index }
            }
            other @ MappingError::LengthMismatch { .. } => EngineError::Internal(other.to_string()),
        }
    }
}

impl From<io::Error> for EngineError {
    fn from(e: io::Error) -> Self {
        EngineError::Framing(FramingError::Io(e))
    }
}

impl EngineError {
    /// Whether this error is the peer closing the connection at a message boundary.
    pub fn is_clean_close(&self) -> bool {
        matches!(self, EngineError::Framing(FramingError::ChannelClosed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_atom_type_keeps_its_own_category() {
        let err: EngineError = MappingError::UnknownAtomType {
            name: "Xe".into(),
            index: 4,
        }
        .into();
        assert!(matches!(err, EngineError::UnknownAtomType { ref name, index: 4 } if name == "Xe"));
    }

    #[test]
    fn buffer_length_errors_are_internal() {
        let err: EngineError = MappingError::LengthMismatch {
            expected: 6,
            actual: 3,
            atoms: 2,
            components: 3,
        }
        .into();
        assert!(matches!(err, EngineError::Internal(_)));
    }

    #[test]
    fn only_channel_closed_is_a_clean_close() {
        assert!(EngineError::from(FramingError::ChannelClosed).is_clean_close());
        assert!(
            !EngineError::from(FramingError::Truncated {
                expected: 12,
                received: 3
            })
            .is_clean_close()
        );
        assert!(!EngineError::from(ProtocolViolation::NoPendingResult).is_clean_close());
    }

    #[test]
    fn messages_name_the_offending_values() {
        let err = EngineError::from(ProtocolViolation::AtomCountChanged {
            expected: 3,
            received: 4,
        });
        assert_eq!(
            err.to_string(),
            "Protocol violation: Atom count changed from 3 to 4"
        );
    }
}
