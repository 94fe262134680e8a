use ipidriver::engine::error::EngineError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Driver(#[from] EngineError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse file '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use ipidriver::engine::error::ProtocolViolation;

    #[test]
    fn driver_errors_keep_their_own_message() {
        let err: CliError = EngineError::from(ProtocolViolation::NoPendingResult).into();
        assert_eq!(
            err.to_string(),
            "Protocol violation: GETFORCE received but no frame has been computed"
        );
    }

    #[test]
    fn parse_failures_name_the_file() {
        let source = toml::from_str::<toml::Table>("port = ").unwrap_err();
        let err = CliError::FileParsing {
            path: PathBuf::from("conf/driver.toml"),
            source: source.into(),
        };
        assert!(
            err.to_string()
                .starts_with("Failed to parse file 'conf/driver.toml': ")
        );
    }
}
