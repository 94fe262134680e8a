use super::transport::Endpoint;
use crate::core::models::atom::TypeMap;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Behavior switches of the protocol engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EngineOptions {
    /// Start in `NEEDINIT` and refuse POSDATA/GETFORCE until the peer sends INIT.
    ///
    /// Off by default: the engine then starts ready and INIT has no effect on its state.
    pub require_init: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DriverConfig {
    pub endpoint: Endpoint,
    /// XYZ file whose atom names define the wire order.
    pub coord_file: PathBuf,
    /// Parameter file of the evaluator.
    pub potential_file: PathBuf,
    pub type_map: TypeMap,
    pub options: EngineOptions,
}

#[derive(Default)]
pub struct DriverConfigBuilder {
    endpoint: Option<Endpoint>,
    coord_file: Option<PathBuf>,
    potential_file: Option<PathBuf>,
    type_map: Option<TypeMap>,
    require_init: Option<bool>,
}

impl DriverConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn endpoint(mut self, endpoint: Endpoint) -> Self {
        self.endpoint = Some(endpoint);
        self
    }
    pub fn coord_file(mut self, path: PathBuf) -> Self {
        self.coord_file = Some(path);
        self
    }
    pub fn potential_file(mut self, path: PathBuf) -> Self {
        self.potential_file = Some(path);
        self
    }
    pub fn type_map(mut self, map: TypeMap) -> Self {
        self.type_map = Some(map);
        self
    }
    pub fn require_init(mut self, require: bool) -> Self {
        self.require_init = Some(require);
        self
    }

    pub fn build(self) -> Result<DriverConfig, ConfigError> {
        let endpoint = self
            .endpoint
            .ok_or(ConfigError::MissingParameter("endpoint"))?;
        if let Endpoint::Unix { name } = &endpoint {
            if name.is_empty() {
                return Err(ConfigError::InvalidParameter {
                    name: "endpoint",
                    reason: "unix socket name must not be empty".to_string(),
                });
            }
        }

        let type_map = self
            .type_map
            .ok_or(ConfigError::MissingParameter("type_map"))?;
        if type_map.is_empty() {
            return Err(ConfigError::InvalidParameter {
                name: "type_map",
                reason: "at least one atom type is required".to_string(),
            });
        }

        Ok(DriverConfig {
            endpoint,
            coord_file: self
                .coord_file
                .ok_or(ConfigError::MissingParameter("coord_file"))?,
            potential_file: self
                .potential_file
                .ok_or(ConfigError::MissingParameter("potential_file"))?,
            type_map,
            options: EngineOptions {
                require_init: self.require_init.unwrap_or(false),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn water() -> TypeMap {
        [("O", 0), ("H", 1)].into_iter().collect()
    }

    fn complete() -> DriverConfigBuilder {
        DriverConfigBuilder::new()
            .endpoint(Endpoint::Tcp {
                host: "localhost".into(),
                port: 31415,
            })
            .coord_file(PathBuf::from("conf.xyz"))
            .potential_file(PathBuf::from("lj.toml"))
            .type_map(water())
    }

    #[test]
    fn complete_builder_produces_config_with_default_options() {
        let config = complete().build().unwrap();
        assert_eq!(config.coord_file, PathBuf::from("conf.xyz"));
        assert_eq!(config.type_map.get("H"), Some(1));
        assert!(!config.options.require_init);
    }

    #[test]
    fn require_init_is_carried_into_options() {
        let config = complete().require_init(true).build().unwrap();
        assert!(config.options.require_init);
    }

    #[test]
    fn missing_fields_are_named() {
        let err = DriverConfigBuilder::new()
            .type_map(water())
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigError::MissingParameter("endpoint"));

        let err = DriverConfigBuilder::new()
            .endpoint(Endpoint::Unix {
                name: "driver".into(),
            })
            .type_map(water())
            .coord_file(PathBuf::from("conf.xyz"))
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigError::MissingParameter("potential_file"));
    }

    #[test]
    fn empty_type_map_is_invalid() {
        let err = complete().type_map(TypeMap::new()).build().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidParameter {
                name: "type_map",
                ..
            }
        ));
    }

    #[test]
    fn empty_unix_socket_name_is_invalid() {
        let err = complete()
            .endpoint(Endpoint::Unix {
                name: String::new(),
            })
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidParameter {
                name: "endpoint",
                ..
            }
        ));
    }
}
