mod defaults;

use crate::cli::RunArgs;
use crate::error::{CliError, Result};
use defaults::DefaultsConfig;
use ipidriver::core::models::atom::TypeMap;
use ipidriver::engine::config as core_config;
use ipidriver::engine::transport::Endpoint;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialConnectionConfig {
    host: Option<String>,
    port: Option<u16>,
    #[serde(rename = "use-unix")]
    use_unix: Option<bool>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialSystemConfig {
    #[serde(rename = "coord-file")]
    coord_file: Option<PathBuf>,
    #[serde(rename = "potential-file")]
    potential_file: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialProtocolConfig {
    #[serde(rename = "require-init")]
    require_init: Option<bool>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialDriverConfig {
    connection: Option<PartialConnectionConfig>,
    system: Option<PartialSystemConfig>,
    #[serde(rename = "atom-types")]
    atom_types: Option<TypeMap>,
    protocol: Option<PartialProtocolConfig>,
    /// Directory relative file paths are resolved against.
    #[serde(skip)]
    base_dir: PathBuf,
}

impl PartialDriverConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        config.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(config)
    }

    pub fn merge_with_cli(mut self, args: &RunArgs) -> Result<core_config::DriverConfig> {
        self.apply_set_values(&args.set_values)?;
        let defaults = DefaultsConfig::default();

        let conn = self.connection.take().unwrap_or_default();
        let system = self.system.take().unwrap_or_default();
        let protocol = self.protocol.take().unwrap_or_default();

        let host = args
            .host
            .clone()
            .or(conn.host)
            .unwrap_or(defaults.host);
        let use_unix = args.unix || conn.use_unix.unwrap_or(defaults.use_unix);
        let endpoint = if use_unix {
            Endpoint::Unix { name: host }
        } else {
            Endpoint::Tcp {
                host,
                port: args.port.or(conn.port).unwrap_or(defaults.port),
            }
        };

        let resolve = |cli: Option<&PathBuf>, file: Option<PathBuf>, kind: &str| -> Result<PathBuf> {
            if let Some(path) = cli {
                return Ok(path.clone());
            }
            let path = file.ok_or_else(|| {
                CliError::Config(format!(
                    "A value for '{}' is required either in the config file or via CLI argument.",
                    kind
                ))
            })?;
            Ok(if path.is_absolute() {
                path
            } else {
                self.base_dir.join(path)
            })
        };

        let coord_file = resolve(args.coord_file.as_ref(), system.coord_file, "system.coord-file")?;
        let potential_file = resolve(
            args.potential_file.as_ref(),
            system.potential_file,
            "system.potential-file",
        )?;

        let type_map = self.atom_types.take().ok_or_else(|| {
            CliError::Config("`atom-types` section is required.".to_string())
        })?;

        core_config::DriverConfigBuilder::new()
            .endpoint(endpoint)
            .coord_file(coord_file)
            .potential_file(potential_file)
            .type_map(type_map)
            .require_init(
                args.require_init || protocol.require_init.unwrap_or(defaults.require_init),
            )
            .build()
            .map_err(|e| CliError::Config(e.to_string()))
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let (key, value_str) = kv_pair.split_once('=').ok_or_else(|| {
                CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                ))
            })?;

            let invalid =
                |kind: &str| CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value_str));

            match key {
                "connection.host" => {
                    self.connection.get_or_insert_with(Default::default).host =
                        Some(value_str.to_string());
                }
                "connection.port" => {
                    self.connection.get_or_insert_with(Default::default).port =
                        Some(value_str.parse().map_err(|_| invalid("port"))?);
                }
                "connection.use-unix" => {
                    self.connection.get_or_insert_with(Default::default).use_unix =
                        Some(value_str.parse().map_err(|_| invalid("boolean"))?);
                }
                "system.coord-file" => {
                    self.system.get_or_insert_with(Default::default).coord_file =
                        Some(PathBuf::from(value_str));
                }
                "system.potential-file" => {
                    self.system.get_or_insert_with(Default::default).potential_file =
                        Some(PathBuf::from(value_str));
                }
                "protocol.require-init" => {
                    self.protocol.get_or_insert_with(Default::default).require_init =
                        Some(value_str.parse().map_err(|_| invalid("boolean"))?);
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}
