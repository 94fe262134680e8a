use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct PairParam {
    /// The two atom types this entry applies to; order does not matter.
    pub types: [usize; 2],
    /// Distance of the energy minimum in Å.
    pub r_min: f64,
    /// Depth of the well in eV.
    pub well_depth: f64,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct RawPairTable {
    cutoff: f64,
    #[serde(default)]
    pairs: Vec<PairParam>,
}

/// Pairwise Lennard-Jones parameters keyed by unordered type pair.
#[derive(Debug, Clone, PartialEq)]
pub struct PairTable {
    pub cutoff: f64,
    pairs: HashMap<(usize, usize), PairParam>,
}

#[derive(Debug, Error)]
pub enum ParamLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Invalid parameter: {0}")]
    Invalid(String),
}

#[inline]
fn key(a: usize, b: usize) -> (usize, usize) {
    (a.min(b), a.max(b))
}

impl PairTable {
    pub fn new(cutoff: f64) -> Self {
        Self {
            cutoff,
            pairs: HashMap::new(),
        }
    }

    pub fn insert(&mut self, param: PairParam) {
        let [a, b] = param.types;
        self.pairs.insert(key(a, b), param);
    }

    pub fn get(&self, a: usize, b: usize) -> Option<&PairParam> {
        self.pairs.get(&key(a, b))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn load(path: &Path) -> Result<Self, ParamLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| ParamLoadError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::from_toml_str(&content).map_err(|e| match e {
            ParamLoadError::Toml { source, .. } => ParamLoadError::Toml {
                path: path.to_string_lossy().to_string(),
                source,
            },
            other => other,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ParamLoadError> {
        let raw: RawPairTable = toml::from_str(content).map_err(|e| ParamLoadError::Toml {
            path: "<string>".to_string(),
            source: e,
        })?;

        if !(raw.cutoff.is_finite() && raw.cutoff > 0.0) {
            return Err(ParamLoadError::Invalid(format!(
                "cutoff must be positive, got {}",
                raw.cutoff
            )));
        }

        let mut table = Self::new(raw.cutoff);
        for param in raw.pairs {
            if param.r_min <= 0.0 {
                return Err(ParamLoadError::Invalid(format!(
                    "r-min for types {:?} must be positive, got {}",
                    param.types, param.r_min
                )));
            }
            table.insert(param);
        }
        Ok(table)
    }
}
