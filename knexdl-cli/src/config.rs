use std::{collections::HashMap, error::Error, fmt::Display, path::PathBuf};

use serde::{Deserialize, Serialize};

pub const CONFIG_FILE: &str = "knexdl.toml";
const DEFAULT_ENV_FILE: &str = ".env";
const DEFAULT_KNEX_DIR: &str = "node_modules/knex";
const DEFAULT_TYPES_DIR: &str = "node_modules/@types/knexdl";
const DEFAULT_OUTPUT: &str = "src/";

#[derive(Debug, Clone)]
pub enum ConfigError {
    EnvironmentKeyMissing { name: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::EnvironmentKeyMissing { name } => write!(f, "Env: {name} not defined"),
        }
    }
}

impl Error for ConfigError {}

/// Optional `knexdl.toml`; command line flags take precedence over it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[must_use]
pub struct TomlConfig {
    pub env_file: Option<PathBuf>,
    pub knex_dir: Option<PathBuf>,
    pub types_dir: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

impl TomlConfig {
    pub fn load() -> Result<Self, Box<dyn Error>> {
        if !std::fs::exists(CONFIG_FILE)? {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(CONFIG_FILE).map_err(|error| {
            format!("encountered '{error}' attempting to read {CONFIG_FILE}")
        })?;
        Ok(toml::from_str(&text)?)
    }

    pub fn with_defaults() -> Self {
        Self {
            env_file: Some(DEFAULT_ENV_FILE.into()),
            knex_dir: Some(DEFAULT_KNEX_DIR.into()),
            types_dir: Some(DEFAULT_TYPES_DIR.into()),
            output: Some(DEFAULT_OUTPUT.into()),
        }
    }

    pub fn env_file(&self, flag: Option<PathBuf>) -> PathBuf {
        flag.or_else(|| self.env_file.clone())
            .unwrap_or_else(|| DEFAULT_ENV_FILE.into())
    }

    pub fn knex_dir(&self, flag: Option<PathBuf>) -> PathBuf {
        flag.or_else(|| self.knex_dir.clone())
            .unwrap_or_else(|| DEFAULT_KNEX_DIR.into())
    }

    pub fn types_dir(&self) -> PathBuf {
        self.types_dir
            .clone()
            .unwrap_or_else(|| DEFAULT_TYPES_DIR.into())
    }

    pub fn output(&self, flag: Option<PathBuf>) -> PathBuf {
        flag.or_else(|| self.output.clone())
            .unwrap_or_else(|| DEFAULT_OUTPUT.into())
    }
}

pub fn connection_string(
    vars: &HashMap<String, String>,
    environment: &str,
) -> Result<String, ConfigError> {
    vars.get(environment)
        .filter(|value| !value.is_empty())
        .cloned()
        .ok_or_else(|| ConfigError::EnvironmentKeyMissing {
            name: environment.to_owned(),
        })
}
