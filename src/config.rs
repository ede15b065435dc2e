//! Server configuration.
//!
//! The binary accepts either an explicit `<host> <port>` pair, or the path
//! to a YAML file carrying a [`Config`].

use serde::Deserialize;
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

fn default_backlog() -> u32 {
    128
}

/// Settings of the listening socket.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Host to bind, a name or an address literal.
    pub host: String,

    /// Port to bind.
    pub port: u16,

    /// Listen backlog.  Kept modest, but never below 10.
    #[serde(default = "default_backlog")]
    pub backlog: u32,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("cannot parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid port {0:?}")]
    Port(String),
    #[error("listen backlog must be at least 10, got {0}")]
    Backlog(u32),
}

impl Config {
    pub fn new(host: String, port: u16) -> Config {
        Config {
            host,
            port,
            backlog: default_backlog(),
        }
    }

    /// Builds the configuration from `<host> <port>` command-line arguments.
    pub fn from_host_port(host: &str, port: &str) -> Result<Config, ConfigError> {
        let port = port.parse().map_err(|_| ConfigError::Port(port.to_owned()))?;
        Ok(Config::new(host.to_owned(), port))
    }

    /// Loads the configuration from a YAML file.
    pub fn from_file(path: &Path) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config: Config =
            serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        config.validate()
    }

    fn validate(self) -> Result<Config, ConfigError> {
        if self.backlog < 10 {
            return Err(ConfigError::Backlog(self.backlog));
        }
        Ok(self)
    }
}
