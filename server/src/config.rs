//! Server configuration: bind address, storage root and the task table,
//! loaded once at startup. The task registry is built from this — there is
//! no other task creation path at runtime.

use std::{
    error::Error,
    fmt::{self, Display},
    io,
    net::SocketAddr,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::task::FlTask;

/// The configuration file's error type.
#[derive(Debug)]
pub enum ConfigErr {
    Io(io::Error),
    Parse(toml::de::Error),
    /// Caught before anything starts serving.
    Invalid { detail: String },
}

impl Display for ConfigErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigErr::Io(e) => write!(f, "failed to read config file: {e}"),
            ConfigErr::Parse(e) => write!(f, "failed to parse config file: {e}"),
            ConfigErr::Invalid { detail } => write!(f, "invalid config: {detail}"),
        }
    }
}

impl Error for ConfigErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConfigErr::Io(e) => Some(e),
            ConfigErr::Parse(e) => Some(e),
            ConfigErr::Invalid { .. } => None,
        }
    }
}

fn default_bind() -> SocketAddr {
    "0.0.0.0:5002".parse().unwrap()
}

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: SocketAddr,
    pub storage_root: PathBuf,
    #[serde(rename = "task", default)]
    pub tasks: Vec<FlTask>,
}

impl ServerConfig {
    /// Loads and validates the configuration at `path`.
    ///
    /// # Errors
    /// I/O, parse, or validation failure; nothing is served on any of them.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigErr> {
        let text = std::fs::read_to_string(path).map_err(ConfigErr::Io)?;
        let config: ServerConfig = toml::from_str(&text).map_err(ConfigErr::Parse)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigErr> {
        for task in &self.tasks {
            if task.trainable_parameter_names.is_empty() {
                return Err(ConfigErr::Invalid {
                    detail: format!("task '{}' has no trainable parameter names", task.id),
                });
            }
            if !(task.mixing_param > 0.0 && task.mixing_param <= 1.0) {
                return Err(ConfigErr::Invalid {
                    detail: format!(
                        "task '{}' mixing_param {} is outside (0, 1]",
                        task.id, task.mixing_param
                    ),
                });
            }
        }
        Ok(())
    }
}
