//! Configuration loading and typed config structures.
//!
//! Configuration is optional. When no file is named on the command line,
//! `minimaws.yaml` in the working directory is used if it exists; otherwise
//! every setting keeps its default. Environment variables override the file:
//!
//! - `MINIMAWS_DATABASE` overrides `database.path`
//! - `MINIMAWS_HOST` overrides `server.host`
//! - `MINIMAWS_PORT` overrides `server.port`
//!
//! Command-line flags are applied last, by the caller.

use std::path::{Path, PathBuf};
use std::time::Duration;

use minimaws_db::DatabaseConfig;
use minimaws_web::ServerConfig;
use minimaws_web::mime::SYSTEM_MIME_TYPES;
use serde::Deserialize;

/// Config file read when none is given explicitly.
pub const DEFAULT_CONFIG_FILE: &str = "minimaws.yaml";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// An environment override has a value of the wrong type.
    #[error("invalid value {value:?} for {key}: {reason}")]
    InvalidOverride {
        /// Name of the environment variable.
        key: &'static str,
        /// The rejected value.
        value: String,
        /// Why the value was rejected.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MinimawsConfig {
    /// Page server settings.
    #[serde(default)]
    pub server: ServerSection,

    /// Machine database settings.
    #[serde(default)]
    pub database: DatabaseSection,

    /// Static asset settings.
    #[serde(default)]
    pub assets: AssetsSection,
}

impl MinimawsConfig {
    /// Load configuration for this run.
    ///
    /// An explicitly named file must exist. Without one, the default file
    /// is read if present. Environment overrides are applied in both cases.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if a named file cannot be read,
    /// [`ConfigError::Yaml`] if its content is not valid, or
    /// [`ConfigError::InvalidOverride`] for a malformed override.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))
            }
            None => {
                let mut config = Self::default();
                config.apply_env_overrides()?;
                Ok(config)
            }
        }
    }

    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse_yaml(&contents)?;
        config.apply_env_overrides()?;
        tracing::debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// Parse configuration from a YAML string, without environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse_yaml(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Apply overrides from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOverride`] if `MINIMAWS_PORT` is not a
    /// port number.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides(
        &mut self,
        lookup: impl Fn(&'static str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(val) = lookup("MINIMAWS_DATABASE") {
            self.database.path = PathBuf::from(val);
        }
        if let Some(val) = lookup("MINIMAWS_HOST") {
            self.server.host = val;
        }
        if let Some(val) = lookup("MINIMAWS_PORT") {
            self.server.port = val.parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::InvalidOverride {
                    key: "MINIMAWS_PORT",
                    value: val.clone(),
                    reason: e.to_string(),
                }
            })?;
        }
        Ok(())
    }
}

/// Page server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerSection {
    /// Address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Base URI used in generated links. Taken from each request's `Host`
    /// header when unset.
    #[serde(default)]
    pub public_uri: Option<String>,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            public_uri: None,
        }
    }
}

impl ServerSection {
    /// Bind settings for the page server.
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            host: self.host.clone(),
            port: self.port,
        }
    }
}

/// Machine database configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DatabaseSection {
    /// Path of the `SQLite` database file.
    #[serde(default = "default_database_path")]
    pub path: PathBuf,

    /// Upper bound on pooled connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Seconds to wait for a free connection.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            max_connections: default_max_connections(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl DatabaseSection {
    /// Connection settings for the data layer.
    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig::new(&self.path)
            .with_max_connections(self.max_connections)
            .with_connect_timeout(Duration::from_secs(self.connect_timeout_secs))
    }
}

/// Static asset configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AssetsSection {
    /// Directory served under `/static`. The bundled assets are used when
    /// unset.
    #[serde(default)]
    pub directory: Option<PathBuf>,

    /// `mime.types` file extending the built-in content types. Set to
    /// `null` to use only the built-ins.
    #[serde(default = "default_mime_types")]
    pub mime_types: Option<PathBuf>,
}

impl Default for AssetsSection {
    fn default() -> Self {
        Self {
            directory: None,
            mime_types: default_mime_types(),
        }
    }
}

fn default_host() -> String {
    String::from("127.0.0.1")
}

const fn default_port() -> u16 {
    8080
}

fn default_database_path() -> PathBuf {
    PathBuf::from("minimaws.sqlite3")
}

const fn default_max_connections() -> u32 {
    4
}

const fn default_connect_timeout_secs() -> u64 {
    5
}

fn default_mime_types() -> Option<PathBuf> {
    Some(PathBuf::from(SYSTEM_MIME_TYPES))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::collections::HashMap;

    use super::*;

    #[test]
    fn default_config() {
        let config = MinimawsConfig::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.public_uri, None);
        assert_eq!(config.database.path, PathBuf::from("minimaws.sqlite3"));
        assert_eq!(config.database.max_connections, 4);
        assert_eq!(config.assets.directory, None);
        assert_eq!(config.assets.mime_types, Some(PathBuf::from("/etc/mime.types")));
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
server:
  host: "0.0.0.0"
  port: 9000
  public_uri: "https://maws.example/mame/"

database:
  path: /srv/mame/minimaws.sqlite3
  max_connections: 8
  connect_timeout_secs: 2

assets:
  directory: /srv/mame/static
  mime_types: null
"#;
        let config = MinimawsConfig::parse_yaml(yaml).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.public_uri.as_deref(), Some("https://maws.example/mame/"));
        assert_eq!(config.database.path, PathBuf::from("/srv/mame/minimaws.sqlite3"));
        assert_eq!(config.database.max_connections, 8);
        assert_eq!(config.database.connect_timeout_secs, 2);
        assert_eq!(config.assets.directory, Some(PathBuf::from("/srv/mame/static")));
        assert_eq!(config.assets.mime_types, None);
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = MinimawsConfig::parse_yaml("server:\n  port: 8123\n").unwrap();
        assert_eq!(config.server.port, 8123);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.database, DatabaseSection::default());
    }

    #[test]
    fn empty_yaml_is_default() {
        assert_eq!(MinimawsConfig::parse_yaml("").unwrap(), MinimawsConfig::default());
        assert_eq!(MinimawsConfig::parse_yaml("  \n").unwrap(), MinimawsConfig::default());
    }

    #[test]
    fn invalid_yaml_is_rejected() {
        let result = MinimawsConfig::parse_yaml("server:\n  port: lots\n");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn overrides_replace_values() {
        let env: HashMap<&str, &str> = [
            ("MINIMAWS_DATABASE", "/tmp/other.sqlite3"),
            ("MINIMAWS_HOST", "0.0.0.0"),
            ("MINIMAWS_PORT", "8081"),
        ]
        .into_iter()
        .collect();

        let mut config = MinimawsConfig::default();
        config
            .apply_overrides(|key| env.get(key).map(|v| (*v).to_owned()))
            .unwrap();
        assert_eq!(config.database.path, PathBuf::from("/tmp/other.sqlite3"));
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8081);
    }

    #[test]
    fn bad_port_override() {
        let mut config = MinimawsConfig::default();
        let result = config.apply_overrides(|key| {
            (key == "MINIMAWS_PORT").then(|| String::from("eighty"))
        });
        assert!(matches!(
            result,
            Err(ConfigError::InvalidOverride { key: "MINIMAWS_PORT", .. })
        ));
    }

    #[test]
    fn missing_named_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = MinimawsConfig::load(Some(&dir.path().join("absent.yaml")));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn sections_convert() {
        let config = MinimawsConfig::parse_yaml("server:\n  port: 9001\n").unwrap();
        let server = config.server.server_config();
        assert_eq!(server.port, 9001);
        assert_eq!(server.host, "127.0.0.1");
    }
}
