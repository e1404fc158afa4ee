//! Layered configuration for the server and the client front-ends.
//!
//! Priority (highest first):
//! 1. CLI arguments
//! 2. Environment variables (via clap `env` attributes)
//! 3. TOML config file (`<config dir>/dayplan/config.toml`)
//! 4. Compiled defaults

use std::path::{Path, PathBuf};

use serde::Deserialize;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";
pub const DEFAULT_API_URL: &str = "http://localhost:5000/todos";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    ParseToml(#[from] toml::de::Error),
}

/// Config file layout; every field is optional so a file can override only
/// part of the defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    server: ServerSection,
    client: ClientSection,
    log_level: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ServerSection {
    bind_addr: Option<String>,
    seed_sample_tasks: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ClientSection {
    api_url: Option<String>,
    log_file: Option<PathBuf>,
}

/// Values given on the command line (or through their environment variables).
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub config_path: Option<PathBuf>,
    pub bind_addr: Option<String>,
    pub api_url: Option<String>,
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
    /// `Some(false)` when sample seeding was switched off on the command line.
    pub seed_sample_tasks: Option<bool>,
}

/// Fully resolved configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Address the API server binds to.
    pub bind_addr: String,
    /// Collection URL the client talks to.
    pub api_url: String,
    /// Log filter used when `RUST_LOG` is not set.
    pub log_level: String,
    /// Log file of the terminal UI; `None` means the temp dir default.
    pub log_file: Option<PathBuf>,
    /// Whether the server starts with a sample day of tasks.
    pub seed_sample_tasks: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            log_level: "info".to_string(),
            log_file: None,
            seed_sample_tasks: true,
        }
    }
}

impl Config {
    /// Loads the config file and merges it with `overrides`.
    ///
    /// An explicit `config_path` must exist; the default path may be absent.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] if the file cannot be read or parsed.
    pub fn load(overrides: &Overrides) -> Result<Self, ConfigError> {
        let file = load_config_file(overrides.config_path.as_deref())?;
        Ok(Self::resolve(overrides, &file))
    }

    fn resolve(overrides: &Overrides, file: &ConfigFile) -> Self {
        let defaults = Self::default();
        Config {
            bind_addr: overrides
                .bind_addr
                .clone()
                .or_else(|| file.server.bind_addr.clone())
                .unwrap_or(defaults.bind_addr),
            api_url: overrides
                .api_url
                .clone()
                .or_else(|| file.client.api_url.clone())
                .unwrap_or(defaults.api_url),
            log_level: overrides
                .log_level
                .clone()
                .or_else(|| file.log_level.clone())
                .unwrap_or(defaults.log_level),
            log_file: overrides.log_file.clone().or_else(|| file.client.log_file.clone()),
            seed_sample_tasks: overrides
                .seed_sample_tasks
                .or(file.server.seed_sample_tasks)
                .unwrap_or(defaults.seed_sample_tasks),
        }
    }

    /// Log file of the terminal UI.
    pub fn ui_log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("dayplan.log"))
    }
}

/// Default location of the config file, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("dayplan").join("config.toml"))
}

fn load_config_file(explicit_path: Option<&Path>) -> Result<ConfigFile, ConfigError> {
    if let Some(path) = explicit_path {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        return Ok(toml::from_str(&contents)?);
    }

    let Some(path) = default_config_path() else {
        return Ok(ConfigFile::default());
    };
    match std::fs::read_to_string(&path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ConfigFile::default()),
        Err(source) => Err(ConfigError::ReadFile { path, source }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_listen_on_port_5000() {
        let config = Config::default();
        assert_eq!(config.bind_addr, "0.0.0.0:5000");
        assert_eq!(config.api_url, "http://localhost:5000/todos");
        assert!(config.seed_sample_tasks);
    }

    #[test]
    fn file_values_fill_in_defaults() {
        let file: ConfigFile = toml::from_str(
            r#"
log_level = "debug"

[server]
seed_sample_tasks = false
"#,
        )
        .unwrap();
        let config = Config::resolve(&Overrides::default(), &file);

        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(config.log_level, "debug");
        assert!(!config.seed_sample_tasks);
    }

    #[test]
    fn overrides_beat_file() {
        let file: ConfigFile = toml::from_str(
            r#"
[server]
bind_addr = "127.0.0.1:8080"

[client]
api_url = "http://planner.local/todos"
"#,
        )
        .unwrap();
        let overrides = Overrides {
            bind_addr: Some("0.0.0.0:3000".into()),
            ..Default::default()
        };
        let config = Config::resolve(&overrides, &file);

        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.api_url, "http://planner.local/todos");
    }

    #[test]
    fn explicit_file_is_loaded() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[client]\nlog_file = \"/tmp/plan.log\"").unwrap();

        let overrides = Overrides {
            config_path: Some(file.path().to_path_buf()),
            ..Default::default()
        };
        let config = Config::load(&overrides).unwrap();
        assert_eq!(config.ui_log_path(), PathBuf::from("/tmp/plan.log"));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let overrides = Overrides {
            config_path: Some(PathBuf::from("/nonexistent/dayplan.toml")),
            ..Default::default()
        };
        assert!(matches!(Config::load(&overrides), Err(ConfigError::ReadFile { .. })));
    }
}
