use std::fmt;
use std::path::{Path, PathBuf};

use clap::Parser;
use configparser::ini::Ini;

use crate::error::ConfigError;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DATA_FILE: &str = "data/data.json";
const DEFAULT_MAX_BODY_BYTES: usize = 100 * 1024;

/// Command line, with environment fallbacks for every setting
#[derive(Debug, Default, Parser)]
#[command(name = "flatstore", version, about = "JSON record store over HTTP")]
pub struct Cli {
  /// INI config file; flags and environment variables override its values
  #[arg(short, long, env = "FLATSTORE_CONFIG")]
  pub config: Option<PathBuf>,

  /// Address to bind
  #[arg(long, env = "FLATSTORE_HOST")]
  pub host: Option<String>,

  /// Port to listen on
  #[arg(short, long, env = "PORT")]
  pub port: Option<u16>,

  /// Shared secret required for create, update and delete
  #[arg(long, env = "API_KEY", hide_env_values = true)]
  pub api_key: Option<String>,

  /// Path of the JSON data file
  #[arg(long, env = "DATA_FILE")]
  pub data_file: Option<PathBuf>,

  /// Largest accepted request body in bytes
  #[arg(long, env = "MAX_BODY_BYTES")]
  pub max_body_bytes: Option<usize>,

  /// Log level used when RUST_LOG is unset
  #[arg(long, env = "LOG_LEVEL")]
  pub log_level: Option<String>,
}

/// Log configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
  /// Log level, default is "info"
  pub level: String,
}

fn default_log_level() -> String {
  "info".to_string()
}

impl Default for LogConfig {
  fn default() -> Self {
    Self {
      level: default_log_level(),
    }
  }
}

/// Service configuration
#[derive(Clone)]
pub struct Config {
  /// Address to bind
  pub host: String,
  /// Port to listen on
  pub port: u16,
  /// Shared secret for mutating requests
  pub api_key: String,
  /// JSON data file
  pub data_file: PathBuf,
  /// Request body limit in bytes
  pub max_body_bytes: usize,
  /// Log configuration
  pub log: LogConfig,
}

impl fmt::Debug for Config {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Config")
      .field("host", &self.host)
      .field("port", &self.port)
      .field("api_key", &"<redacted>")
      .field("data_file", &self.data_file)
      .field("max_body_bytes", &self.max_body_bytes)
      .field("log", &self.log)
      .finish()
  }
}

/// Settings read from an INI file, all optional
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FileConfig {
  pub host: Option<String>,
  pub port: Option<u16>,
  pub api_key: Option<String>,
  pub data_file: Option<PathBuf>,
  pub max_body_bytes: Option<usize>,
  pub log_level: Option<String>,
}

impl FileConfig {
  /// Load settings from an INI file
  pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
    let mut ini = Ini::new();
    ini
      .load(path)
      .map_err(|reason| ConfigError::File {
        path: path.to_path_buf(),
        reason,
      })?;
    Self::from_ini(&ini)
  }

  /// Parse settings from INI text
  pub fn from_ini_str(text: &str) -> Result<Self, ConfigError> {
    let mut ini = Ini::new();
    ini
      .read(text.to_string())
      .map_err(|reason| ConfigError::File {
        path: PathBuf::from("<inline>"),
        reason,
      })?;
    Self::from_ini(&ini)
  }

  fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
    Ok(Self {
      host: ini.get("server", "host"),
      port: parse_value(ini, "server", "port")?,
      api_key: ini.get("server", "api_key"),
      data_file: ini.get("store", "data_file").map(PathBuf::from),
      max_body_bytes: parse_value(ini, "server", "max_body_bytes")?,
      log_level: ini.get("log", "level"),
    })
  }
}

fn parse_value<T>(ini: &Ini, section: &str, key: &str) -> Result<Option<T>, ConfigError>
where
  T: std::str::FromStr,
  T::Err: fmt::Display,
{
  ini
    .get(section, key)
    .map(|raw| {
      raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key: format!("{}.{}", section, key),
        reason: e.to_string(),
      })
    })
    .transpose()
}

impl Config {
  /// Resolve the configuration: flags and environment first, then the INI
  /// file named by `--config`, then defaults
  pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
    let file = match &cli.config {
      Some(path) => FileConfig::from_file(path)?,
      None => FileConfig::default(),
    };
    Self::resolve(cli, file)
  }

  /// Merge command line values over file values
  pub fn resolve(cli: &Cli, file: FileConfig) -> Result<Self, ConfigError> {
    let api_key = cli
      .api_key
      .clone()
      .or(file.api_key)
      .filter(|key| !key.is_empty())
      .ok_or(ConfigError::MissingApiKey)?;

    Ok(Self {
      host: cli
        .host
        .clone()
        .or(file.host)
        .unwrap_or_else(|| DEFAULT_HOST.to_string()),
      port: cli.port.or(file.port).unwrap_or(DEFAULT_PORT),
      api_key,
      data_file: cli
        .data_file
        .clone()
        .or(file.data_file)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE)),
      max_body_bytes: cli
        .max_body_bytes
        .or(file.max_body_bytes)
        .unwrap_or(DEFAULT_MAX_BODY_BYTES),
      log: LogConfig {
        level: cli
          .log_level
          .clone()
          .or(file.log_level)
          .unwrap_or_else(default_log_level),
      },
    })
  }

  /// Listening address as `host:port`
  pub fn server_addr(&self) -> String {
    format!("{}:{}", self.host, self.port)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn cli_with_key(key: &str) -> Cli {
    Cli {
      api_key: Some(key.to_string()),
      ..Cli::default()
    }
  }

  #[test]
  fn test_defaults() {
    let config = Config::resolve(&cli_with_key("secret"), FileConfig::default()).unwrap();
    assert_eq!(config.host, "0.0.0.0");
    assert_eq!(config.port, 3000);
    assert_eq!(config.api_key, "secret");
    assert_eq!(config.data_file, PathBuf::from("data/data.json"));
    assert_eq!(config.max_body_bytes, 100 * 1024);
    assert_eq!(config.log, LogConfig::default());
    assert_eq!(config.server_addr(), "0.0.0.0:3000");
  }

  #[test]
  fn test_missing_api_key_is_an_error() {
    let err = Config::resolve(&Cli::default(), FileConfig::default()).unwrap_err();
    assert!(matches!(err, ConfigError::MissingApiKey));

    let err = Config::resolve(&cli_with_key(""), FileConfig::default()).unwrap_err();
    assert!(matches!(err, ConfigError::MissingApiKey));
  }

  #[test]
  fn test_parse_ini() {
    let config_str = r#"
[server]
host = 127.0.0.1
port = 8080
api_key = from-file
max_body_bytes = 2048

[store]
data_file = /tmp/flatstore/data.json

[log]
level = debug
"#;

    let file = FileConfig::from_ini_str(config_str).unwrap();
    assert_eq!(file.host.as_deref(), Some("127.0.0.1"));
    assert_eq!(file.port, Some(8080));
    assert_eq!(file.api_key.as_deref(), Some("from-file"));
    assert_eq!(file.max_body_bytes, Some(2048));
    assert_eq!(file.data_file, Some(PathBuf::from("/tmp/flatstore/data.json")));
    assert_eq!(file.log_level.as_deref(), Some("debug"));

    let config = Config::resolve(&Cli::default(), file).unwrap();
    assert_eq!(config.server_addr(), "127.0.0.1:8080");
    assert_eq!(config.api_key, "from-file");
    assert_eq!(config.log.level, "debug");
  }

  #[test]
  fn test_cli_overrides_file() {
    let file = FileConfig::from_ini_str("[server]\nport = 8080\napi_key = from-file\n").unwrap();
    let cli = Cli {
      port: Some(9090),
      api_key: Some("from-cli".to_string()),
      ..Cli::default()
    };

    let config = Config::resolve(&cli, file).unwrap();
    assert_eq!(config.port, 9090);
    assert_eq!(config.api_key, "from-cli");
  }

  #[test]
  fn test_invalid_port_in_file() {
    let err = FileConfig::from_ini_str("[server]\nport = not-a-port\n").unwrap_err();
    match err {
      ConfigError::InvalidValue { key, .. } => assert_eq!(key, "server.port"),
      other => panic!("Expected invalid value error, got {:?}", other),
    }
  }

  #[test]
  fn test_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("flatstore.ini");
    std::fs::write(&path, "[server]\napi_key = k\nport = 4000\n").unwrap();

    let cli = Cli {
      config: Some(path),
      ..Cli::default()
    };
    let config = Config::load(&cli).unwrap();
    assert_eq!(config.port, 4000);
    assert_eq!(config.api_key, "k");
  }

  #[test]
  fn test_missing_config_file() {
    let cli = Cli {
      config: Some(PathBuf::from("/nonexistent/flatstore.ini")),
      api_key: Some("k".to_string()),
      ..Cli::default()
    };
    assert!(matches!(Config::load(&cli), Err(ConfigError::File { .. })));
  }

  #[test]
  fn test_debug_redacts_api_key() {
    let config = Config::resolve(&cli_with_key("super-secret"), FileConfig::default()).unwrap();
    let printed = format!("{:?}", config);
    assert!(!printed.contains("super-secret"));
    assert!(printed.contains("<redacted>"));
  }

  #[test]
  fn test_cli_parses_flags() {
    let cli = Cli::try_parse_from([
      "flatstore",
      "--port",
      "8081",
      "--api-key",
      "k",
      "--data-file",
      "/srv/data.json",
    ])
    .unwrap();
    assert_eq!(cli.port, Some(8081));
    assert_eq!(cli.api_key.as_deref(), Some("k"));
    assert_eq!(cli.data_file, Some(PathBuf::from("/srv/data.json")));
  }
}
