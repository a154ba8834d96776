//! Configuration management.
//!
//! Settings come from a TOML file merged over built-in defaults:
//!
//! ```toml
//! [csv]
//! delimiter = ","
//! write_index = true
//!
//! [logging]
//! level = "info"
//! format = "pretty"
//! file = "/var/log/loopcsv.log"
//! ```

use crate::io::CsvOptions;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "LOOPCSV_CONFIG_PATH";

/// Main configuration for loopcsv.
#[derive(Debug, Clone, Default)]
pub struct LoopCsvConfig {
    /// CSV reading and writing options.
    pub csv: CsvOptions,
    /// Logging settings, resolved by the observability layer.
    pub logging: LoggingSettings,
    /// File the configuration was loaded from, if any.
    pub source: Option<PathBuf>,
}

/// Logging section of the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Filter directive, e.g. `info` or `loopcsv=debug`.
    pub level: Option<String>,
    /// `pretty` or `json`.
    pub format: Option<String>,
    /// Log file; logs go to stderr when unset.
    pub file: Option<PathBuf>,
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    /// CSV section.
    pub csv: Option<ConfigFileCsv>,
    /// Logging section.
    pub logging: Option<LoggingSettings>,
}

/// CSV section in config file.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFileCsv {
    /// Single-character delimiter; `\t` or `tab` for tabs.
    pub delimiter: Option<String>,
    /// Write a leading index column on export.
    pub write_index: Option<bool>,
}

impl LoopCsvConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves the configuration for a run.
    ///
    /// An explicit path wins, then [`CONFIG_PATH_ENV`], then the default
    /// locations. Explicit files must load; default locations that fail to
    /// parse are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly named file cannot be read or parsed.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from_file(path);
        }
        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV).filter(|p| !p.is_empty()) {
            return Self::load_from_file(Path::new(&path));
        }
        Ok(Self::load_default())
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::operation("read_config_file", format!("{}: {e}", path.display()))
        })?;
        let file: ConfigFile = toml::from_str(&contents).map_err(|e| {
            Error::operation("parse_config_file", format!("{}: {e}", path.display()))
        })?;

        let mut config = Self::from_config_file(file)?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    /// Loads configuration from the default location.
    ///
    /// Checks the following paths in order:
    /// 1. Platform-specific config dir (`~/Library/Application Support/loopcsv/` on macOS)
    /// 2. `~/.config/loopcsv/` for Unix compatibility
    ///
    /// Returns default configuration if no config file is found.
    #[must_use]
    pub fn load_default() -> Self {
        let Some(base_dirs) = directories::BaseDirs::new() else {
            return Self::default();
        };

        let candidates = [
            base_dirs.config_dir().join("loopcsv").join("config.toml"),
            base_dirs
                .home_dir()
                .join(".config")
                .join("loopcsv")
                .join("config.toml"),
        ];
        for path in candidates.iter().filter(|p| p.exists()) {
            match Self::load_from_file(path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Ignoring config file");
                },
            }
        }

        Self::default()
    }

    /// Merges a parsed file over the defaults.
    fn from_config_file(file: ConfigFile) -> Result<Self> {
        let mut config = Self::default();

        if let Some(csv) = file.csv {
            if let Some(delimiter) = csv.delimiter {
                config.csv.delimiter = parse_delimiter(&delimiter)?;
            }
            if let Some(write_index) = csv.write_index {
                config.csv.write_index = write_index;
            }
        }
        if let Some(logging) = file.logging {
            config.logging = logging;
        }

        Ok(config)
    }

    /// Renders the effective configuration as TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String> {
        let file = ConfigFile {
            csv: Some(ConfigFileCsv {
                delimiter: Some(format_delimiter(self.csv.delimiter)),
                write_index: Some(self.csv.write_index),
            }),
            logging: Some(self.logging.clone()),
        };
        toml::to_string(&file).map_err(|e| Error::operation("serialize_config", e))
    }

    /// Sets the CSV delimiter.
    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.csv.delimiter = delimiter;
        self
    }

    /// Sets whether exports carry an index column.
    #[must_use]
    pub const fn with_write_index(mut self, write_index: bool) -> Self {
        self.csv.write_index = write_index;
        self
    }
}

/// Parses a delimiter setting into a single byte.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] unless the setting is one ASCII character,
/// `\t`, or `tab`.
pub fn parse_delimiter(s: &str) -> Result<u8> {
    match s {
        "\\t" | "tab" | "\t" => Ok(b'\t'),
        _ => match s.as_bytes() {
            [b] if b.is_ascii() => Ok(*b),
            _ => Err(Error::InvalidInput(format!(
                "delimiter must be a single ASCII character, got {s:?}"
            ))),
        },
    }
}

fn format_delimiter(delimiter: u8) -> String {
    if delimiter == b'\t' {
        "\\t".to_string()
    } else {
        char::from(delimiter).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = LoopCsvConfig::new();
        assert_eq!(config.csv.delimiter, b',');
        assert!(config.csv.write_index);
        assert!(config.logging.level.is_none());
        assert!(config.source.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[csv]\ndelimiter = \"tab\"\nwrite_index = false\n\n\
             [logging]\nlevel = \"debug\"\nformat = \"json\""
        )
        .unwrap();

        let config = LoopCsvConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.csv.delimiter, b'\t');
        assert!(!config.csv.write_index);
        assert_eq!(config.logging.level.as_deref(), Some("debug"));
        assert_eq!(config.logging.format.as_deref(), Some("json"));
        assert_eq!(config.source.as_deref(), Some(file.path()));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[csv]\ndelimiter = \";\"").unwrap();
        let config = LoopCsvConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.csv.delimiter, b';');
        assert!(config.csv.write_index);
    }

    #[test]
    fn test_bad_files() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[csv\n").unwrap();
        assert!(matches!(
            LoopCsvConfig::load_from_file(file.path()),
            Err(Error::OperationFailed { .. })
        ));

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[csv]\ndelimiter = \"::\"").unwrap();
        assert!(matches!(
            LoopCsvConfig::load_from_file(file.path()),
            Err(Error::InvalidInput(_))
        ));

        assert!(LoopCsvConfig::load_from_file(Path::new("/nonexistent/config.toml")).is_err());
    }

    #[test]
    fn test_explicit_path_wins() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[csv]\nwrite_index = false").unwrap();
        let config = LoopCsvConfig::load(Some(file.path())).unwrap();
        assert!(!config.csv.write_index);
    }

    #[test]
    fn test_to_toml_roundtrip() {
        let config = LoopCsvConfig::new().with_delimiter(b'\t').with_write_index(false);
        let text = config.to_toml().unwrap();
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(text.as_bytes()).unwrap();
        let back = LoopCsvConfig::load_from_file(file.path()).unwrap();
        assert_eq!(back.csv, config.csv);
    }
}
