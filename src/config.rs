// config.rs

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use crate::error::ConfigurationError;
use crate::persistence::HISTORY_FILE_NAME;

pub const LOG_DIR: &str = "CALCULATOR_LOG_DIR";
pub const HISTORY_DIR: &str = "CALCULATOR_HISTORY_DIR";
pub const MAX_HISTORY_SIZE: &str = "CALCULATOR_MAX_HISTORY_SIZE";
pub const AUTO_SAVE: &str = "CALCULATOR_AUTO_SAVE";
pub const PRECISION: &str = "CALCULATOR_PRECISION";
pub const MAX_INPUT_VALUE: &str = "CALCULATOR_MAX_INPUT_VALUE";

#[derive(Debug, Clone, PartialEq)]
pub struct CalculatorConfig {
    pub log_dir: PathBuf,
    pub history_dir: PathBuf,
    pub max_history_size: NonZeroUsize,
    pub auto_save: bool,
    /// Decimal places results are rounded to.
    pub precision: u32,
    pub max_input_value: f64,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("logs"),
            history_dir: PathBuf::from("history"),
            max_history_size: NonZeroUsize::new(100).unwrap_or(NonZeroUsize::MIN),
            auto_save: true,
            precision: 2,
            max_input_value: 1e10,
        }
    }
}

impl CalculatorConfig {
    /// Read the process environment. Callers that honor a `.env` file load
    /// it into the environment first.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from any key lookup; unset keys take defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigurationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let max_history_size = match get(MAX_HISTORY_SIZE) {
            None => defaults.max_history_size,
            Some(raw) => {
                let n = parse_int::<usize>(MAX_HISTORY_SIZE, &raw)?;
                NonZeroUsize::new(n).ok_or(ConfigurationError::NotPositive {
                    key: MAX_HISTORY_SIZE,
                    value: raw,
                })?
            }
        };
        let precision = match get(PRECISION) {
            None => defaults.precision,
            Some(raw) => parse_int::<u32>(PRECISION, &raw)?,
        };
        let max_input_value = match get(MAX_INPUT_VALUE) {
            None => defaults.max_input_value,
            Some(raw) => {
                let v: f64 = raw.trim().parse().map_err(|_| ConfigurationError::InvalidFloat {
                    key: MAX_INPUT_VALUE,
                    value: raw.clone(),
                })?;
                if v.is_nan() || v <= 0.0 {
                    return Err(ConfigurationError::NotPositive {
                        key: MAX_INPUT_VALUE,
                        value: raw,
                    });
                }
                v
            }
        };

        Ok(Self {
            log_dir: get(LOG_DIR).map(PathBuf::from).unwrap_or(defaults.log_dir),
            history_dir: get(HISTORY_DIR).map(PathBuf::from).unwrap_or(defaults.history_dir),
            max_history_size,
            auto_save: get(AUTO_SAVE).map(|v| parse_bool(&v)).unwrap_or(defaults.auto_save),
            precision,
            max_input_value,
        })
    }

    pub fn history_file(&self) -> PathBuf {
        self.history_dir.join(HISTORY_FILE_NAME)
    }

    pub fn ensure_dirs(&self) -> Result<(), ConfigurationError> {
        for dir in [&self.log_dir, &self.history_dir] {
            create_dir(dir)?;
        }
        Ok(())
    }
}

fn create_dir(path: &Path) -> Result<(), ConfigurationError> {
    std::fs::create_dir_all(path).map_err(|e| ConfigurationError::Directory {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn parse_int<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigurationError> {
    raw.trim().parse().map_err(|_| ConfigurationError::InvalidInteger {
        key,
        value: raw.to_string(),
    })
}

fn parse_bool(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<CalculatorConfig, ConfigurationError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        CalculatorConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn unset_keys_take_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config, CalculatorConfig::default());
        assert_eq!(config.max_history_size.get(), 100);
        assert_eq!(config.history_file(), PathBuf::from("history").join(HISTORY_FILE_NAME));
    }

    #[test]
    fn values_are_read_from_lookup() {
        let config = config_from(&[
            (LOG_DIR, "/tmp/calc/logs"),
            (HISTORY_DIR, "/tmp/calc/hist"),
            (MAX_HISTORY_SIZE, "5"),
            (AUTO_SAVE, "No"),
            (PRECISION, "4"),
            (MAX_INPUT_VALUE, "1000.5"),
        ])
        .unwrap();
        assert_eq!(config.log_dir, PathBuf::from("/tmp/calc/logs"));
        assert_eq!(config.max_history_size.get(), 5);
        assert!(!config.auto_save);
        assert_eq!(config.precision, 4);
        assert_eq!(config.max_input_value, 1000.5);
    }

    #[test]
    fn truthy_spellings_enable_auto_save() {
        for raw in ["true", "1", "YES", "On"] {
            assert!(config_from(&[(AUTO_SAVE, raw)]).unwrap().auto_save);
        }
    }

    #[test]
    fn bad_values_are_configuration_errors() {
        assert_eq!(
            config_from(&[(MAX_HISTORY_SIZE, "lots")]),
            Err(ConfigurationError::InvalidInteger {
                key: MAX_HISTORY_SIZE,
                value: "lots".to_string()
            })
        );
        assert!(matches!(
            config_from(&[(MAX_HISTORY_SIZE, "0")]),
            Err(ConfigurationError::NotPositive { .. })
        ));
        assert!(matches!(
            config_from(&[(PRECISION, "-1")]),
            Err(ConfigurationError::InvalidInteger { .. })
        ));
        assert!(matches!(
            config_from(&[(MAX_INPUT_VALUE, "big")]),
            Err(ConfigurationError::InvalidFloat { .. })
        ));
    }

    #[test]
    fn dotenv_file_entries_feed_the_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(
            &path,
            "# calculator settings\nCALCULATOR_MAX_HISTORY_SIZE=7\nCALCULATOR_AUTO_SAVE=false\nCALCULATOR_HISTORY_DIR=\"/var/calc history\"\n",
        )
        .unwrap();
        let map: HashMap<String, String> = dotenvy::from_path_iter(&path)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        let config = CalculatorConfig::from_lookup(|key| map.get(key).cloned()).unwrap();
        assert_eq!(config.max_history_size.get(), 7);
        assert!(!config.auto_save);
        assert_eq!(config.history_dir, PathBuf::from("/var/calc history"));
        assert_eq!(config.precision, CalculatorConfig::default().precision);
    }

    #[test]
    fn ensure_dirs_creates_both_directories() {
        let dir = tempfile::tempdir().unwrap();
        let config = CalculatorConfig {
            log_dir: dir.path().join("logs"),
            history_dir: dir.path().join("a").join("history"),
            ..CalculatorConfig::default()
        };
        config.ensure_dirs().unwrap();
        assert!(config.log_dir.is_dir());
        assert!(config.history_dir.is_dir());
    }
}
