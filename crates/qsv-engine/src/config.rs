//! Configuration management for the simulation engine.
//!
//! Supports loading configuration from:
//! 1. Configuration files (YAML)
//! 2. Environment variables (with `QSV_` prefix)
//!
//! Configuration precedence (highest to lowest):
//! 1. Environment variables
//! 2. Configuration file
//! 3. Default values

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Widest register the engine will ever accept, whatever the config says.
/// A dense vector at this width is 4 GiB.
pub const HARD_MAX_QUBITS: usize = 28;

/// Widest register for which a full `4^n` density matrix may be built.
pub const HARD_MAX_DENSITY_QUBITS: usize = 12;

/// Complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Register and representation ceilings
    #[serde(default)]
    pub limits: LimitsConfig,

    /// Shot sampling defaults
    #[serde(default)]
    pub sampling: SamplingConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Register and representation ceilings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Largest register accepted
    #[serde(default = "default_max_qubits")]
    pub max_qubits: usize,

    /// Largest register simulated with a dense amplitude vector
    #[serde(default = "default_dense_qubit_limit")]
    pub dense_qubit_limit: usize,

    /// Largest register for which the full density matrix is produced
    #[serde(default = "default_max_density_qubits")]
    pub max_density_qubits: usize,

    /// Norm drift tolerated after a gate before renormalizing
    #[serde(default = "default_norm_tolerance")]
    pub norm_tolerance: f64,
}

/// Shot sampling defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Shots drawn when a request does not say otherwise
    #[serde(default = "default_shots")]
    pub shots: u64,

    /// RNG seed; `None` seeds from the OS
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format
    #[serde(default)]
    pub format: LogFormat,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable console output.
    #[default]
    Console,
    /// JSON structured logging.
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "console" => Ok(LogFormat::Console),
            "json" => Ok(LogFormat::Json),
            other => Err(ConfigError::ValidationError(format!(
                "Invalid log format: {other}"
            ))),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Console => write!(f, "console"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

// Default value functions
fn default_max_qubits() -> usize {
    qsv_sim::executor::DEFAULT_MAX_QUBITS
}

fn default_dense_qubit_limit() -> usize {
    qsv_sim::executor::DEFAULT_DENSE_QUBIT_LIMIT
}

fn default_max_density_qubits() -> usize {
    8
}

fn default_norm_tolerance() -> f64 {
    qsv_sim::executor::DEFAULT_NORM_TOLERANCE
}

fn default_shots() -> u64 {
    1024
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LimitsConfig {
    fn default() -> Self {
        LimitsConfig {
            max_qubits: default_max_qubits(),
            dense_qubit_limit: default_dense_qubit_limit(),
            max_density_qubits: default_max_density_qubits(),
            norm_tolerance: default_norm_tolerance(),
        }
    }
}

impl Default for SamplingConfig {
    fn default() -> Self {
        SamplingConfig {
            shots: default_shots(),
            seed: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

impl LimitsConfig {
    /// Executor options derived from these limits.
    pub fn executor_options(&self) -> qsv_sim::ExecutorOptions {
        qsv_sim::ExecutorOptions {
            max_qubits: self.max_qubits,
            dense_qubit_limit: self.dense_qubit_limit,
            norm_tolerance: self.norm_tolerance,
        }
    }
}

impl EngineConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        Self::from_yaml(&contents)
    }

    /// Parse and validate YAML text.
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_yaml_ng::from_str(contents)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration with the following precedence:
    /// 1. Environment variable overrides
    /// 2. File, if provided
    /// 3. Defaults
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => EngineConfig::default(),
        };

        let config = config.merge_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Merge `QSV_*` environment variables into this configuration.
    pub fn merge_env(self) -> Result<Self, ConfigError> {
        self.merge_vars(|name| std::env::var(name).ok())
    }

    /// Merge overrides from `lookup`, keyed by environment variable name.
    ///
    /// Only variables that are present override the current values. A
    /// present but unparsable value is an error.
    pub fn merge_vars<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Limits
        if let Some(v) = lookup("QSV_MAX_QUBITS") {
            self.limits.max_qubits = parse_var("QSV_MAX_QUBITS", &v)?;
        }
        if let Some(v) = lookup("QSV_DENSE_QUBIT_LIMIT") {
            self.limits.dense_qubit_limit = parse_var("QSV_DENSE_QUBIT_LIMIT", &v)?;
        }
        if let Some(v) = lookup("QSV_MAX_DENSITY_QUBITS") {
            self.limits.max_density_qubits = parse_var("QSV_MAX_DENSITY_QUBITS", &v)?;
        }

        // Sampling
        if let Some(v) = lookup("QSV_SHOTS") {
            self.sampling.shots = parse_var("QSV_SHOTS", &v)?;
        }
        if let Some(v) = lookup("QSV_SEED") {
            self.sampling.seed = Some(parse_var("QSV_SEED", &v)?);
        }

        // Logging
        if let Some(v) = lookup("QSV_LOG_LEVEL") {
            self.logging.level = v;
        }
        if let Some(v) = lookup("QSV_LOG_FORMAT") {
            self.logging.format = v.parse()?;
        }

        Ok(self)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let limits = &self.limits;

        if limits.max_qubits == 0 || limits.max_qubits > HARD_MAX_QUBITS {
            return Err(ConfigError::ValidationError(format!(
                "max_qubits must be between 1 and {HARD_MAX_QUBITS}, got {}",
                limits.max_qubits
            )));
        }

        if limits.dense_qubit_limit == 0 {
            return Err(ConfigError::ValidationError(
                "dense_qubit_limit must be greater than 0".to_string(),
            ));
        }

        if limits.max_density_qubits > HARD_MAX_DENSITY_QUBITS {
            return Err(ConfigError::ValidationError(format!(
                "max_density_qubits must be at most {HARD_MAX_DENSITY_QUBITS}, got {}",
                limits.max_density_qubits
            )));
        }

        if !(limits.norm_tolerance.is_finite() && limits.norm_tolerance > 0.0) {
            return Err(ConfigError::ValidationError(format!(
                "norm_tolerance must be a positive number, got {}",
                limits.norm_tolerance
            )));
        }

        if self.sampling.shots == 0 {
            return Err(ConfigError::ValidationError(
                "shots must be greater than 0".to_string(),
            ));
        }

        // Validate log level
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid log level: {other}"
                )));
            }
        }

        Ok(())
    }
}

fn parse_var<T: FromStr>(name: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
        name: name.to_string(),
        value: value.to_string(),
    })
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid value for {name}: {value:?}")]
    InvalidEnv { name: String, value: String },

    #[error("Validation error: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.limits.max_qubits, 15);
        assert_eq!(config.limits.dense_qubit_limit, 12);
        assert_eq!(config.limits.max_density_qubits, 8);
        assert_eq!(config.sampling.shots, 1024);
        assert_eq!(config.sampling.seed, None);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Console);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = EngineConfig::from_yaml(
            "limits:\n  max_qubits: 10\nlogging:\n  format: json\n",
        )
        .unwrap();
        assert_eq!(config.limits.max_qubits, 10);
        assert_eq!(config.limits.dense_qubit_limit, 12);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "sampling:\n  shots: 64\n  seed: 9").unwrap();
        let config = EngineConfig::from_file(file.path()).unwrap();
        assert_eq!(config.sampling.shots, 64);
        assert_eq!(config.sampling.seed, Some(9));
    }

    #[test]
    fn test_missing_file() {
        let err = EngineConfig::from_file("/nonexistent/qsv.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }

    #[test]
    fn test_malformed_yaml() {
        let err = EngineConfig::from_yaml("limits: [1, 2").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_env_overrides() {
        let config = EngineConfig::default()
            .merge_vars(vars(&[
                ("QSV_MAX_QUBITS", "20"),
                ("QSV_SEED", "42"),
                ("QSV_LOG_FORMAT", "JSON"),
                ("QSV_LOG_LEVEL", "debug"),
            ]))
            .unwrap();
        assert_eq!(config.limits.max_qubits, 20);
        assert_eq!(config.sampling.seed, Some(42));
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.sampling.shots, 1024);
    }

    #[test]
    fn test_env_rejects_garbage() {
        let err = EngineConfig::default()
            .merge_vars(vars(&[("QSV_SHOTS", "many")]))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidEnv {
                name: "QSV_SHOTS".to_string(),
                value: "many".to_string()
            }
        );
    }

    #[test]
    fn test_validate_limits() {
        let mut config = EngineConfig::default();
        config.limits.max_qubits = HARD_MAX_QUBITS + 1;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.limits.max_density_qubits = HARD_MAX_DENSITY_QUBITS + 1;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.sampling.shots = 0;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.limits.norm_tolerance = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let mut config = EngineConfig::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());
    }
}
