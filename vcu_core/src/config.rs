//! TOML configuration loader with validation.
//!
//! Loads a [`VcuConfig`] from a TOML file (or string), applying defaults
//! for omitted fields and running the full parameter validation before
//! the core is constructed.

use std::path::Path;

use vcu_common::config::VcuConfig;

// ─── Error Type ─────────────────────────────────────────────────────

/// Configuration loading/validation error.
#[derive(Debug)]
pub enum ConfigError {
    /// File I/O error.
    IoError(String),
    /// TOML parse error.
    ParseError(String),
    /// Parameter validation error.
    ValidationError(vcu_common::config::ConfigError),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IoError(e) => write!(f, "config I/O error: {e}"),
            Self::ParseError(e) => write!(f, "config parse error: {e}"),
            Self::ValidationError(e) => write!(f, "config validation: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ─── Loading Functions ──────────────────────────────────────────────

/// Load and validate the timing-core configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<VcuConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        ConfigError::IoError(format!("failed to read {}: {e}", path.display()))
    })?;
    load_config_from_str(&text)
}

/// Parse and validate a configuration from TOML text.
pub fn load_config_from_str(text: &str) -> Result<VcuConfig, ConfigError> {
    let config: VcuConfig =
        toml::from_str(text).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    config.validate().map_err(ConfigError::ValidationError)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_toml_takes_defaults() {
        let cfg = load_config_from_str("").unwrap();
        assert_eq!(cfg, VcuConfig::default());
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let err = load_config_from_str("t2_s = ").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)), "got: {err}");
    }

    #[test]
    fn out_of_bounds_value_is_a_validation_error() {
        let err = load_config_from_str("t2_s = -1.0").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)), "got: {err}");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_config(Path::new("/nonexistent/vcu.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)), "got: {err}");
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "t2_s = 6.5\nt4_s = 4.0").unwrap();
        let cfg = load_config(file.path()).unwrap();
        assert_eq!(cfg.t2_s, 6.5);
        assert_eq!(cfg.t4_s, 4.0);
        // Omitted fields keep their defaults.
        assert_eq!(cfg.t3_s, VcuConfig::default().t3_s);
    }
}
