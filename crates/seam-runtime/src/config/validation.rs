//! Configuration validation utilities.

use super::error::{ConfigError, ConfigResult};
use super::schema::{BindingConfig, LogOutput, LoggingConfig, SeamConfig};

/// Validates the entire configuration.
pub fn validate_config(config: &SeamConfig) -> ConfigResult<()> {
    validate_binding_config(&config.binding)?;
    validate_logging_config(&config.logging)?;
    Ok(())
}

fn validate_binding_config(binding: &BindingConfig) -> ConfigResult<()> {
    let prefix = &binding.attribute_prefix;

    if prefix.is_empty() {
        return Err(ConfigError::validation(
            "binding.attribute_prefix must not be empty",
        ));
    }

    if prefix.chars().any(char::is_whitespace) {
        return Err(ConfigError::validation(format!(
            "binding.attribute_prefix must not contain whitespace: {prefix:?}"
        )));
    }

    Ok(())
}

fn validate_logging_config(logging: &LoggingConfig) -> ConfigResult<()> {
    if logging.output == LogOutput::File && logging.file_path.is_none() {
        return Err(ConfigError::validation(
            "logging.file_path is required when logging.output = \"file\"",
        ));
    }

    if let Some(module) = logging.filters.keys().find(|m| m.trim().is_empty()) {
        return Err(ConfigError::validation(format!(
            "logging.filters contains an empty module name: {module:?}"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogLevel;
    use std::path::PathBuf;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&SeamConfig::default()).is_ok());
    }

    #[test]
    fn test_rejects_empty_prefix() {
        let mut config = SeamConfig::default();
        config.binding.attribute_prefix.clear();
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::ValidationError { .. })
        ));
    }

    #[test]
    fn test_rejects_prefix_with_whitespace() {
        let mut config = SeamConfig::default();
        config.binding.attribute_prefix = "data -".into();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_file_output_needs_path() {
        let mut config = SeamConfig::default();
        config.logging.output = LogOutput::File;
        assert!(validate_config(&config).is_err());

        config.logging.file_path = Some(PathBuf::from("logs/seam.log"));
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_rejects_blank_filter_module() {
        let mut config = SeamConfig::default();
        config.logging.filters.insert(" ".into(), LogLevel::Debug);
        assert!(validate_config(&config).is_err());
    }
}
