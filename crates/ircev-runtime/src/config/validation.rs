//! Configuration validation utilities.

use super::error::{ConfigError, ConfigResult};
use super::schema::{ClientConfig, IrcevConfig, LogOutput, LoggingConfig};

/// Validates the entire configuration.
pub fn validate_config(config: &IrcevConfig) -> ConfigResult<()> {
    validate_client_config(&config.client)?;
    validate_logging_config(&config.logging)?;
    Ok(())
}

/// Validates the client identity.
fn validate_client_config(client: &ClientConfig) -> ConfigResult<()> {
    if client.nick.is_empty() {
        return Err(ConfigError::missing_field("client.nick"));
    }

    // A space would split the NICK command into two parameters.
    if client.nick.contains(' ') {
        return Err(ConfigError::validation("Nickname cannot contain spaces"));
    }

    if client.user.is_empty() {
        return Err(ConfigError::missing_field("client.user"));
    }

    if client.version.is_empty() {
        return Err(ConfigError::missing_field("client.version"));
    }

    Ok(())
}

/// Validates logging settings.
fn validate_logging_config(logging: &LoggingConfig) -> ConfigResult<()> {
    if logging.output == LogOutput::File && logging.file_path.is_none() {
        return Err(ConfigError::missing_field("logging.file_path"));
    }

    if let Some(target) = logging.filters.keys().find(|target| target.is_empty()) {
        return Err(ConfigError::validation(format!(
            "Invalid log filter target: {target:?}"
        )));
    }

    Ok(())
}
