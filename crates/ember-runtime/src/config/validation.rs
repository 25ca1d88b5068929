//! Configuration validation utilities.

use std::collections::HashSet;

use super::error::{ConfigError, ConfigResult};
use super::schema::{BotConfig, EmberConfig, LogOutput, LoggingConfig};

/// Validates the entire configuration.
pub fn validate_config(config: &EmberConfig) -> ConfigResult<()> {
    validate_logging_config(&config.logging)?;
    validate_bots_config(&config.bots)?;
    Ok(())
}

/// Validates logging settings.
fn validate_logging_config(logging: &LoggingConfig) -> ConfigResult<()> {
    if logging.output == LogOutput::File && logging.file_path.is_none() {
        return Err(ConfigError::missing_field("logging.file_path"));
    }

    if let Some(module) = logging.filters.keys().find(|m| m.trim().is_empty()) {
        return Err(ConfigError::validation(format!(
            "Log filter module name cannot be blank: {module:?}"
        )));
    }

    Ok(())
}

/// Validates all bot configurations.
fn validate_bots_config(bots: &[BotConfig]) -> ConfigResult<()> {
    let mut seen_ids = HashSet::new();

    for bot in bots {
        if !seen_ids.insert(&bot.id) {
            return Err(ConfigError::DuplicateBotId(bot.id.clone()));
        }

        validate_bot_config(bot)?;
    }

    Ok(())
}

/// Validates a single bot configuration.
fn validate_bot_config(bot: &BotConfig) -> ConfigResult<()> {
    if bot.id.is_empty() {
        return Err(ConfigError::missing_field("bot.id"));
    }

    if bot.id.contains(char::is_whitespace) {
        return Err(ConfigError::validation(format!(
            "Bot ID cannot contain whitespace: {:?}",
            bot.id
        )));
    }

    if bot.handlers.iter().any(|h| h.trim().is_empty()) {
        return Err(ConfigError::validation(format!(
            "Bot {} lists a blank handler id",
            bot.id
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn bot(id: &str, handlers: &[&str]) -> BotConfig {
        BotConfig {
            id: id.to_string(),
            name: None,
            handlers: handlers.iter().map(|h| h.to_string()).collect(),
            enabled: true,
        }
    }

    #[test]
    fn test_validate_empty_config() {
        assert!(validate_config(&EmberConfig::default()).is_ok());
    }

    #[test]
    fn test_validate_duplicate_bot_id() {
        let config = EmberConfig {
            bots: vec![bot("10001", &["echo"]), bot("10001", &[])],
            ..Default::default()
        };

        let result = validate_config(&config);
        assert!(matches!(result, Err(ConfigError::DuplicateBotId(id)) if id == "10001"));
    }

    #[test]
    fn test_validate_bot_ids_and_handlers() {
        let empty = EmberConfig {
            bots: vec![bot("", &[])],
            ..Default::default()
        };
        assert!(matches!(
            validate_config(&empty),
            Err(ConfigError::MissingField { .. })
        ));

        let spaced = EmberConfig {
            bots: vec![bot("my bot", &[])],
            ..Default::default()
        };
        assert!(validate_config(&spaced).is_err());

        let blank_handler = EmberConfig {
            bots: vec![bot("10001", &["echo", " "])],
            ..Default::default()
        };
        assert!(validate_config(&blank_handler).is_err());
    }

    #[test]
    fn test_validate_file_output_requires_path() {
        let mut config = EmberConfig::default();
        config.logging.output = LogOutput::File;
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::MissingField { field }) if field == "logging.file_path"
        ));

        config.logging.file_path = Some(PathBuf::from("logs/ember.log"));
        assert!(validate_config(&config).is_ok());
    }
}
