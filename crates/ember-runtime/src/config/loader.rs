//! Configuration loader using figment.
//!
//! This module provides a layered configuration loading system that supports:
//!
//! - **Multiple sources**: TOML/YAML files, environment variables, programmatic defaults
//! - **Layered configuration**: Later sources override earlier ones
//! - **Profile support**: Development vs production configurations
//!
//! # Feature Flags
//!
//! - `toml-config` *(default)*: enables TOML configuration files (`ember.toml`, `config.toml`)
//! - `yaml-config`: enables YAML configuration files (`ember.yaml`, `ember.yml`, etc.)
//!
//! Both features can be enabled simultaneously; if so, both file formats are searched and loaded.
//!
//! # Configuration Priority (lowest to highest)
//!
//! 1. Built-in defaults
//! 2. Programmatic merges ([`ConfigLoader::merge`])
//! 3. Profile-specific config file (`ember.{profile}.toml` / `ember.{profile}.yaml`)
//! 4. Main config file (`ember.toml` / `ember.yaml`)
//! 5. Environment variables (`EMBER_*`)
//!
//! # Environment Variable Mapping
//!
//! Environment variables are mapped using the `EMBER_` prefix with `__` as separator:
//!
//! - `EMBER_LOGGING__LEVEL=debug` → `logging.level = "debug"`
//! - `EMBER_DISPATCH__STRICT_HANDLERS=true` → `dispatch.strict_handlers = true`
//!
//! # Example
//!
//! ```rust,ignore
//! use ember_runtime::config::ConfigLoader;
//!
//! // Simple loading from default locations
//! let config = ConfigLoader::new().load()?;
//!
//! // Load with specific profile
//! let config = ConfigLoader::new()
//!     .profile("production")
//!     .load()?;
//!
//! // Load from specific file without env overrides
//! let config = ConfigLoader::new()
//!     .file("./config/ember.toml")
//!     .without_env()
//!     .load()?;
//! ```

use std::path::{Path, PathBuf};

use figment::Figment;
#[cfg(any(feature = "yaml-config", feature = "toml-config"))]
use figment::providers::Format;
#[cfg(feature = "toml-config")]
use figment::providers::Toml;
#[cfg(feature = "yaml-config")]
use figment::providers::Yaml;
use figment::providers::{Env, Serialized};
use tracing::{debug, info, trace, warn};

use super::error::{ConfigError, ConfigResult};
use super::schema::EmberConfig;
use super::validation::validate_config;

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "EMBER_";

/// Configuration profile for environment-specific settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Profile {
    /// Development profile (default).
    #[default]
    Development,
    /// Production profile.
    Production,
    /// Custom profile name.
    Custom(String),
}

impl Profile {
    /// Returns the profile name as a string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Custom(name) => name,
        }
    }

    /// Parses a profile name; unknown names become [`Profile::Custom`].
    pub fn parse(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "development" | "dev" => Self::Development,
            other => Self::Custom(other.to_string()),
        }
    }

    /// Reads the profile from `EMBER_PROFILE`, defaulting to Development.
    pub fn from_env() -> Self {
        std::env::var("EMBER_PROFILE")
            .map(|p| Self::parse(&p))
            .unwrap_or_default()
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration loader with figment-based multi-source support.
pub struct ConfigLoader {
    /// Programmatic overrides.
    figment: Figment,
    /// Configuration profile.
    profile: Profile,
    /// Search paths for configuration files.
    search_paths: Vec<PathBuf>,
    /// Whether to load environment variables.
    load_env: bool,
    /// Specific config file to load (overrides search).
    config_file: Option<PathBuf>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Creates a new configuration loader with defaults.
    pub fn new() -> Self {
        Self {
            figment: Figment::new(),
            profile: Profile::from_env(),
            search_paths: Vec::new(),
            load_env: true,
            config_file: None,
        }
    }

    /// Sets the configuration profile.
    pub fn profile(mut self, profile: impl AsRef<str>) -> Self {
        self.profile = Profile::parse(profile.as_ref());
        self
    }

    /// Adds a search path for configuration files.
    pub fn search_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.search_paths.push(path.as_ref().to_path_buf());
        self
    }

    /// Adds user config directory to search paths.
    pub fn with_user_config_dir(self) -> Self {
        if let Some(config_dir) = dirs::config_dir() {
            self.search_path(config_dir.join("ember"))
        } else {
            self
        }
    }

    /// Sets a specific configuration file to load.
    pub fn file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Enables loading environment variables (default: true).
    pub fn with_env(mut self) -> Self {
        self.load_env = true;
        self
    }

    /// Disables loading environment variables.
    pub fn without_env(mut self) -> Self {
        self.load_env = false;
        self
    }

    /// Merges additional configuration programmatically.
    ///
    /// ```rust,ignore
    /// let config = ConfigLoader::new()
    ///     .merge(EmberConfig {
    ///         dispatch: DispatchConfig { strict_handlers: true },
    ///         ..Default::default()
    ///     })
    ///     .load()?;
    /// ```
    pub fn merge(mut self, config: EmberConfig) -> Self {
        self.figment = self.figment.merge(Serialized::defaults(config));
        self
    }

    /// Loads the configuration without validating it.
    pub fn load(self) -> ConfigResult<EmberConfig> {
        let profile = self.profile.clone();
        let figment = self.build_figment()?;

        let config: EmberConfig = figment.extract()?;

        debug!(
            profile = %profile,
            logging_level = %config.logging.level,
            bots = config.bots.len(),
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    /// Loads and validates the configuration.
    pub fn load_validated(self) -> ConfigResult<EmberConfig> {
        let config = self.load()?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Builds the figment instance with all sources.
    fn build_figment(mut self) -> ConfigResult<Figment> {
        let mut figment = Figment::from(Serialized::defaults(EmberConfig::default()));

        let user_figment = std::mem::take(&mut self.figment);
        figment = figment.merge(user_figment);

        if let Some(path) = self.config_file.take() {
            if !path.exists() {
                return Err(ConfigError::FileNotFound(path));
            }
            info!(path = %path.display(), "Loading configuration file");
            figment = Self::merge_config_file(figment, &path)?;
        } else {
            figment = self.load_config_files(figment);
        }

        if self.load_env {
            trace!("Loading environment variables with {ENV_PREFIX} prefix");
            figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));
        }

        Ok(figment)
    }

    /// Merges a single config file into the figment, dispatching on file extension.
    ///
    /// Only extensions enabled via feature flags are accepted.
    fn merge_config_file(figment: Figment, path: &Path) -> ConfigResult<Figment> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        match ext {
            #[cfg(feature = "toml-config")]
            "toml" => Ok(figment.merge(Toml::file(path))),
            #[cfg(feature = "yaml-config")]
            "yaml" | "yml" => Ok(figment.merge(Yaml::file(path))),
            _ => {
                let _ = figment;
                Err(ConfigError::UnsupportedFormat(ext.to_string()))
            }
        }
    }

    /// Resolves the effective list of search paths.
    fn resolve_search_paths(&self) -> Vec<PathBuf> {
        if !self.search_paths.is_empty() {
            return self.search_paths.clone();
        }

        let mut paths = Vec::new();
        if let Ok(cwd) = std::env::current_dir() {
            paths.push(cwd);
        }
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("ember"));
        }
        paths
    }

    /// Common search logic for a single file format.
    ///
    /// Iterates `search_paths × base_names`, merges a profile-specific variant
    /// first and then the base file. Stops at the first base file found.
    #[cfg(any(feature = "toml-config", feature = "yaml-config"))]
    fn load_format_files<F>(
        &self,
        mut figment: Figment,
        search_paths: &[PathBuf],
        base_names: &[&str],
        merge_fn: F,
    ) -> (Figment, bool)
    where
        F: Fn(Figment, &Path) -> Figment,
    {
        for search_path in search_paths {
            for base_name in base_names {
                let Some((stem, ext)) = base_name.rsplit_once('.') else {
                    continue;
                };

                let profile_path = search_path.join(format!("{stem}.{}.{ext}", self.profile));
                if profile_path.exists() {
                    debug!(path = %profile_path.display(), "Loading profile-specific config");
                    figment = merge_fn(figment, &profile_path);
                }

                let base_path = search_path.join(base_name);
                if base_path.exists() {
                    info!(path = %base_path.display(), "Loading configuration file");
                    figment = merge_fn(figment, &base_path);
                    return (figment, true);
                }
            }
        }
        (figment, false)
    }

    /// Searches for and loads configuration files from search paths.
    #[cfg_attr(
        not(any(feature = "toml-config", feature = "yaml-config")),
        allow(unused_mut)
    )]
    fn load_config_files(&self, mut figment: Figment) -> Figment {
        let search_paths = self.resolve_search_paths();
        let mut found = false;

        #[cfg(feature = "toml-config")]
        {
            let (f, ok) = self.load_format_files(
                figment,
                &search_paths,
                &["ember.toml", "config.toml"],
                |fig, path| fig.merge(Toml::file(path)),
            );
            figment = f;
            found |= ok;
        }

        #[cfg(feature = "yaml-config")]
        {
            let (f, ok) = self.load_format_files(
                figment,
                &search_paths,
                &["ember.yaml", "ember.yml", "config.yaml", "config.yml"],
                |fig, path| fig.merge(Yaml::file(path)),
            );
            figment = f;
            found |= ok;
        }

        if !found {
            warn!(
                paths = ?search_paths,
                "No configuration file found, using defaults"
            );
        }
        figment
    }
}

/// Loads and validates configuration from the default locations.
pub fn load_config() -> ConfigResult<EmberConfig> {
    ConfigLoader::new().load_validated()
}

/// Loads and validates configuration from `path`, with env overrides.
pub fn load_config_from_file(path: impl AsRef<Path>) -> ConfigResult<EmberConfig> {
    ConfigLoader::new().file(path).load_validated()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{DispatchConfig, LogLevel, LogOutput};
    use figment::Jail;

    fn jail_err(err: ConfigError) -> figment::Error {
        figment::Error::from(err.to_string())
    }

    #[test]
    fn test_default_config() {
        Jail::expect_with(|jail| {
            let config = ConfigLoader::new()
                .search_path(jail.directory())
                .without_env()
                .load()
                .map_err(jail_err)?;

            assert_eq!(config.logging.level, LogLevel::Info);
            assert!(!config.dispatch.strict_handlers);
            assert!(config.bots.is_empty());
            Ok(())
        });
    }

    #[test]
    fn test_toml_file_with_bots() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "ember.toml",
                r#"
                [logging]
                level = "debug"
                output = "stderr"

                [logging.filters]
                ember_framework = "trace"

                [dispatch]
                strict_handlers = true

                [[bots]]
                id = "10001"
                name = "main"
                handlers = ["Logger", "Echo"]

                [[bots]]
                id = "10002"
                enabled = false
                "#,
            )?;

            let config = ConfigLoader::new()
                .search_path(jail.directory())
                .without_env()
                .load_validated()
                .map_err(jail_err)?;

            assert_eq!(config.logging.level, LogLevel::Debug);
            assert_eq!(config.logging.output, LogOutput::Stderr);
            assert_eq!(
                config.logging.filters.get("ember_framework"),
                Some(&LogLevel::Trace)
            );
            assert!(config.dispatch.strict_handlers);

            let main = config.bot("10001").unwrap();
            assert_eq!(main.display_name(), "main");
            assert_eq!(
                main.chain().iter().map(|id| id.as_str()).collect::<Vec<_>>(),
                ["Logger", "Echo"]
            );
            assert!(main.enabled);

            let idle = config.bot("10002").unwrap();
            assert!(!idle.enabled);
            assert!(idle.chain().is_empty());
            Ok(())
        });
    }

    #[test]
    fn test_profile_file_is_overridden_by_base() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "ember.production.toml",
                "[logging]\nlevel = \"error\"\nthread_ids = true\n",
            )?;
            jail.create_file("ember.toml", "[logging]\nlevel = \"warn\"\n")?;

            let config = ConfigLoader::new()
                .profile("prod")
                .search_path(jail.directory())
                .without_env()
                .load()
                .map_err(jail_err)?;

            assert_eq!(config.logging.level, LogLevel::Warn);
            assert!(config.logging.thread_ids);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("ember.toml", "[logging]\nlevel = \"warn\"\n")?;
            jail.set_env("EMBER_LOGGING__LEVEL", "trace");
            jail.set_env("EMBER_DISPATCH__STRICT_HANDLERS", "true");

            let config = ConfigLoader::new()
                .search_path(jail.directory())
                .load()
                .map_err(jail_err)?;

            assert_eq!(config.logging.level, LogLevel::Trace);
            assert!(config.dispatch.strict_handlers);
            Ok(())
        });
    }

    #[test]
    fn test_programmatic_merge() {
        Jail::expect_with(|jail| {
            let config = ConfigLoader::new()
                .search_path(jail.directory())
                .without_env()
                .merge(EmberConfig {
                    dispatch: DispatchConfig {
                        strict_handlers: true,
                    },
                    ..Default::default()
                })
                .load()
                .map_err(jail_err)?;

            assert!(config.dispatch.strict_handlers);
            Ok(())
        });
    }

    #[test]
    fn test_missing_explicit_file() {
        let result = ConfigLoader::new()
            .file("/nonexistent/ember.toml")
            .without_env()
            .load();
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_unsupported_extension() {
        Jail::expect_with(|jail| {
            jail.create_file("ember.ini", "level=debug")?;
            let result = ConfigLoader::new()
                .file(jail.directory().join("ember.ini"))
                .without_env()
                .load();
            assert!(matches!(result, Err(ConfigError::UnsupportedFormat(ext)) if ext == "ini"));
            Ok(())
        });
    }

    #[test]
    fn test_invalid_value_fails_extraction() {
        Jail::expect_with(|jail| {
            jail.create_file("ember.toml", "[logging]\nlevel = \"loud\"\n")?;
            let result = ConfigLoader::new()
                .search_path(jail.directory())
                .without_env()
                .load();
            assert!(matches!(result, Err(ConfigError::Extract(_))));
            Ok(())
        });
    }

    #[test]
    fn test_profile_parse() {
        assert_eq!(Profile::parse("PROD"), Profile::Production);
        assert_eq!(Profile::parse("dev"), Profile::Development);
        assert_eq!(Profile::parse("staging"), Profile::Custom("staging".into()));
    }
}
