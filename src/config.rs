//! # Configuration
//!
//! Layered configuration for the enrichment core, loaded with the `config`
//! crate in increasing precedence:
//!
//! 1. Built-in defaults ([`NotifyConfig::default`])
//! 2. `config/ldn-notify.{yaml,toml,json}` (optional)
//! 3. `config/ldn-notify.{environment}.{yaml,toml,json}` (optional)
//! 4. `LDN_NOTIFY__SECTION__KEY` environment variables
//!
//! ```rust,no_run
//! use ldn_notify_core::config::NotifyConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = NotifyConfig::load()?;
//! println!("messages endpoint link: {}", config.endpoints.messages_link);
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::{endpoints, references};
use crate::error::{NotifyError, NotifyResult};

const ENV_PREFIX: &str = "LDN_NOTIFY";
const CONFIG_BASENAME: &str = "config/ldn-notify";

/// Root configuration
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct NotifyConfig {
    pub endpoints: EndpointsConfig,
    pub hydration: HydrationConfig,
    pub reprocess: ReprocessConfig,
    pub logging: LoggingConfig,
}

/// REST endpoint naming
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EndpointsConfig {
    /// HAL link of the LDN messages endpoint
    pub messages_link: String,
    /// Action path segment that enqueues a retry for one message
    pub reprocess_action: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            messages_link: endpoints::MESSAGES_LINK.to_string(),
            reprocess_action: endpoints::REPROCESS_ACTION.to_string(),
        }
    }
}

/// Detail hydration settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct HydrationConfig {
    /// Messages resolved at once; 0 resolves all messages concurrently
    pub max_concurrent_messages: usize,
    /// Display name used for absent or unresolvable references
    pub fallback_name: String,
    /// Report failed lookups to the notification sink
    pub notify_on_lookup_failure: bool,
}

impl Default for HydrationConfig {
    fn default() -> Self {
        Self {
            max_concurrent_messages: 0,
            fallback_name: references::FALLBACK_NAME.to_string(),
            notify_on_lookup_failure: true,
        }
    }
}

/// Reprocessing settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ReprocessConfig {
    /// Reject a reprocess call while another for the same message is in flight
    pub single_flight: bool,
}

impl Default for ReprocessConfig {
    fn default() -> Self {
        Self {
            single_flight: true,
        }
    }
}

/// Logging settings consumed by [`crate::logging`]
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive; empty derives the level from the environment
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl NotifyConfig {
    /// Load defaults, the optional config files for the current environment, and env overrides
    pub fn load() -> NotifyResult<Self> {
        let environment = current_environment();
        debug!(environment = %environment, "Loading notify configuration");

        let builder = Config::builder()
            .add_source(Config::try_from(&Self::default())?)
            .add_source(File::with_name(CONFIG_BASENAME).required(false))
            .add_source(
                File::with_name(&format!("{CONFIG_BASENAME}.{environment}")).required(false),
            )
            .add_source(env_source());

        Self::finish(builder.build()?)
    }

    /// Load defaults overlaid with a single required file, without env overrides
    pub fn load_from_file(path: impl AsRef<Path>) -> NotifyResult<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading notify configuration file");

        let config = Config::builder()
            .add_source(Config::try_from(&Self::default())?)
            .add_source(File::from(path).required(true))
            .build()?;

        Self::finish(config)
    }

    fn finish(config: Config) -> NotifyResult<Self> {
        let loaded: Self = config.try_deserialize()?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Reject values the core cannot operate with
    pub fn validate(&self) -> NotifyResult<()> {
        if self.endpoints.messages_link.trim().is_empty() {
            return Err(NotifyError::configuration(
                "endpoints",
                "messages_link must not be empty",
            ));
        }
        let action = self.endpoints.reprocess_action.trim();
        if action.is_empty() || action.contains('/') {
            return Err(NotifyError::configuration(
                "endpoints",
                "reprocess_action must be a single non-empty path segment",
            ));
        }
        Ok(())
    }

    /// Concurrency limit for detail hydration, `None` when unbounded
    pub fn hydration_limit(&self) -> Option<usize> {
        match self.hydration.max_concurrent_messages {
            0 => None,
            n => Some(n),
        }
    }
}

fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
}

/// Current deployment environment
pub fn current_environment() -> String {
    std::env::var("LDN_NOTIFY_ENV")
        .or_else(|_| std::env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(extension: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(&format!(".{extension}"))
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = NotifyConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.endpoints.messages_link, "messages");
        assert_eq!(config.endpoints.reprocess_action, "enqueueretry");
        assert_eq!(config.hydration_limit(), None);
        assert!(config.reprocess.single_flight);
    }

    #[test]
    fn test_yaml_file_overrides_defaults() {
        let file = write_config(
            "yaml",
            "hydration:\n  max_concurrent_messages: 4\n  fallback_name: \"-\"\nlogging:\n  json: true\n",
        );

        let config = NotifyConfig::load_from_file(file.path()).unwrap();

        assert_eq!(config.hydration_limit(), Some(4));
        assert_eq!(config.hydration.fallback_name, "-");
        assert!(config.logging.json);
        // untouched sections keep their defaults
        assert_eq!(config.endpoints, EndpointsConfig::default());
        assert!(config.hydration.notify_on_lookup_failure);
    }

    #[test]
    fn test_toml_file_is_supported() {
        let file = write_config("toml", "[reprocess]\nsingle_flight = false\n");
        let config = NotifyConfig::load_from_file(file.path()).unwrap();
        assert!(!config.reprocess.single_flight);
    }

    #[test]
    fn test_invalid_reprocess_action_rejected() {
        let file = write_config("yaml", "endpoints:\n  reprocess_action: \"a/b\"\n");
        let result = NotifyConfig::load_from_file(file.path());
        assert!(matches!(result, Err(NotifyError::Configuration { .. })));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = NotifyConfig::load_from_file("/nonexistent/ldn-notify.yaml");
        assert!(matches!(result, Err(NotifyError::Configuration { .. })));
    }
}
