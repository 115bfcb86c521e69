use std::path::PathBuf;

use glossbot_core::GlossError;
use glossbot_logging::{mask_secret, LogOptions};
use glossbot_store::is_valid_table_name;

/// Which glossary backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Sqlite,
    Memory,
}

/// GlossBot runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server bind address
    pub bind_address: String,
    /// HTTP server port
    pub port: u16,
    /// Log level
    pub log_level: String,
    pub log_json: bool,
    pub log_dir: Option<PathBuf>,

    // Slack
    pub slack_bot_token: Option<String>,
    pub slack_signing_secret: Option<String>,
    pub slack_api_base: Option<String>,
    pub bot_user_id: Option<String>,
    pub webhook_path: String,

    // Store
    pub store: StoreKind,
    pub db_path: String,
    pub table: String,

    // Worker hand-off
    pub worker_url: Option<String>,
    /// Mount the signed `/internal/worker` intake for a split-mode receiver.
    pub worker_intake: bool,
    /// Shared secret signing forwarded jobs, on both sides of a split.
    pub worker_secret: Option<String>,
    pub queue_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            log_json: false,
            log_dir: None,
            slack_bot_token: None,
            slack_signing_secret: None,
            slack_api_base: None,
            bot_user_id: None,
            webhook_path: "/slack/events".to_string(),
            store: StoreKind::Sqlite,
            db_path: "glossbot.db".to_string(),
            table: "glossary".to_string(),
            worker_url: None,
            worker_intake: false,
            worker_secret: None,
            queue_size: 256,
        }
    }
}

impl Config {
    /// Load configuration from environment variables with sensible defaults.
    pub fn from_env() -> Result<Self, GlossError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, GlossError> {
        let defaults = Self::default();
        // Empty values count as unset.
        let var = |key: &str| get(key).filter(|v| !v.trim().is_empty());

        let store = match var("GLOSSBOT_STORE").as_deref() {
            None | Some("sqlite") => StoreKind::Sqlite,
            Some("memory") => StoreKind::Memory,
            Some(other) => {
                return Err(GlossError::Config(format!(
                    "GLOSSBOT_STORE must be \"sqlite\" or \"memory\", got {other:?}"
                )))
            }
        };

        let config = Self {
            bind_address: var("GLOSSBOT_BIND").unwrap_or(defaults.bind_address),
            port: parse_or(var("GLOSSBOT_PORT"), "GLOSSBOT_PORT", defaults.port)?,
            log_level: var("RUST_LOG").unwrap_or(defaults.log_level),
            log_json: var("GLOSSBOT_LOG_JSON").is_some(),
            log_dir: var("GLOSSBOT_LOG_DIR").map(PathBuf::from),
            slack_bot_token: var("SLACK_BOT_TOKEN"),
            slack_signing_secret: var("SLACK_SIGNING_SECRET"),
            slack_api_base: var("SLACK_API_BASE"),
            bot_user_id: var("BOT_USER_ID"),
            webhook_path: var("GLOSSBOT_WEBHOOK_PATH").unwrap_or(defaults.webhook_path),
            store,
            db_path: var("GLOSSBOT_DB").unwrap_or(defaults.db_path),
            table: var("GLOSSBOT_TABLE").unwrap_or(defaults.table),
            worker_url: var("GLOSSBOT_WORKER_URL"),
            worker_intake: parse_or(var("GLOSSBOT_WORKER_INTAKE"), "GLOSSBOT_WORKER_INTAKE", false)?,
            worker_secret: var("GLOSSBOT_WORKER_SECRET"),
            queue_size: parse_or(var("GLOSSBOT_QUEUE_SIZE"), "GLOSSBOT_QUEUE_SIZE", defaults.queue_size)?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), GlossError> {
        if !is_valid_table_name(&self.table) {
            return Err(GlossError::Config(format!(
                "GLOSSBOT_TABLE {:?} is not a plain identifier",
                self.table
            )));
        }
        if !self.webhook_path.starts_with('/') {
            return Err(GlossError::Config(format!(
                "GLOSSBOT_WEBHOOK_PATH {:?} must start with '/'",
                self.webhook_path
            )));
        }
        if self.queue_size == 0 {
            return Err(GlossError::Config("GLOSSBOT_QUEUE_SIZE must be positive".into()));
        }
        if (self.worker_intake || self.worker_url.is_some()) && self.worker_secret.is_none() {
            return Err(GlossError::Config(
                "GLOSSBOT_WORKER_SECRET is required for job forwarding or worker intake".into(),
            ));
        }
        Ok(())
    }

    /// The bot token, required to reply on Slack.
    pub fn require_bot_token(&self) -> Result<&str, GlossError> {
        self.slack_bot_token
            .as_deref()
            .ok_or_else(|| GlossError::Config("SLACK_BOT_TOKEN is not set".into()))
    }

    /// Secret shared by the forwarding receiver and the worker intake.
    pub fn require_worker_secret(&self) -> Result<&str, GlossError> {
        self.worker_secret
            .as_deref()
            .ok_or_else(|| GlossError::Config("GLOSSBOT_WORKER_SECRET is not set".into()))
    }

    pub fn log_options(&self) -> LogOptions {
        LogOptions {
            level: self.log_level.clone(),
            json: self.log_json,
            log_dir: self.log_dir.clone(),
        }
    }

    /// Masked token for startup logs.
    pub fn masked_token(&self) -> String {
        self.slack_bot_token
            .as_deref()
            .map(mask_secret)
            .unwrap_or_else(|| "<unset>".to_string())
    }
}

fn parse_or<T: std::str::FromStr>(value: Option<String>, key: &str, default: T) -> Result<T, GlossError> {
    match value {
        None => Ok(default),
        Some(v) => v
            .trim()
            .parse()
            .map_err(|_| GlossError::Config(format!("{key} has invalid value {v:?}"))),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(pairs: &[(&str, &str)]) -> Result<Config, GlossError> {
        let env: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(|k| env.get(k).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.store, StoreKind::Sqlite);
        assert_eq!(config.table, "glossary");
        assert_eq!(config.webhook_path, "/slack/events");
        assert!(config.worker_url.is_none());
        assert!(!config.worker_intake);
        assert!(config.require_bot_token().is_err());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("GLOSSBOT_PORT", "3000"),
            ("GLOSSBOT_STORE", "memory"),
            ("GLOSSBOT_TABLE", "terms"),
            ("SLACK_BOT_TOKEN", "xoxb-123456789"),
            ("BOT_USER_ID", "UBOT"),
            ("GLOSSBOT_WORKER_URL", "http://worker:8080"),
            ("GLOSSBOT_WORKER_SECRET", "shared"),
        ])
        .unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.store, StoreKind::Memory);
        assert_eq!(config.table, "terms");
        assert_eq!(config.require_bot_token().unwrap(), "xoxb-123456789");
        assert_eq!(config.masked_token(), "xoxb****");
        assert_eq!(config.bot_user_id.as_deref(), Some("UBOT"));
    }

    #[test]
    fn test_empty_values_are_unset() {
        let config = load(&[("SLACK_BOT_TOKEN", ""), ("GLOSSBOT_TABLE", " ")]).unwrap();
        assert!(config.slack_bot_token.is_none());
        assert_eq!(config.table, "glossary");
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(load(&[("GLOSSBOT_PORT", "eighty")]).is_err());
        assert!(load(&[("GLOSSBOT_STORE", "dynamo")]).is_err());
        assert!(load(&[("GLOSSBOT_TABLE", "bad-name")]).is_err());
        assert!(load(&[("GLOSSBOT_WEBHOOK_PATH", "slack")]).is_err());
        assert!(load(&[("GLOSSBOT_QUEUE_SIZE", "0")]).is_err());
    }

    #[test]
    fn test_worker_split_requires_secret() {
        assert!(load(&[("GLOSSBOT_WORKER_URL", "http://worker:8080")]).is_err());
        assert!(load(&[("GLOSSBOT_WORKER_INTAKE", "true")]).is_err());
        assert!(load(&[("GLOSSBOT_WORKER_INTAKE", "yes")]).is_err());

        let config = load(&[
            ("GLOSSBOT_WORKER_INTAKE", "true"),
            ("GLOSSBOT_WORKER_SECRET", "shared"),
        ])
        .unwrap();
        assert!(config.worker_intake);
        assert_eq!(config.require_worker_secret().unwrap(), "shared");
    }

    #[test]
    fn test_intake_flag_revalidates() {
        let config = Config { worker_intake: true, ..Config::default() };
        assert!(config.validate().is_err());
    }
}
