//! Runtime configuration: flags first, then environment, then defaults.

use dbx_api::DropboxConfig;
use std::path::PathBuf;

use crate::error::{PipelineError, PipelineResult};

pub const TOKEN_ENV: &str = "DROPBOX_TOKEN";
pub const QUEUE_DIR_ENV: &str = "DBXCLI_QUEUE_DIR";
pub const API_URL_ENV: &str = "DBXCLI_API_URL";
pub const CONTENT_URL_ENV: &str = "DBXCLI_CONTENT_URL";

const TOKEN_HELP: &str =
    "generate an OAuth 2 access token at https://dropbox.com/developers/apps";

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub access_token: Option<String>,
    /// Directory holding one sub-directory per named queue.
    pub queue_root: PathBuf,
    pub api_url: Option<String>,
    pub content_url: Option<String>,
}

impl AppConfig {
    /// Resolve against the process environment. `access_token` and
    /// `queue_root` arrive already merged with their environment variables
    /// by the argument parser.
    pub fn resolve(access_token: Option<String>, queue_root: Option<PathBuf>) -> Self {
        Self::from_lookup(access_token, queue_root, |key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(access_token: Option<String>, queue_root: Option<PathBuf>, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());
        Self {
            access_token: non_empty(access_token).or_else(|| non_empty(lookup(TOKEN_ENV))),
            queue_root: queue_root
                .or_else(|| non_empty(lookup(QUEUE_DIR_ENV)).map(PathBuf::from))
                .unwrap_or_else(|| PathBuf::from(".")),
            api_url: non_empty(lookup(API_URL_ENV)),
            content_url: non_empty(lookup(CONTENT_URL_ENV)),
        }
    }

    pub fn dropbox_config(&self) -> PipelineResult<DropboxConfig> {
        let token = self.access_token.as_deref().ok_or_else(|| {
            PipelineError::Config(format!(
                "no access token: pass --dropbox-token or set {} ({})",
                TOKEN_ENV, TOKEN_HELP
            ))
        })?;

        let mut config = DropboxConfig::new(token);
        if let Some(url) = &self.api_url {
            config = config.with_api_url(url);
        }
        if let Some(url) = &self.content_url {
            config = config.with_content_url(url);
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn flag_token_wins_over_environment() {
        let config = AppConfig::from_lookup(
            Some("from-flag".to_string()),
            None,
            env(&[(TOKEN_ENV, "from-env")]),
        );
        assert_eq!(config.access_token.as_deref(), Some("from-flag"));

        let config = AppConfig::from_lookup(None, None, env(&[(TOKEN_ENV, "from-env")]));
        assert_eq!(config.access_token.as_deref(), Some("from-env"));
    }

    #[test]
    fn missing_token_is_a_config_error() {
        let config = AppConfig::from_lookup(Some("  ".to_string()), None, env(&[]));
        let err = config.dropbox_config().unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
        assert!(err.to_string().contains("dropbox.com/developers/apps"));
    }

    #[test]
    fn queue_root_defaults_to_current_directory() {
        let config = AppConfig::from_lookup(None, None, env(&[]));
        assert_eq!(config.queue_root, PathBuf::from("."));

        let config = AppConfig::from_lookup(None, None, env(&[(QUEUE_DIR_ENV, "/var/queues")]));
        assert_eq!(config.queue_root, PathBuf::from("/var/queues"));

        let config = AppConfig::from_lookup(
            None,
            Some(PathBuf::from("/flag")),
            env(&[(QUEUE_DIR_ENV, "/var/queues")]),
        );
        assert_eq!(config.queue_root, PathBuf::from("/flag"));
    }

    #[test]
    fn endpoint_overrides_reach_the_client_config() {
        let config = AppConfig::from_lookup(
            Some("t".to_string()),
            None,
            env(&[(API_URL_ENV, "http://127.0.0.1:9000"), (CONTENT_URL_ENV, "http://127.0.0.1:9001")]),
        );
        let dropbox = config.dropbox_config().unwrap();
        assert_eq!(dropbox.access_token, "t");
        assert_eq!(dropbox.api_url, "http://127.0.0.1:9000");
        assert_eq!(dropbox.content_url, "http://127.0.0.1:9001");
    }
}
