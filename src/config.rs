// Runtime settings read from the environment (after `.env` is loaded).

use std::time::Duration;

use crate::core::docs::DocsError;
use crate::infra::auth::DEFAULT_OAUTH_TOKEN_URL;
use crate::infra::google_docs::google_docs_client::DEFAULT_DOCS_API_BASE;

const DEFAULT_GOG_BIN: &str = "gog";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub docs_api_base: String,
    pub oauth_token_url: String,
    /// Executable of the external auth CLI.
    pub gog_bin: String,
    pub http_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            docs_api_base: DEFAULT_DOCS_API_BASE.to_string(),
            oauth_token_url: DEFAULT_OAUTH_TOKEN_URL.to_string(),
            gog_bin: DEFAULT_GOG_BIN.to_string(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, DocsError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Unset or blank keys keep their default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DocsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let http_timeout = match get("DOCS_HTTP_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|_| {
                    DocsError::Config(format!("DOCS_HTTP_TIMEOUT_SECS must be a whole number of seconds, got '{}'", raw))
                })?;
                if secs == 0 {
                    return Err(DocsError::Config(
                        "DOCS_HTTP_TIMEOUT_SECS must be greater than zero".to_string(),
                    ));
                }
                Duration::from_secs(secs)
            }
            None => defaults.http_timeout,
        };

        Ok(Self {
            docs_api_base: get("GOOGLE_DOCS_API_BASE")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or(defaults.docs_api_base),
            oauth_token_url: get("GOOGLE_OAUTH_TOKEN_URL").unwrap_or(defaults.oauth_token_url),
            gog_bin: get("GOG_BIN").unwrap_or(defaults.gog_bin),
            http_timeout,
        })
    }
}
