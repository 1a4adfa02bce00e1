use std::path::{Path, PathBuf};

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tokio::process::Command;

use crate::core::docs::DocsError;
use crate::infra::http::{read_json, transport_error};

pub const DEFAULT_OAUTH_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Output of `gog auth status --json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthStatus {
    #[serde(default)]
    pub account: Option<AuthAccount>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthAccount {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub credentials_path: Option<PathBuf>,
}

/// OAuth client file referenced by the auth status.
#[derive(Debug, Deserialize)]
struct ClientCredentials {
    #[serde(default)]
    client_id: Option<String>,
    #[serde(default)]
    client_secret: Option<String>,
}

/// File written by `gog auth tokens export`.
#[derive(Debug, Deserialize)]
struct ExportedTokens {
    #[serde(default)]
    refresh_token: Option<String>,
}

/// The two operations the bridge needs from the external auth CLI.
#[async_trait]
pub trait AuthCli: Send + Sync {
    async fn auth_status(&self) -> Result<AuthStatus, DocsError>;

    /// Writes the account's tokens as JSON to `out`, overwriting it.
    async fn export_tokens(&self, email: &str, out: &Path) -> Result<(), DocsError>;
}

/// `AuthCli` backed by the real `gog` binary.
pub struct GogCli {
    bin: String,
}

impl GogCli {
    pub fn new(bin: impl Into<String>) -> Self {
        Self { bin: bin.into() }
    }

    async fn run(&self, args: &[&str]) -> Result<String, DocsError> {
        let output = Command::new(&self.bin)
            .args(args)
            .output()
            .await
            .map_err(|e| DocsError::Config(format!("Failed to run `{}`: {}", self.bin, e)))?;

        if !output.status.success() {
            return Err(DocsError::Config(format!(
                "`{} {}` failed ({}): {}",
                self.bin,
                args.first().copied().unwrap_or_default(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl AuthCli for GogCli {
    async fn auth_status(&self) -> Result<AuthStatus, DocsError> {
        let stdout = self.run(&["auth", "status", "--json"]).await?;
        serde_json::from_str(&stdout)
            .map_err(|e| DocsError::Config(format!("Unreadable `gog auth status --json` output: {}", e)))
    }

    async fn export_tokens(&self, email: &str, out: &Path) -> Result<(), DocsError> {
        let out = out.to_string_lossy();
        self.run(&["auth", "tokens", "export", email, "--out", &out, "--overwrite"])
            .await
            .map(|_| ())
    }
}

/// Turns the `gog` login into a short-lived bearer token for the Docs API.
pub struct GogAuth<C: AuthCli> {
    cli: C,
    client: Client,
    token_url: String,
}

impl<C: AuthCli> GogAuth<C> {
    pub fn new(cli: C, client: Client, token_url: impl Into<String>) -> Self {
        Self {
            cli,
            client,
            token_url: token_url.into(),
        }
    }

    /// Fetches a fresh access token. Not cached: every invocation mints its own.
    pub async fn get_access_token(&self) -> Result<String, DocsError> {
        let account = self.cli.auth_status().await?.account.unwrap_or_default();

        let email = account
            .email
            .filter(|e| !e.is_empty())
            .ok_or_else(|| {
                DocsError::Config("No gog account email found in `gog auth status --json`.".to_string())
            })?;
        let credentials_path = account
            .credentials_path
            .filter(|p| p.exists())
            .ok_or_else(|| {
                DocsError::Config(
                    "No gog OAuth credentials file found. Check `gog auth status --json`.".to_string(),
                )
            })?;

        let (client_id, client_secret) = read_client_credentials(&credentials_path).await?;
        let refresh_token = self.export_refresh_token(&email).await?;

        tracing::debug!("Exchanging refresh token for {}", email);
        self.exchange(&client_id, &client_secret, &refresh_token).await
    }

    /// Exports the refresh token through a temp file that is removed when this
    /// returns, whether the export succeeded or not.
    async fn export_refresh_token(&self, email: &str) -> Result<String, DocsError> {
        let tmp = tempfile::Builder::new()
            .prefix("gog-refresh-")
            .suffix(".json")
            .tempfile()?;

        self.cli.export_tokens(email, tmp.path()).await?;

        let text = tokio::fs::read_to_string(tmp.path()).await?;
        let tokens: ExportedTokens = serde_json::from_str(&text)?;
        tmp.close()?;

        tokens
            .refresh_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| DocsError::Auth("Exported token JSON missing refresh_token.".to_string()))
    }

    async fn exchange(
        &self,
        client_id: &str,
        client_secret: &str,
        refresh_token: &str,
    ) -> Result<String, DocsError> {
        let response = self
            .client
            .post(&self.token_url)
            .form(&[
                ("client_id", client_id),
                ("client_secret", client_secret),
                ("refresh_token", refresh_token),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .map_err(transport_error)?;

        let body: serde_json::Value = read_json("POST", &self.token_url, response).await?;
        match body.get("access_token").and_then(|v| v.as_str()) {
            Some(token) if !token.is_empty() => Ok(token.to_string()),
            _ => Err(DocsError::Auth(format!("No access_token in OAuth response: {}", body))),
        }
    }
}

async fn read_client_credentials(path: &Path) -> Result<(String, String), DocsError> {
    let text = tokio::fs::read_to_string(path).await?;
    let creds: ClientCredentials = serde_json::from_str(&text)
        .map_err(|e| DocsError::Config(format!("Unreadable gog credentials file {}: {}", path.display(), e)))?;

    match (creds.client_id, creds.client_secret) {
        (Some(id), Some(secret)) if !id.is_empty() && !secret.is_empty() => Ok((id, secret)),
        _ => Err(DocsError::Config(
            "Missing client_id/client_secret in gog credentials file.".to_string(),
        )),
    }
}
