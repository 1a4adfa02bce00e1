// =============================================================================
// GOOGLE DOCS REST CLIENT
// =============================================================================
//
// Thin `DocsApi` implementation over the Docs v1 REST API:
//
// - `GET  {base}/documents/{id}?includeTabsContent=true`
// - `POST {base}/documents/{id}:batchUpdate` with `{"requests": [...]}`
//
// The document is fetched whole (no `fields` mask) so schema additions on
// Google's side never break deserialization. The access token comes from the
// auth bridge and is only valid for one invocation; nothing is cached here.

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::json;

use crate::core::docs::{BatchUpdateResponse, DocsApi, DocsError, Document, Request};
use crate::infra::http::{read_json, transport_error};

pub const DEFAULT_DOCS_API_BASE: &str = "https://docs.googleapis.com/v1";

/// Client for reading and batch-updating one user's Google Docs.
pub struct GoogleDocsClient {
    client: Client,
    base_url: String,
    access_token: String,
}

impl GoogleDocsClient {
    pub fn new(client: Client, base_url: impl Into<String>, access_token: String) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            access_token,
        }
    }

    /// Extracts the document ID from a Google Docs URL, or passes a bare ID through.
    pub fn extract_doc_id(url_or_id: &str) -> Option<String> {
        let url_or_id = url_or_id.trim();
        if url_or_id.contains("docs.google.com") {
            if let Some(start) = url_or_id.find("/document/d/") {
                let after_d = &url_or_id[start + 12..];
                let end = after_d
                    .find(|c| c == '/' || c == '?' || c == '#')
                    .unwrap_or(after_d.len());
                let id = &after_d[..end];
                if !id.is_empty() {
                    return Some(id.to_string());
                }
            }
        } else if !url_or_id.is_empty() && !url_or_id.contains('/') && !url_or_id.contains(' ') {
            return Some(url_or_id.to_string());
        }
        None
    }

    /// `{base}/documents/{doc_id}{suffix}` with the id percent-encoded as one path segment.
    fn document_url(&self, doc_id: &str, suffix: &str) -> Result<Url, DocsError> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            DocsError::Config(format!("Invalid Docs API base URL {}: {}", self.base_url, e))
        })?;
        url.path_segments_mut()
            .map_err(|_| DocsError::Config(format!("Docs API base URL has no path: {}", self.base_url)))?
            .pop_if_empty()
            .push("documents")
            .push(&format!("{}{}", doc_id, suffix));
        Ok(url)
    }
}

#[async_trait]
impl DocsApi for GoogleDocsClient {
    async fn get_document(&self, doc_id: &str) -> Result<Document, DocsError> {
        let mut url = self.document_url(doc_id, "")?;
        url.query_pairs_mut().append_pair("includeTabsContent", "true");
        let url = url.to_string();

        tracing::debug!("Fetching Google Doc via API (all tabs): {}", doc_id);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(transport_error)?;

        let document: Document = read_json("GET", &url, response).await?;

        tracing::debug!(
            "Fetched Google Doc '{}' with {} top-level tab(s)",
            document.title.as_deref().unwrap_or(doc_id),
            document.tabs.len()
        );

        Ok(document)
    }

    async fn batch_update(
        &self,
        doc_id: &str,
        requests: &[Request],
    ) -> Result<BatchUpdateResponse, DocsError> {
        let url = self.document_url(doc_id, ":batchUpdate")?.to_string();

        tracing::debug!("Submitting {} request(s) to {}", requests.len(), doc_id);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&json!({ "requests": requests }))
            .send()
            .await
            .map_err(transport_error)?;

        read_json("POST", &url, response).await
    }
}
