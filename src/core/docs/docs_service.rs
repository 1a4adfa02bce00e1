use async_trait::async_trait;
use serde::Serialize;

use super::docs_error::DocsError;
use super::docs_models::{BatchUpdateResponse, Document};
use super::requests::{build_write_requests, Request, WriteMode};
use super::tab_tree::{find_tab_by_id, find_tab_by_title, flatten_tabs, tab_end_index, TabSummary};

/// The two Docs API calls every pipeline is built from.
#[async_trait]
pub trait DocsApi: Send + Sync {
    /// Fetches the document with every tab's content included.
    async fn get_document(&self, doc_id: &str) -> Result<Document, DocsError>;

    /// Submits `requests` as one batch. Any HTTP error fails the whole batch;
    /// nothing is rolled back on this side.
    async fn batch_update(
        &self,
        doc_id: &str,
        requests: &[Request],
    ) -> Result<BatchUpdateResponse, DocsError>;
}

#[async_trait]
impl DocsApi for Box<dyn DocsApi> {
    async fn get_document(&self, doc_id: &str) -> Result<Document, DocsError> {
        (**self).get_document(doc_id).await
    }

    async fn batch_update(
        &self,
        doc_id: &str,
        requests: &[Request],
    ) -> Result<BatchUpdateResponse, DocsError> {
        (**self).batch_update(doc_id, requests).await
    }
}

/// Which tab a write goes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabTarget {
    Id(String),
    Title(String),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TabListing {
    pub ok: bool,
    pub doc_id: String,
    pub tabs: Vec<TabSummary>,
}

/// Result of one write, printed as-is by the `write` command.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteReport {
    pub ok: bool,
    pub doc_id: String,
    pub tab_id: String,
    pub tab_title: Option<String>,
    pub mode: WriteMode,
    pub dry_run: bool,
    pub text_length: usize,
    pub request_count: usize,
    pub requests: Vec<Request>,
    pub update_response: Option<BatchUpdateResponse>,
}

/// Runs the tab pipelines against any `DocsApi`.
///
/// Holds no state besides the API handle; every call re-reads the document.
pub struct TabWriterService<A: DocsApi> {
    api: A,
}

impl<A: DocsApi> TabWriterService<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub async fn list_tabs(&self, doc_id: &str) -> Result<TabListing, DocsError> {
        let doc = self.api.get_document(doc_id).await?;
        let tabs = flatten_tabs(&doc.tabs)
            .into_iter()
            .map(|t| TabSummary {
                parent_tab_id: None,
                ..TabSummary::of(t)
            })
            .collect();

        Ok(TabListing {
            ok: true,
            doc_id: doc_id.to_string(),
            tabs,
        })
    }

    /// Resolves the target tab, builds the write requests and submits them
    /// unless `dry_run` is set.
    pub async fn write_text(
        &self,
        doc_id: &str,
        target: &TabTarget,
        text: &str,
        mode: WriteMode,
        dry_run: bool,
    ) -> Result<WriteReport, DocsError> {
        let doc = self.api.get_document(doc_id).await?;
        let tabs = flatten_tabs(&doc.tabs);

        let tab = match target {
            TabTarget::Id(id) => find_tab_by_id(&tabs, id)
                .ok_or_else(|| DocsError::TabNotFound(format!("Tab not found by tabId: {}", id)))?,
            TabTarget::Title(title) => find_tab_by_title(&tabs, title).ok_or_else(|| {
                DocsError::TabNotFound(format!("Tab not found by title: {}", title))
            })?,
        };

        let tab_id = tab
            .tab_id()
            .ok_or_else(|| DocsError::Validation("Target tab has no tabId".to_string()))?
            .to_string();

        let requests = build_write_requests(&tab_id, text, mode, tab_end_index(tab));

        tracing::debug!(
            tab_id = %tab_id,
            mode = %mode,
            requests = requests.len(),
            dry_run,
            "Prepared tab write"
        );

        let update_response = if dry_run {
            None
        } else {
            let resp = self.api.batch_update(doc_id, &requests).await?;
            tracing::info!("Wrote {} chars to tab {} ({})", text.chars().count(), tab_id, mode);
            Some(resp)
        };

        Ok(WriteReport {
            ok: true,
            doc_id: doc_id.to_string(),
            tab_title: tab.title().map(str::to_string),
            tab_id,
            mode,
            dry_run,
            text_length: text.chars().count(),
            request_count: requests.len(),
            requests,
            update_response,
        })
    }
}
