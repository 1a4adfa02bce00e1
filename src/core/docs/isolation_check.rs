use serde::Serialize;

use super::docs_error::DocsError;
use super::docs_models::BatchUpdateResponse;
use super::docs_service::{DocsApi, TabTarget, TabWriterService};
use super::requests::{Request, WriteMode};
use super::tab_tree::{find_tab_by_title, flatten_tabs, tab_text};

/// A tab whose text contained the marker after the write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerHit {
    pub title: String,
    pub tab_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IsolationReport {
    pub ok: bool,
    pub doc_id: String,
    pub target_tab_title: String,
    pub target_tab_id: String,
    pub inserted_text: String,
    pub write_request_count: usize,
    pub tabs_containing_marker: Vec<MarkerHit>,
    pub cleanup_enabled: bool,
    pub cleanup_response: Option<BatchUpdateResponse>,
}

impl IsolationReport {
    /// Marker hits outside the target tab.
    pub fn leaks(&self) -> Vec<&MarkerHit> {
        self.tabs_containing_marker
            .iter()
            .filter(|hit| hit.tab_id != self.target_tab_id)
            .collect()
    }

    /// Turns leaked markers into an error naming the affected tabs.
    pub fn check_isolation(&self) -> Result<(), DocsError> {
        let leaks = self.leaks();
        if leaks.is_empty() {
            return Ok(());
        }
        let names: Vec<String> = leaks
            .iter()
            .map(|hit| format!("{} ({})", hit.title, hit.tab_id))
            .collect();
        Err(DocsError::IsolationViolation(names.join(", ")))
    }
}

impl<A: DocsApi> TabWriterService<A> {
    /// Appends `marker` to one tab, then checks that it shows up there and
    /// nowhere else. With `cleanup` the marker is removed again with a
    /// replace-all scoped to the target tab only.
    pub async fn verify_write_isolation(
        &self,
        doc_id: &str,
        tab_title: &str,
        marker: &str,
        cleanup: bool,
    ) -> Result<IsolationReport, DocsError> {
        // An empty needle matches every tab and cannot be cleaned up.
        if marker.is_empty() {
            return Err(DocsError::Validation("Isolation marker must not be empty".to_string()));
        }

        let before = self.api().get_document(doc_id).await?;
        let tabs_before = flatten_tabs(&before.tabs);
        let target = find_tab_by_title(&tabs_before, tab_title)
            .ok_or_else(|| DocsError::TabNotFound(format!("Tab not found: {}", tab_title)))?;
        let target_tab_id = target
            .tab_id()
            .ok_or_else(|| DocsError::Validation(format!("No tabId on tab: {}", tab_title)))?
            .to_string();

        let write = self
            .write_text(
                doc_id,
                &TabTarget::Title(tab_title.to_string()),
                marker,
                WriteMode::Append,
                false,
            )
            .await?;

        let after = self.api().get_document(doc_id).await?;
        let hits: Vec<MarkerHit> = flatten_tabs(&after.tabs)
            .into_iter()
            .filter(|t| tab_text(t).contains(marker))
            .map(|t| MarkerHit {
                title: t.title().unwrap_or_default().to_string(),
                tab_id: t.tab_id().unwrap_or_default().to_string(),
            })
            .collect();

        let target_has_marker = hits.iter().any(|hit| hit.tab_id == target_tab_id);
        let leaked = hits.iter().any(|hit| hit.tab_id != target_tab_id);

        let cleanup_response = if cleanup {
            let request = Request::replace_all_in_tab(&target_tab_id, marker, "");
            Some(self.api().batch_update(doc_id, &[request]).await?)
        } else {
            None
        };

        tracing::info!(
            tab_id = %target_tab_id,
            hits = hits.len(),
            cleanup,
            "Write isolation check finished"
        );

        Ok(IsolationReport {
            ok: target_has_marker && !leaked,
            doc_id: doc_id.to_string(),
            target_tab_title: tab_title.to_string(),
            target_tab_id,
            inserted_text: marker.to_string(),
            write_request_count: write.request_count,
            tabs_containing_marker: hits,
            cleanup_enabled: cleanup,
            cleanup_response,
        })
    }
}
