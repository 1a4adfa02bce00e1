// Sequential refresh of several tabs from local text files.
//
// Each tab is written on its own (one read + one batch update per tab), so a
// failure in one tab never rolls back the tabs written before it.

use std::path::PathBuf;

use serde::Serialize;

use super::docs_error::DocsError;
use super::docs_service::{DocsApi, TabTarget, TabWriterService, WriteReport};
use super::requests::WriteMode;

/// Default titles of the four daily tabs, in update order.
pub const DEFAULT_TAB_TITLES: [&str; 4] = ["最近行程", "AI 新聞", "美股", "台股"];

/// One slot of the refresh plan: which tab gets which file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabContentSource {
    pub tab_title: String,
    pub source_file: PathBuf,
}

impl TabContentSource {
    pub fn new(tab_title: impl Into<String>, source_file: impl Into<PathBuf>) -> Self {
        Self {
            tab_title: tab_title.into(),
            source_file: source_file.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TabFailure {
    pub ok: bool,
    pub doc_id: String,
    pub tab_title: String,
    pub source_file: PathBuf,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum TabOutcome {
    Written(WriteReport),
    Failed(TabFailure),
}

impl TabOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, TabOutcome::Written(_))
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRefreshReport {
    pub ok: bool,
    pub doc_id: String,
    pub mode: WriteMode,
    pub dry_run: bool,
    pub results: Vec<TabOutcome>,
}

impl<A: DocsApi> TabWriterService<A> {
    /// Writes each source file into its tab, in plan order.
    ///
    /// Stops at the first failing tab unless `continue_on_error` is set. The
    /// report is `ok` only when every attempted tab succeeded and, when
    /// stopping early, `results` holds only the attempted tabs.
    pub async fn refresh_tabs(
        &self,
        doc_id: &str,
        plan: &[TabContentSource],
        mode: WriteMode,
        dry_run: bool,
        continue_on_error: bool,
    ) -> BatchRefreshReport {
        let mut results = Vec::with_capacity(plan.len());
        let mut all_ok = true;

        for source in plan {
            match self.refresh_one(doc_id, source, mode, dry_run).await {
                Ok(report) => results.push(TabOutcome::Written(report)),
                Err(e) => {
                    tracing::warn!(
                        "Failed to update tab '{}' from {}: {}",
                        source.tab_title,
                        source.source_file.display(),
                        e
                    );
                    all_ok = false;
                    results.push(TabOutcome::Failed(TabFailure {
                        ok: false,
                        doc_id: doc_id.to_string(),
                        tab_title: source.tab_title.clone(),
                        source_file: source.source_file.clone(),
                        error: e.to_string(),
                    }));
                    if !continue_on_error {
                        break;
                    }
                }
            }
        }

        BatchRefreshReport {
            ok: all_ok,
            doc_id: doc_id.to_string(),
            mode,
            dry_run,
            results,
        }
    }

    async fn refresh_one(
        &self,
        doc_id: &str,
        source: &TabContentSource,
        mode: WriteMode,
        dry_run: bool,
    ) -> Result<WriteReport, DocsError> {
        let text = tokio::fs::read_to_string(&source.source_file).await?;
        self.write_text(
            doc_id,
            &TabTarget::Title(source.tab_title.clone()),
            &text,
            mode,
            dry_run,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::docs::tab_tree::{find_tab_by_title, flatten_tabs, tab_text};
    use crate::infra::google_docs::InMemoryDocs;
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        plan: Vec<TabContentSource>,
    }

    /// Four content files, one per default tab title.
    fn fixture(titles: [&str; 4]) -> Fixture {
        let dir = TempDir::new().unwrap();
        let plan = titles
            .iter()
            .enumerate()
            .map(|(i, title)| {
                let path = dir.path().join(format!("slot{}.txt", i));
                std::fs::write(&path, format!("content {}\n", i)).unwrap();
                TabContentSource::new(*title, path)
            })
            .collect();
        Fixture { _dir: dir, plan }
    }

    fn docs_with(titles: &[&str]) -> InMemoryDocs {
        let docs = InMemoryDocs::new("doc-1");
        for (i, title) in titles.iter().enumerate() {
            docs.add_tab(&format!("t.{}", i), title, None, "stale");
        }
        docs
    }

    #[tokio::test]
    async fn test_all_four_tabs_replaced() {
        let fx = fixture(DEFAULT_TAB_TITLES);
        let service = TabWriterService::new(docs_with(&DEFAULT_TAB_TITLES));

        let report = service
            .refresh_tabs("doc-1", &fx.plan, WriteMode::Replace, false, false)
            .await;

        assert!(report.ok);
        assert_eq!(report.results.len(), 4);
        assert!(report.results.iter().all(TabOutcome::is_ok));

        let doc = service.api().get_document("doc-1").await.unwrap();
        let tabs = flatten_tabs(&doc.tabs);
        for (i, title) in DEFAULT_TAB_TITLES.iter().enumerate() {
            let text = tab_text(find_tab_by_title(&tabs, title).unwrap());
            assert_eq!(text, format!("content {}\n\n", i));
        }
    }

    #[tokio::test]
    async fn test_stops_at_first_failure_without_flag() {
        // "AI 新聞" is missing from the document.
        let fx = fixture(DEFAULT_TAB_TITLES);
        let service = TabWriterService::new(docs_with(&["最近行程", "美股", "台股"]));

        let report = service
            .refresh_tabs("doc-1", &fx.plan, WriteMode::Replace, false, false)
            .await;

        assert!(!report.ok);
        assert_eq!(report.results.len(), 2);
        assert!(report.results[0].is_ok());
        assert!(!report.results[1].is_ok());
        // Only the first tab was written.
        assert_eq!(service.api().applied_batches().len(), 1);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["results"][1]["ok"], false);
        assert_eq!(json["results"][1]["tabTitle"], "AI 新聞");
        assert_eq!(json["results"][1]["error"], "Tab not found by title: AI 新聞");
    }

    #[tokio::test]
    async fn test_continue_on_error_attempts_every_tab() {
        let fx = fixture(DEFAULT_TAB_TITLES);
        let service = TabWriterService::new(docs_with(&["最近行程", "美股", "台股"]));

        let report = service
            .refresh_tabs("doc-1", &fx.plan, WriteMode::Append, false, true)
            .await;

        assert!(!report.ok);
        assert_eq!(report.results.len(), 4);
        let oks: Vec<bool> = report.results.iter().map(TabOutcome::is_ok).collect();
        assert_eq!(oks, vec![true, false, true, true]);
        assert_eq!(service.api().applied_batches().len(), 3);
    }

    #[tokio::test]
    async fn test_unreadable_file_is_a_tab_failure() {
        let mut fx = fixture(DEFAULT_TAB_TITLES);
        fx.plan[0].source_file = PathBuf::from("/nonexistent/recent.txt");
        let service = TabWriterService::new(docs_with(&DEFAULT_TAB_TITLES));

        let report = service
            .refresh_tabs("doc-1", &fx.plan, WriteMode::Replace, true, true)
            .await;

        assert!(!report.ok);
        assert_eq!(report.results.len(), 4);
        assert!(!report.results[0].is_ok());
        assert!(report.results[1..].iter().all(TabOutcome::is_ok));
        // Dry run: nothing submitted even for the good tabs.
        assert!(service.api().applied_batches().is_empty());
    }
}
