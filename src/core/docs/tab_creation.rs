use serde::Serialize;

use super::docs_error::DocsError;
use super::docs_models::{BatchUpdateResponse, Tab, TabProperties};
use super::docs_service::{DocsApi, TabWriterService};
use super::requests::Request;
use super::tab_tree::{find_tab_by_id, find_tabs_by_title, flatten_tabs, TabSummary};

#[derive(Debug, Clone, Default)]
pub struct CreateTabOptions {
    pub title: String,
    pub parent_tab_id: Option<String>,
    /// Zero-based position under the parent.
    pub index: Option<u32>,
    pub icon_emoji: Option<String>,
}

impl CreateTabOptions {
    fn tab_properties(&self) -> TabProperties {
        TabProperties {
            title: Some(self.title.clone()),
            parent_tab_id: self.parent_tab_id.clone(),
            index: self.index,
            icon_emoji: self.icon_emoji.clone(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTabReport {
    pub ok: bool,
    pub dry_run: bool,
    pub doc_id: String,
    pub requested_title: String,
    pub request: Vec<Request>,
    pub before_tab_count: usize,
    pub after_tab_count: usize,
    pub created_tab_from_response: Option<TabProperties>,
    pub matched_tabs_after: Vec<CreatedTabSummary>,
    pub all_tabs_after: Vec<CreatedTabSummary>,
    pub update_response: Option<BatchUpdateResponse>,
}

/// Like `TabSummary` but always prints `parentTabId`, null for top-level tabs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedTabSummary {
    pub title: Option<String>,
    pub tab_id: Option<String>,
    pub parent_tab_id: Option<String>,
}

impl From<TabSummary> for CreatedTabSummary {
    fn from(s: TabSummary) -> Self {
        Self {
            title: s.title,
            tab_id: s.tab_id,
            parent_tab_id: s.parent_tab_id,
        }
    }
}

fn summarize(tabs: &[&Tab]) -> Vec<CreatedTabSummary> {
    tabs.iter().map(|t| TabSummary::of(t).into()).collect()
}

impl<A: DocsApi> TabWriterService<A> {
    /// Adds a tab and confirms it shows up when the document is read back.
    ///
    /// Confirmation goes by the tab id from the reply when there is one, and
    /// by title otherwise. A dry run only builds the request.
    pub async fn create_tab(
        &self,
        doc_id: &str,
        options: &CreateTabOptions,
        dry_run: bool,
    ) -> Result<CreateTabReport, DocsError> {
        let before = self.api().get_document(doc_id).await?;
        let before_tab_count = flatten_tabs(&before.tabs).len();

        let request = vec![Request::add_tab(options.tab_properties())];

        let mut update_response = None;
        let mut created = None;
        if !dry_run {
            let resp = self.api().batch_update(doc_id, &request).await?;
            created = resp.created_tab();
            update_response = Some(resp);
        }

        let after = self.api().get_document(doc_id).await?;
        let after_tabs = flatten_tabs(&after.tabs);
        let matched = find_tabs_by_title(&after_tabs, &options.title);

        let created_id = created.as_ref().and_then(|p| p.tab_id.as_deref());
        let verified_by_id = match created_id {
            Some(id) => find_tab_by_id(&after_tabs, id).is_some(),
            None => true,
        };
        let ok = (dry_run || !matched.is_empty()) && verified_by_id;

        if ok {
            tracing::info!(
                "Tab '{}' {} ({} -> {} tabs)",
                options.title,
                if dry_run { "planned" } else { "created" },
                before_tab_count,
                after_tabs.len()
            );
        } else {
            tracing::warn!("Tab '{}' not found after batch update", options.title);
        }

        Ok(CreateTabReport {
            ok,
            dry_run,
            doc_id: doc_id.to_string(),
            requested_title: options.title.clone(),
            before_tab_count,
            after_tab_count: after_tabs.len(),
            created_tab_from_response: created,
            matched_tabs_after: summarize(&matched),
            all_tabs_after: summarize(&after_tabs),
            update_response,
            request,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::google_docs::InMemoryDocs;

    fn options(title: &str) -> CreateTabOptions {
        CreateTabOptions {
            title: title.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_tab_is_confirmed_by_returned_id() {
        let docs = InMemoryDocs::new("doc-1");
        docs.add_tab("t.0", "最近行程", None, "");
        let service = TabWriterService::new(docs);

        let report = service
            .create_tab("doc-1", &options("測試-自動新增tab"), false)
            .await
            .unwrap();

        assert!(report.ok);
        assert_eq!(report.before_tab_count, 1);
        assert_eq!(report.after_tab_count, 2);
        let created = report.created_tab_from_response.unwrap();
        assert_eq!(report.matched_tabs_after.len(), 1);
        assert_eq!(report.matched_tabs_after[0].tab_id, created.tab_id);
    }

    #[tokio::test]
    async fn test_create_nested_tab_under_parent() {
        let docs = InMemoryDocs::new("doc-1");
        docs.add_tab("t.0", "Parent", None, "");
        docs.add_tab("t.1", "Sibling", Some("t.0"), "");
        let service = TabWriterService::new(docs);

        let report = service
            .create_tab(
                "doc-1",
                &CreateTabOptions {
                    title: "Child".to_string(),
                    parent_tab_id: Some("t.0".to_string()),
                    index: Some(0),
                    icon_emoji: Some("📈".to_string()),
                },
                false,
            )
            .await
            .unwrap();

        assert!(report.ok);
        let titles: Vec<_> = report
            .all_tabs_after
            .iter()
            .map(|t| t.title.clone().unwrap())
            .collect();
        assert_eq!(titles, vec!["Parent", "Child", "Sibling"]);
        assert_eq!(report.matched_tabs_after[0].parent_tab_id.as_deref(), Some("t.0"));
    }

    #[tokio::test]
    async fn test_dry_run_counts_as_success_without_writing() {
        let docs = InMemoryDocs::new("doc-1");
        let service = TabWriterService::new(docs);

        let report = service.create_tab("doc-1", &options("draft"), true).await.unwrap();

        assert!(report.ok);
        assert!(report.update_response.is_none());
        assert_eq!(report.after_tab_count, 0);
        assert!(service.api().applied_batches().is_empty());

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(
            json["request"],
            serde_json::json!([{ "addDocumentTab": { "tabProperties": { "title": "draft" } } }])
        );
        assert!(json["createdTabFromResponse"].is_null());
    }

    #[tokio::test]
    async fn test_create_under_unknown_parent_fails() {
        let docs = InMemoryDocs::new("doc-1");
        let service = TabWriterService::new(docs);

        let err = service
            .create_tab(
                "doc-1",
                &CreateTabOptions {
                    title: "orphan".to_string(),
                    parent_tab_id: Some("t.missing".to_string()),
                    ..Default::default()
                },
                false,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, DocsError::Http { status: 400, .. }));
    }
}
