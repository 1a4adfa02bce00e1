// Helpers over the tab forest: flatten, look up, read back text.

use serde::Serialize;

use super::docs_models::Tab;

/// Compact tab description used in JSON results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TabSummary {
    pub title: Option<String>,
    pub tab_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_tab_id: Option<String>,
}

impl TabSummary {
    pub fn of(tab: &Tab) -> Self {
        Self {
            title: tab.tab_properties.title.clone(),
            tab_id: tab.tab_properties.tab_id.clone(),
            parent_tab_id: tab.tab_properties.parent_tab_id.clone(),
        }
    }
}

/// Flattens the forest depth-first, parent before children, siblings in document order.
pub fn flatten_tabs(tabs: &[Tab]) -> Vec<&Tab> {
    let mut out = Vec::new();
    // Explicit stack, children pushed in reverse so the first child pops first.
    let mut stack: Vec<&Tab> = tabs.iter().rev().collect();
    while let Some(tab) = stack.pop() {
        out.push(tab);
        stack.extend(tab.child_tabs.iter().rev());
    }
    out
}

/// First tab whose title matches exactly (case-sensitive).
pub fn find_tab_by_title<'a>(tabs: &[&'a Tab], title: &str) -> Option<&'a Tab> {
    tabs.iter().copied().find(|t| t.title() == Some(title))
}

/// Every tab whose title matches exactly, in flattened order.
pub fn find_tabs_by_title<'a>(tabs: &[&'a Tab], title: &str) -> Vec<&'a Tab> {
    tabs.iter()
        .copied()
        .filter(|t| t.title() == Some(title))
        .collect()
}

pub fn find_tab_by_id<'a>(tabs: &[&'a Tab], tab_id: &str) -> Option<&'a Tab> {
    tabs.iter().copied().find(|t| t.tab_id() == Some(tab_id))
}

/// Concatenates every text run of the tab body in document order.
///
/// Runs already carry their own newlines, so nothing is inserted between them.
pub fn tab_text(tab: &Tab) -> String {
    tab.body_content()
        .iter()
        .filter_map(|se| se.paragraph.as_ref())
        .flat_map(|p| p.elements.iter())
        .filter_map(|el| el.text_run.as_ref())
        .filter_map(|run| run.content.as_deref())
        .collect()
}

/// Largest `endIndex` in the tab body, never less than 1.
pub fn tab_end_index(tab: &Tab) -> u32 {
    tab.body_content()
        .iter()
        .filter_map(|se| se.end_index)
        .fold(1, u32::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::docs::docs_models::{
        Body, DocumentTab, Paragraph, ParagraphElement, StructuralElement, TabProperties, TextRun,
    };

    fn tab(id: &str, title: &str, children: Vec<Tab>) -> Tab {
        Tab {
            tab_properties: TabProperties {
                tab_id: Some(id.to_string()),
                title: Some(title.to_string()),
                ..Default::default()
            },
            child_tabs: children,
            ..Default::default()
        }
    }

    fn with_runs(mut tab: Tab, runs: &[&str], end_index: u32) -> Tab {
        let paragraph = Paragraph {
            elements: runs
                .iter()
                .map(|r| ParagraphElement {
                    text_run: Some(TextRun {
                        content: Some(r.to_string()),
                        ..Default::default()
                    }),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        };
        tab.document_tab = Some(DocumentTab {
            body: Some(Body {
                content: vec![
                    StructuralElement {
                        end_index: Some(1),
                        ..Default::default()
                    },
                    StructuralElement {
                        start_index: Some(1),
                        end_index: Some(end_index),
                        paragraph: Some(paragraph),
                        ..Default::default()
                    },
                ],
                ..Default::default()
            }),
            ..Default::default()
        });
        tab
    }

    /// Builds a deterministic forest: `width` roots, each node with `width - depth`
    /// children until `depth` runs out. Returns the forest and its node count.
    fn forest(width: usize, depth: usize, prefix: &str) -> (Vec<Tab>, usize) {
        let mut count = 0;
        let mut tabs = Vec::new();
        for i in 0..width {
            let id = format!("{}{}", prefix, i);
            let (children, n) = if depth == 0 {
                (Vec::new(), 0)
            } else {
                forest(width.saturating_sub(1).max(1), depth - 1, &format!("{}.", id))
            };
            count += 1 + n;
            tabs.push(tab(&id, &format!("title-{}", id), children));
        }
        (tabs, count)
    }

    fn descendant_ids(tab: &Tab, out: &mut Vec<String>) {
        for child in &tab.child_tabs {
            out.push(child.tab_id().unwrap().to_string());
            descendant_ids(child, out);
        }
    }

    #[test]
    fn test_flatten_preserves_count_and_preorder() {
        for (width, depth) in [(1, 0), (3, 0), (1, 6), (3, 2), (4, 3)] {
            let (tabs, expected) = forest(width, depth, "t");
            let flat = flatten_tabs(&tabs);
            assert_eq!(flat.len(), expected, "width {} depth {}", width, depth);

            let position = |id: &str| flat.iter().position(|t| t.tab_id() == Some(id)).unwrap();
            for node in &flat {
                let mut descendants = Vec::new();
                descendant_ids(node, &mut descendants);
                let own = position(node.tab_id().unwrap());
                for d in descendants {
                    assert!(own < position(&d), "{} should precede {}", own, d);
                }
            }
        }
    }

    #[test]
    fn test_flatten_visits_child_subtree_before_next_sibling() {
        let tabs = vec![
            tab("a", "A", vec![tab("a1", "A1", vec![tab("a1x", "A1x", vec![])]), tab("a2", "A2", vec![])]),
            tab("b", "B", vec![]),
        ];

        let ids: Vec<_> = flatten_tabs(&tabs).iter().map(|t| t.tab_id().unwrap()).collect();
        assert_eq!(ids, vec!["a", "a1", "a1x", "a2", "b"]);
    }

    #[test]
    fn test_flatten_empty_forest() {
        assert!(flatten_tabs(&[]).is_empty());
    }

    #[test]
    fn test_title_lookup_returns_first_duplicate() {
        let tabs = vec![
            tab("t.1", "美股", vec![]),
            tab("t.2", "最近行程", vec![tab("t.3", "美股", vec![])]),
        ];
        let flat = flatten_tabs(&tabs);

        assert_eq!(find_tab_by_title(&flat, "美股").unwrap().tab_id(), Some("t.1"));
        assert_eq!(find_tabs_by_title(&flat, "美股").len(), 2);
    }

    #[test]
    fn test_lookup_absence_is_none() {
        let tabs = vec![tab("t.1", "AI 新聞", vec![])];
        let flat = flatten_tabs(&tabs);

        assert!(find_tab_by_title(&flat, "ai 新聞").is_none());
        assert!(find_tab_by_title(&flat, "AI 新聞 ").is_none());
        assert!(find_tab_by_id(&flat, "t.9").is_none());
        assert!(find_tabs_by_title(&flat, "台股").is_empty());
    }

    #[test]
    fn test_lookup_by_id_reaches_nested_tabs() {
        let tabs = vec![tab("t.1", "Parent", vec![tab("t.2", "Child", vec![])])];
        let flat = flatten_tabs(&tabs);

        assert_eq!(find_tab_by_id(&flat, "t.2").unwrap().title(), Some("Child"));
    }

    #[test]
    fn test_tab_text_concatenates_runs_without_separators() {
        let t = with_runs(tab("t.1", "A", vec![]), &["Hello ", "world", "\n"], 13);
        assert_eq!(tab_text(&t), "Hello world\n");
    }

    #[test]
    fn test_tab_end_index() {
        let t = with_runs(tab("t.1", "A", vec![]), &["abc\n"], 5);
        assert_eq!(tab_end_index(&t), 5);

        let bare = tab("t.2", "B", vec![]);
        assert_eq!(tab_end_index(&bare), 1);
        assert_eq!(tab_text(&bare), "");
    }

    #[test]
    fn test_summary_skips_missing_parent() {
        let value = serde_json::to_value(TabSummary::of(&tab("t.1", "A", vec![]))).unwrap();
        assert_eq!(value, serde_json::json!({ "title": "A", "tabId": "t.1" }));
    }
}
