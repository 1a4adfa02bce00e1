use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use crate::core::docs::docs_models::{
    Body, DocumentTab, Paragraph, ParagraphElement, StructuralElement, TextRun,
};
use crate::core::docs::requests::{
    DeleteContentRangeRequest, InsertTextRequest, ReplaceAllTextRequest, BODY_START_INDEX,
};
use crate::core::docs::{BatchUpdateResponse, DocsApi, DocsError, Document, Request, Tab, TabProperties};

/// One tab of the in-memory document. `text` is the editable content; the
/// segment terminator newline is added when rendering.
#[derive(Debug, Clone)]
struct MemTab {
    id: String,
    title: String,
    icon_emoji: Option<String>,
    text: String,
    children: Vec<MemTab>,
}

#[derive(Debug, Default)]
struct State {
    tabs: Vec<MemTab>,
    applied: Vec<Vec<Request>>,
    next_id: u32,
}

/// `DocsApi` over a single in-memory document.
///
/// Indices follow the Docs API: UTF-16 code units, body text starting at 1,
/// every tab ending in an undeletable newline. A batch is applied to a copy of
/// the tabs and only committed when every request succeeds.
pub struct InMemoryDocs {
    doc_id: String,
    state: Mutex<State>,
}

impl InMemoryDocs {
    pub fn new(doc_id: impl Into<String>) -> Self {
        Self {
            doc_id: doc_id.into(),
            state: Mutex::new(State::default()),
        }
    }

    fn state(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Seeds a tab as the last child of `parent` (or as a top-level tab).
    /// Returns false and adds nothing when `parent` is unknown.
    pub fn add_tab(&self, id: &str, title: &str, parent: Option<&str>, text: &str) -> bool {
        let tab = MemTab {
            id: id.to_string(),
            title: title.to_string(),
            icon_emoji: None,
            text: text.to_string(),
            children: Vec::new(),
        };
        let mut state = self.state();
        match parent {
            None => {
                state.tabs.push(tab);
                true
            }
            Some(parent_id) => match find_mut(&mut state.tabs, parent_id) {
                Some(parent) => {
                    parent.children.push(tab);
                    true
                }
                None => false,
            },
        }
    }

    /// Every batch that was applied, in submission order.
    pub fn applied_batches(&self) -> Vec<Vec<Request>> {
        self.state().applied.clone()
    }

    fn check_doc_id(&self, method: &str, doc_id: &str) -> Result<(), DocsError> {
        if doc_id == self.doc_id {
            return Ok(());
        }
        Err(DocsError::Http {
            method: method.to_string(),
            url: format!("memory://documents/{}", doc_id),
            status: 404,
            body: "Requested entity was not found.".to_string(),
        })
    }
}

#[async_trait]
impl DocsApi for InMemoryDocs {
    async fn get_document(&self, doc_id: &str) -> Result<Document, DocsError> {
        self.check_doc_id("GET", doc_id)?;
        let state = self.state();
        Ok(Document {
            document_id: Some(self.doc_id.clone()),
            title: Some("In-memory document".to_string()),
            tabs: render_tabs(&state.tabs, None),
            extra: Map::new(),
        })
    }

    async fn batch_update(
        &self,
        doc_id: &str,
        requests: &[Request],
    ) -> Result<BatchUpdateResponse, DocsError> {
        self.check_doc_id("POST", doc_id)?;
        let mut state = self.state();

        let mut tabs = state.tabs.clone();
        let mut next_id = state.next_id;
        let mut replies = Vec::with_capacity(requests.len());

        for (i, request) in requests.iter().enumerate() {
            let reply = apply(&mut tabs, &mut next_id, request).map_err(|msg| DocsError::Http {
                method: "POST".to_string(),
                url: format!("memory://documents/{}:batchUpdate", doc_id),
                status: 400,
                body: format!("Invalid requests[{}]: {}", i, msg),
            })?;
            replies.push(reply);
        }

        state.tabs = tabs;
        state.next_id = next_id;
        state.applied.push(requests.to_vec());

        let mut extra = Map::new();
        extra.insert(
            "writeControl".to_string(),
            json!({ "requiredRevisionId": format!("rev-{}", state.applied.len()) }),
        );

        Ok(BatchUpdateResponse {
            document_id: Some(self.doc_id.clone()),
            replies,
            extra,
        })
    }
}

fn find_mut<'a>(tabs: &'a mut [MemTab], id: &str) -> Option<&'a mut MemTab> {
    for tab in tabs.iter_mut() {
        if tab.id == id {
            return Some(tab);
        }
        if let Some(found) = find_mut(&mut tab.children, id) {
            return Some(found);
        }
    }
    None
}

fn for_each_mut(tabs: &mut [MemTab], f: &mut dyn FnMut(&mut MemTab)) {
    for tab in tabs.iter_mut() {
        f(tab);
        for_each_mut(&mut tab.children, f);
    }
}

fn utf16_len(text: &str) -> u32 {
    text.encode_utf16().count() as u32
}

/// Byte offset of a UTF-16 offset, `None` when out of range or inside a surrogate pair.
fn byte_offset(text: &str, units: u32) -> Option<usize> {
    let mut seen = 0u32;
    for (i, c) in text.char_indices() {
        if seen == units {
            return Some(i);
        }
        seen += c.len_utf16() as u32;
        if seen > units {
            return None;
        }
    }
    (seen == units).then_some(text.len())
}

fn apply(tabs: &mut Vec<MemTab>, next_id: &mut u32, request: &Request) -> Result<Value, String> {
    match request {
        Request::AddDocumentTab(add) => add_tab(tabs, next_id, &add.tab_properties),
        Request::DeleteContentRange(delete) => delete_range(tabs, delete),
        Request::InsertText(insert) => insert_text(tabs, insert),
        Request::ReplaceAllText(replace) => replace_all(tabs, replace),
    }
}

fn add_tab(tabs: &mut Vec<MemTab>, next_id: &mut u32, props: &TabProperties) -> Result<Value, String> {
    *next_id += 1;
    let tab = MemTab {
        id: format!("t.mem{}", next_id),
        title: props.title.clone().unwrap_or_else(|| "Untitled tab".to_string()),
        icon_emoji: props.icon_emoji.clone(),
        text: String::new(),
        children: Vec::new(),
    };

    let siblings = match props.parent_tab_id.as_deref() {
        None => tabs,
        Some(parent_id) => {
            &mut find_mut(tabs, parent_id)
                .ok_or_else(|| format!("Parent tab not found: {}", parent_id))?
                .children
        }
    };
    let position = props
        .index
        .map(|i| (i as usize).min(siblings.len()))
        .unwrap_or(siblings.len());

    let mut reply_props = json!({ "tabId": tab.id, "title": tab.title, "index": position });
    if let Some(parent_id) = &props.parent_tab_id {
        reply_props["parentTabId"] = json!(parent_id);
    }
    siblings.insert(position, tab);

    Ok(json!({ "addDocumentTab": { "tabProperties": reply_props } }))
}

fn delete_range(tabs: &mut [MemTab], delete: &DeleteContentRangeRequest) -> Result<Value, String> {
    let range = &delete.range;
    let tab = find_mut(tabs, &range.tab_id).ok_or_else(|| format!("Tab not found: {}", range.tab_id))?;

    // The terminator sits at 1 + len; a range may stop at it but not include it.
    let limit = BODY_START_INDEX + utf16_len(&tab.text);
    if range.start_index < BODY_START_INDEX || range.end_index <= range.start_index || range.end_index > limit {
        return Err(format!(
            "Invalid deletion range [{}, {}) for segment ending at {}",
            range.start_index,
            range.end_index,
            limit + 1
        ));
    }

    let start = byte_offset(&tab.text, range.start_index - BODY_START_INDEX);
    let end = byte_offset(&tab.text, range.end_index - BODY_START_INDEX);
    match (start, end) {
        (Some(start), Some(end)) => {
            tab.text.replace_range(start..end, "");
            Ok(json!({}))
        }
        _ => Err("Deletion range splits a surrogate pair".to_string()),
    }
}

fn insert_text(tabs: &mut [MemTab], insert: &InsertTextRequest) -> Result<Value, String> {
    match (&insert.location, &insert.end_of_segment_location) {
        (Some(location), None) => {
            let tab = find_mut(tabs, &location.tab_id)
                .ok_or_else(|| format!("Tab not found: {}", location.tab_id))?;
            let at = location
                .index
                .checked_sub(BODY_START_INDEX)
                .and_then(|units| byte_offset(&tab.text, units))
                .ok_or_else(|| format!("Index {} is outside the segment", location.index))?;
            tab.text.insert_str(at, &insert.text);
        }
        (None, Some(end)) => {
            let tab = find_mut(tabs, &end.tab_id).ok_or_else(|| format!("Tab not found: {}", end.tab_id))?;
            tab.text.push_str(&insert.text);
        }
        _ => return Err("insertText needs exactly one of location / endOfSegmentLocation".to_string()),
    }
    Ok(json!({}))
}

fn replace_all(tabs: &mut [MemTab], replace: &ReplaceAllTextRequest) -> Result<Value, String> {
    if !replace.contains_text.match_case {
        return Err("matchCase=false is not supported".to_string());
    }
    let needle = &replace.contains_text.text;
    if needle.is_empty() {
        return Err("containsText.text must not be empty".to_string());
    }
    let scope = replace.tabs_criteria.as_ref().map(|c| c.tab_ids.as_slice());

    let mut changed = 0usize;
    for_each_mut(tabs, &mut |tab: &mut MemTab| {
        if scope.map_or(true, |ids| ids.contains(&tab.id)) {
            changed += tab.text.matches(needle.as_str()).count();
            tab.text = tab.text.replace(needle.as_str(), &replace.replace_text);
        }
    });

    Ok(json!({ "replaceAllText": { "occurrencesChanged": changed } }))
}

fn render_tabs(tabs: &[MemTab], parent: Option<&str>) -> Vec<Tab> {
    tabs.iter()
        .enumerate()
        .map(|(index, tab)| Tab {
            tab_properties: TabProperties {
                tab_id: Some(tab.id.clone()),
                title: Some(tab.title.clone()),
                parent_tab_id: parent.map(str::to_string),
                index: Some(index as u32),
                icon_emoji: tab.icon_emoji.clone(),
                extra: Map::new(),
            },
            document_tab: Some(render_body(&tab.text)),
            child_tabs: render_tabs(&tab.children, Some(tab.id.as_str())),
            extra: Map::new(),
        })
        .collect()
}

/// Section break at [0, 1), then one paragraph holding the text and its terminator.
fn render_body(text: &str) -> DocumentTab {
    let end = BODY_START_INDEX + utf16_len(text) + 1;
    DocumentTab {
        body: Some(Body {
            content: vec![
                StructuralElement {
                    start_index: None,
                    end_index: Some(BODY_START_INDEX),
                    paragraph: None,
                    extra: Map::from_iter([("sectionBreak".to_string(), json!({}))]),
                },
                StructuralElement {
                    start_index: Some(BODY_START_INDEX),
                    end_index: Some(end),
                    paragraph: Some(Paragraph {
                        elements: vec![ParagraphElement {
                            start_index: Some(BODY_START_INDEX),
                            end_index: Some(end),
                            text_run: Some(TextRun {
                                content: Some(format!("{}\n", text)),
                                extra: Map::new(),
                            }),
                            extra: Map::new(),
                        }],
                        extra: Map::new(),
                    }),
                    extra: Map::new(),
                },
            ],
            extra: Map::new(),
        }),
        extra: Map::new(),
    }
}
