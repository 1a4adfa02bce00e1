// =============================================================================
// BATCH UPDATE REQUESTS
// =============================================================================
//
// Typed subset of the `documents.batchUpdate` request union. Each variant
// serializes to the API's externally tagged shape, e.g.
// `{"insertText": {"location": {"tabId": "t.0", "index": 1}, "text": "..."}}`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::docs_error::DocsError;
use super::docs_models::TabProperties;

/// First editable index of a tab body. Index 0 holds the section break.
pub const BODY_START_INDEX: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Request {
    AddDocumentTab(AddDocumentTabRequest),
    DeleteContentRange(DeleteContentRangeRequest),
    InsertText(InsertTextRequest),
    ReplaceAllText(ReplaceAllTextRequest),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddDocumentTabRequest {
    pub tab_properties: TabProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteContentRangeRequest {
    pub range: Range,
}

/// Half-open `[start_index, end_index)` range inside one tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Range {
    pub tab_id: String,
    pub start_index: u32,
    pub end_index: u32,
}

/// Exactly one of `location` / `end_of_segment_location` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertTextRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_of_segment_location: Option<EndOfSegmentLocation>,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub tab_id: String,
    pub index: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndOfSegmentLocation {
    pub tab_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceAllTextRequest {
    pub contains_text: SubstringMatchCriteria,
    pub replace_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tabs_criteria: Option<TabsCriteria>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubstringMatchCriteria {
    pub text: String,
    #[serde(default)]
    pub match_case: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabsCriteria {
    pub tab_ids: Vec<String>,
}

impl Request {
    pub fn add_tab(tab_properties: TabProperties) -> Self {
        Request::AddDocumentTab(AddDocumentTabRequest { tab_properties })
    }

    pub fn delete_range(tab_id: &str, start_index: u32, end_index: u32) -> Self {
        Request::DeleteContentRange(DeleteContentRangeRequest {
            range: Range {
                tab_id: tab_id.to_string(),
                start_index,
                end_index,
            },
        })
    }

    pub fn insert_at(tab_id: &str, index: u32, text: &str) -> Self {
        Request::InsertText(InsertTextRequest {
            location: Some(Location {
                tab_id: tab_id.to_string(),
                index,
            }),
            end_of_segment_location: None,
            text: text.to_string(),
        })
    }

    pub fn insert_at_end(tab_id: &str, text: &str) -> Self {
        Request::InsertText(InsertTextRequest {
            location: None,
            end_of_segment_location: Some(EndOfSegmentLocation {
                tab_id: tab_id.to_string(),
            }),
            text: text.to_string(),
        })
    }

    /// Case-sensitive replace-all limited to the given tab.
    pub fn replace_all_in_tab(tab_id: &str, needle: &str, replacement: &str) -> Self {
        Request::ReplaceAllText(ReplaceAllTextRequest {
            contains_text: SubstringMatchCriteria {
                text: needle.to_string(),
                match_case: true,
            },
            replace_text: replacement.to_string(),
            tabs_criteria: Some(TabsCriteria {
                tab_ids: vec![tab_id.to_string()],
            }),
        })
    }
}

/// How text is written into a tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteMode {
    /// Overwrite all editable content.
    #[default]
    Replace,
    /// Add after the existing content.
    Append,
}

impl WriteMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            WriteMode::Replace => "replace",
            WriteMode::Append => "append",
        }
    }
}

impl fmt::Display for WriteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WriteMode {
    type Err = DocsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "replace" => Ok(WriteMode::Replace),
            "append" => Ok(WriteMode::Append),
            other => Err(DocsError::Validation(format!("Unsupported mode: {}", other))),
        }
    }
}

/// Builds the requests that write `text` into `tab_id`.
///
/// `tab_end` is the tab's current maximum body `endIndex`. In replace mode the
/// delete stops one short of it: the final newline of a segment cannot be
/// deleted. An empty tab (`tab_end <= 2`) gets the insert only.
pub fn build_write_requests(tab_id: &str, text: &str, mode: WriteMode, tab_end: u32) -> Vec<Request> {
    match mode {
        WriteMode::Replace => {
            let mut requests = Vec::with_capacity(2);
            let delete_end = tab_end.saturating_sub(1).max(BODY_START_INDEX);
            if delete_end > BODY_START_INDEX {
                requests.push(Request::delete_range(tab_id, BODY_START_INDEX, delete_end));
            }
            requests.push(Request::insert_at(tab_id, BODY_START_INDEX, text));
            requests
        }
        WriteMode::Append => vec![Request::insert_at_end(tab_id, text)],
    }
}
