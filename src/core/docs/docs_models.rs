// =============================================================================
// GOOGLE DOCS DOCUMENT MODEL
// =============================================================================
//
// Typed view of the `documents.get?includeTabsContent=true` response.
//
// Only the fields the tab tooling reads are named here. Everything else
// (styles, lists, tables, inline objects...) lands in the flattened `extra`
// maps, so a document that is deserialized and re-serialized comes back out
// without losing anything the API sent.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub tabs: Vec<Tab>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One node of the tab forest. Children are owned by their parent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    #[serde(default)]
    pub tab_properties: TabProperties,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_tab: Option<DocumentTab>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub child_tabs: Vec<Tab>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Tab metadata. Also used as the payload of an `addDocumentTab` request,
/// which is why every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tab_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_tab_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_emoji: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentTab {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Body>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Body {
    #[serde(default)]
    pub content: Vec<StructuralElement>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A body segment: paragraph, section break, table, ...
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuralElement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_index: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_index: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paragraph: Option<Paragraph>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paragraph {
    #[serde(default)]
    pub elements: Vec<ParagraphElement>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphElement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_index: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_index: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_run: Option<TextRun>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRun {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Reply of `documents.batchUpdate`. Replies stay raw; one entry per request,
/// empty objects for requests that have nothing to report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchUpdateResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
    #[serde(default)]
    pub replies: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BatchUpdateResponse {
    /// Properties of the tab created by an `addDocumentTab` sent as the first request.
    pub fn created_tab(&self) -> Option<TabProperties> {
        let props = self
            .replies
            .first()?
            .get("addDocumentTab")?
            .get("tabProperties")?;
        serde_json::from_value(props.clone()).ok()
    }
}

impl Tab {
    pub fn tab_id(&self) -> Option<&str> {
        self.tab_properties.tab_id.as_deref()
    }

    pub fn title(&self) -> Option<&str> {
        self.tab_properties.title.as_deref()
    }

    /// Structural elements of the tab body, empty when the tab carries no body.
    pub fn body_content(&self) -> &[StructuralElement] {
        self.document_tab
            .as_ref()
            .and_then(|d| d.body.as_ref())
            .map(|b| b.content.as_slice())
            .unwrap_or(&[])
    }
}
