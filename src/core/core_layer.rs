// The core module contains the document model and the tab pipelines.
// Nothing in here knows about HTTP, OAuth or the command line.

#[path = "docs/mod.rs"]
pub mod docs;
