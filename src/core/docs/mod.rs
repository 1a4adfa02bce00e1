pub mod batch_refresh;
pub mod docs_error;
pub mod docs_models;
pub mod docs_service;
pub mod isolation_check;
pub mod requests;
pub mod tab_creation;
pub mod tab_tree;

pub use batch_refresh::{BatchRefreshReport, TabContentSource, TabOutcome, DEFAULT_TAB_TITLES};
pub use docs_error::DocsError;
pub use docs_models::{BatchUpdateResponse, Document, Tab, TabProperties};
pub use docs_service::{DocsApi, TabListing, TabTarget, TabWriterService, WriteReport};
pub use isolation_check::{IsolationReport, MarkerHit};
pub use requests::{build_write_requests, Request, WriteMode};
pub use tab_creation::{CreateTabOptions, CreateTabReport};
pub use tab_tree::TabSummary;
