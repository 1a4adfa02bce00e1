// =============================================================================
// GOOGLE DOCS MODULE
// =============================================================================
//
// `DocsApi` implementations.
//
// - `google_docs_client.rs` talks to the Docs REST API with a bearer token
//   obtained from the auth bridge.
// - `in_memory.rs` keeps a tab forest in memory and applies batch requests
//   the way the API does; the service tests run against it.

pub mod google_docs_client;
pub mod in_memory;

pub use google_docs_client::GoogleDocsClient;
pub use in_memory::InMemoryDocs;
