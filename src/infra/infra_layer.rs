// The infra module contains implementations of core traits.
// Each external system gets its own submodule.

#[path = "google_docs/mod.rs"]
pub mod google_docs;

#[path = "auth/mod.rs"]
pub mod auth;

pub mod http;
