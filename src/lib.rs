// Library root for the Google Docs tab tooling.
//
// **Architecture Overview:**
// - `core/` = Document model, request building and the tab pipelines
// - `infra/` = Implementations of core traits (Docs HTTP API, OAuth bridge)
// - `cli/` = clap adapters that turn pipeline results into JSON output

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with several mod.rs files that all look the same.
#[path = "core/core_layer.rs"]
pub mod core;
#[path = "infra/infra_layer.rs"]
pub mod infra;
#[path = "cli/cli_layer.rs"]
pub mod cli;

pub mod config;
