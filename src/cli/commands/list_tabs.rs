use crate::cli::args::DocArgs;
use crate::cli::output::print_result;
use crate::config::AppConfig;

use super::{connect, resolve_doc_id};

pub async fn run(doc: &DocArgs, config: &AppConfig) -> anyhow::Result<bool> {
    let doc_id = resolve_doc_id(doc)?;
    let service = connect(config).await?;

    let listing = service.list_tabs(&doc_id).await?;
    tracing::info!("Document {} has {} tabs", doc_id, listing.tabs.len());

    print_result(&listing)?;
    Ok(listing.ok)
}
