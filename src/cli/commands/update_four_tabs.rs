use std::path::PathBuf;

use crate::cli::args::DocArgs;
use crate::cli::output::print_result;
use crate::config::AppConfig;
use crate::core::docs::{TabContentSource, WriteMode};

use super::{connect, resolve_doc_id};

pub fn plan(slots: [(String, PathBuf); 4]) -> Vec<TabContentSource> {
    slots
        .into_iter()
        .map(|(title, file)| TabContentSource::new(title, file))
        .collect()
}

/// Per-tab failures end up in the report, not in the returned error.
pub async fn run(
    doc: &DocArgs,
    plan: &[TabContentSource],
    mode: WriteMode,
    dry_run: bool,
    continue_on_error: bool,
    config: &AppConfig,
) -> anyhow::Result<bool> {
    let doc_id = resolve_doc_id(doc)?;
    let service = connect(config).await?;

    let report = service
        .refresh_tabs(&doc_id, plan, mode, dry_run, continue_on_error)
        .await;
    tracing::info!(
        "Updated {}/{} tabs of {}",
        report.results.iter().filter(|r| r.is_ok()).count(),
        plan.len(),
        doc_id
    );

    print_result(&report)?;
    Ok(report.ok)
}
