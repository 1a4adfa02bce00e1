use anyhow::Context;

use crate::cli::args::{ContentSource, DocArgs, TabSelector};
use crate::cli::output::print_result;
use crate::config::AppConfig;
use crate::core::docs::{TabTarget, WriteMode};

use super::{connect, resolve_doc_id};

pub async fn run(
    doc: &DocArgs,
    tab: &TabSelector,
    content: &ContentSource,
    mode: WriteMode,
    dry_run: bool,
    config: &AppConfig,
) -> anyhow::Result<bool> {
    let doc_id = resolve_doc_id(doc)?;
    let target = target(tab)?;
    // Read before authenticating so a bad path fails without touching the network.
    let text = read_content(content).await?;

    let service = connect(config).await?;
    let report = service.write_text(&doc_id, &target, &text, mode, dry_run).await?;

    print_result(&report)?;
    Ok(report.ok)
}

/// `--tab-id` wins when both are somehow set; clap already forbids that.
fn target(tab: &TabSelector) -> anyhow::Result<TabTarget> {
    match (&tab.tab_id, &tab.tab_title) {
        (Some(id), _) => Ok(TabTarget::Id(id.clone())),
        (None, Some(title)) => Ok(TabTarget::Title(title.clone())),
        (None, None) => anyhow::bail!("Provide --tab-title or --tab-id"),
    }
}

async fn read_content(content: &ContentSource) -> anyhow::Result<String> {
    match (&content.file, &content.text) {
        (Some(path), _) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display())),
        (None, Some(text)) => Ok(text.clone()),
        (None, None) => Ok(String::new()),
    }
}
