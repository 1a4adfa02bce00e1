use chrono::Local;

use crate::cli::args::DocArgs;
use crate::cli::output::print_result;
use crate::config::AppConfig;
use crate::core::docs::CreateTabOptions;

use super::{connect, resolve_doc_id};

pub fn default_title() -> String {
    format!("測試-自動新增tab-{}", Local::now().format("%Y%m%d-%H%M%S"))
}

pub fn options(
    title: Option<String>,
    parent_tab_id: Option<String>,
    index: Option<u32>,
    icon_emoji: Option<String>,
) -> CreateTabOptions {
    CreateTabOptions {
        title: title.unwrap_or_else(default_title),
        parent_tab_id,
        index,
        icon_emoji,
    }
}

pub async fn run(
    doc: &DocArgs,
    options: &CreateTabOptions,
    dry_run: bool,
    config: &AppConfig,
) -> anyhow::Result<bool> {
    let doc_id = resolve_doc_id(doc)?;
    let service = connect(config).await?;

    let report = service.create_tab(&doc_id, options, dry_run).await?;
    if !report.ok {
        tracing::warn!("Tab '{}' could not be confirmed after creation", options.title);
    }

    print_result(&report)?;
    Ok(report.ok)
}
