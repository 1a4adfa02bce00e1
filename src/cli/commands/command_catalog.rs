// One file per subcommand. Each handler prints its JSON result and returns
// whether the run counts as a success; hard failures come back as errors.

pub mod create_tab;
pub mod isolation_test;
pub mod list_tabs;
pub mod update_four_tabs;
pub mod write;

use crate::cli::args::{Commands, DocArgs};
use crate::config::AppConfig;
use crate::core::docs::{DocsError, TabWriterService};
use crate::infra::auth::{GogAuth, GogCli};
use crate::infra::google_docs::GoogleDocsClient;
use crate::infra::http::build_client;

pub async fn run(command: Commands, config: &AppConfig) -> anyhow::Result<bool> {
    match command {
        Commands::ListTabs { doc } => list_tabs::run(&doc, config).await,
        Commands::Write {
            doc,
            tab,
            content,
            mode,
            dry_run,
        } => write::run(&doc, &tab, &content, mode, dry_run, config).await,
        Commands::CreateTab {
            doc,
            title,
            parent_tab_id,
            index,
            icon_emoji,
            dry_run,
        } => {
            let options = create_tab::options(title, parent_tab_id, index, icon_emoji);
            create_tab::run(&doc, &options, dry_run, config).await
        }
        Commands::IsolationTest {
            doc,
            tab_title,
            text,
            no_cleanup,
        } => isolation_test::run(&doc, &tab_title, text, !no_cleanup, config).await,
        Commands::UpdateFourTabs {
            doc,
            recent_file,
            ai_news_file,
            us_stock_file,
            tw_stock_file,
            recent_tab_title,
            ai_news_tab_title,
            us_stock_tab_title,
            tw_stock_tab_title,
            mode,
            dry_run,
            continue_on_error,
        } => {
            let plan = update_four_tabs::plan([
                (recent_tab_title, recent_file),
                (ai_news_tab_title, ai_news_file),
                (us_stock_tab_title, us_stock_file),
                (tw_stock_tab_title, tw_stock_file),
            ]);
            update_four_tabs::run(&doc, &plan, mode, dry_run, continue_on_error, config).await
        }
    }
}

/// Accepts a bare document id or a docs.google.com URL.
pub fn resolve_doc_id(doc: &DocArgs) -> Result<String, DocsError> {
    GoogleDocsClient::extract_doc_id(&doc.doc_id).ok_or_else(|| {
        DocsError::Validation(format!("Not a document id or Google Docs URL: {}", doc.doc_id))
    })
}

/// Mints an access token through `gog` and wires up the live Docs client.
pub async fn connect(config: &AppConfig) -> Result<TabWriterService<GoogleDocsClient>, DocsError> {
    let client = build_client(config.http_timeout)?;
    let auth = GogAuth::new(
        GogCli::new(config.gog_bin.as_str()),
        client.clone(),
        config.oauth_token_url.as_str(),
    );
    let token = auth.get_access_token().await?;

    Ok(TabWriterService::new(GoogleDocsClient::new(
        client,
        config.docs_api_base.as_str(),
        token,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(raw: &str) -> DocArgs {
        DocArgs {
            doc_id: raw.to_string(),
        }
    }

    #[test]
    fn test_resolve_doc_id_accepts_url_and_bare_id() {
        assert_eq!(
            resolve_doc_id(&doc("https://docs.google.com/document/d/1AbC_x-9/edit?tab=t.0")).unwrap(),
            "1AbC_x-9"
        );
        assert_eq!(resolve_doc_id(&doc(" 1AbC_x-9 ")).unwrap(), "1AbC_x-9");
    }

    #[test]
    fn test_resolve_doc_id_rejects_garbage() {
        let err = resolve_doc_id(&doc("not a doc")).unwrap_err();
        assert!(matches!(err, DocsError::Validation(_)));
    }
}
