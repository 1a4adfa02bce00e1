use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::core::docs::{WriteMode, DEFAULT_TAB_TITLES};

#[derive(Parser, Debug)]
#[command(name = "docs-tabs")]
#[command(version)]
#[command(about = "Create, list and write Google Docs tabs using the gog login", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Target document, as a bare id or a docs.google.com URL.
#[derive(Args, Debug, Clone)]
pub struct DocArgs {
    #[arg(long = "doc-id", env = "GOOGLE_DOC_ID")]
    pub doc_id: String,
}

#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct TabSelector {
    /// Target tab by title (first match in document order)
    #[arg(long)]
    pub tab_title: Option<String>,

    /// Target tab by id
    #[arg(long)]
    pub tab_id: Option<String>,
}

#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct ContentSource {
    /// Text to write
    #[arg(long)]
    pub text: Option<String>,

    /// UTF-8 file whose content is written
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print every tab of the document in order
    #[command(alias = "ls")]
    ListTabs {
        #[command(flatten)]
        doc: DocArgs,
    },

    /// Write text into one tab
    Write {
        #[command(flatten)]
        doc: DocArgs,

        #[command(flatten)]
        tab: TabSelector,

        #[command(flatten)]
        content: ContentSource,

        /// replace or append
        #[arg(long, default_value = "replace")]
        mode: WriteMode,

        /// Build the requests without submitting them
        #[arg(long)]
        dry_run: bool,
    },

    /// Add a new tab and confirm it exists afterwards
    CreateTab {
        #[command(flatten)]
        doc: DocArgs,

        /// Title of the new tab (defaults to a timestamped test title)
        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        parent_tab_id: Option<String>,

        /// Zero-based position under the parent
        #[arg(long)]
        index: Option<u32>,

        #[arg(long)]
        icon_emoji: Option<String>,

        #[arg(long)]
        dry_run: bool,
    },

    /// Append a marker to one tab and check that no other tab received it
    IsolationTest {
        #[command(flatten)]
        doc: DocArgs,

        #[arg(long)]
        tab_title: String,

        /// Marker text (defaults to a timestamped marker)
        #[arg(long)]
        text: Option<String>,

        /// Leave the marker in the tab
        #[arg(long)]
        no_cleanup: bool,
    },

    /// Refresh the four daily tabs from local files
    UpdateFourTabs {
        #[command(flatten)]
        doc: DocArgs,

        #[arg(long)]
        recent_file: PathBuf,

        #[arg(long)]
        ai_news_file: PathBuf,

        #[arg(long)]
        us_stock_file: PathBuf,

        #[arg(long)]
        tw_stock_file: PathBuf,

        #[arg(long, default_value = DEFAULT_TAB_TITLES[0])]
        recent_tab_title: String,

        #[arg(long, default_value = DEFAULT_TAB_TITLES[1])]
        ai_news_tab_title: String,

        #[arg(long, default_value = DEFAULT_TAB_TITLES[2])]
        us_stock_tab_title: String,

        #[arg(long, default_value = DEFAULT_TAB_TITLES[3])]
        tw_stock_tab_title: String,

        #[arg(long, default_value = "replace")]
        mode: WriteMode,

        #[arg(long)]
        dry_run: bool,

        /// Keep going after a tab fails
        #[arg(long)]
        continue_on_error: bool,
    },
}
