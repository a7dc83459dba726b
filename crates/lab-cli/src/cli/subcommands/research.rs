use clap::Subcommand;

/// Research submission commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ResearchCommands {
    /// Create a submission in DEVELOPMENT.
    Create {
        #[arg(long)]
        title: String,
        #[arg(long = "abstract")]
        abstract_text: Option<String>,
    },
    /// Get a submission by ID.
    Get { id: String },
    /// List submissions, newest first.
    List {
        #[arg(long)]
        status: Option<String>,
    },
    /// Full-text search over title and abstract.
    Search { query: String },
    /// Update title or abstract before a decision is made.
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long = "abstract")]
        abstract_text: Option<String>,
        /// Remove the abstract.
        #[arg(long, conflicts_with = "abstract_text")]
        clear_abstract: bool,
    },
    /// Submit a draft for review (DEVELOPMENT -> PENDING).
    Submit { id: String },
    /// Record one page view.
    View { id: String },
}
