use clap::Subcommand;

/// Citation and download trend commands.
#[derive(Clone, Debug, Subcommand)]
pub enum TrendCommands {
    /// Record a citation count for one month.
    Citation {
        research_id: String,
        #[arg(long)]
        month: u32,
        #[arg(long)]
        year: i32,
        #[arg(long)]
        count: u64,
    },
    /// Record a download count for one month.
    Download {
        research_id: String,
        #[arg(long)]
        month: u32,
        #[arg(long)]
        year: i32,
        #[arg(long)]
        count: u64,
    },
    /// List raw trend rows, oldest first.
    List { research_id: String },
}
