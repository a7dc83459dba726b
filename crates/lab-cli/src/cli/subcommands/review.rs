use clap::Subcommand;

/// Review commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ReviewCommands {
    /// Add a review to a submission.
    Add {
        research_id: String,
        #[arg(long)]
        body: String,
    },
    /// List reviews, oldest first.
    List { research_id: String },
}
