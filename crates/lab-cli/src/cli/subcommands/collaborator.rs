use clap::Subcommand;

/// Collaborator commands.
#[derive(Clone, Debug, Subcommand)]
pub enum CollaboratorCommands {
    /// Add a collaborator to a submission (owner or admin).
    Add {
        research_id: String,
        #[arg(long)]
        user: String,
    },
    /// Count collaborators on a submission.
    Count { research_id: String },
}
