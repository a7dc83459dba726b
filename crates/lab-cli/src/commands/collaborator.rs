use serde_json::json;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::CollaboratorCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `labctl collaborator`.
pub async fn handle(
    action: &CollaboratorCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        CollaboratorCommands::Add { research_id, user } => {
            let actor = ctx.require_actor()?;
            let collaborator = ctx
                .service
                .add_collaborator(actor, research_id, user)
                .await?;
            output(&collaborator, flags.format)
        }
        CollaboratorCommands::Count { research_id } => {
            let count = ctx.service.count_collaborators(research_id).await?;
            output(
                &json!({ "research_id": research_id, "collaborators": count }),
                flags.format,
            )
        }
    }
}
