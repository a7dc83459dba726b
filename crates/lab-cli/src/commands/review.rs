use crate::cli::GlobalFlags;
use crate::cli::subcommands::ReviewCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `labctl review`.
pub async fn handle(
    action: &ReviewCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        ReviewCommands::Add { research_id, body } => {
            let actor = ctx.require_actor()?;
            let review = ctx.service.add_review(actor, research_id, body).await?;
            output(&review, flags.format)
        }
        ReviewCommands::List { research_id } => {
            let reviews = ctx.service.list_reviews(research_id).await?;
            output(&reviews, flags.format)
        }
    }
}
