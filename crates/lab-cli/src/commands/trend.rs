use crate::cli::GlobalFlags;
use crate::cli::subcommands::TrendCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `labctl trend`.
pub async fn handle(
    action: &TrendCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        TrendCommands::Citation {
            research_id,
            month,
            year,
            count,
        } => {
            let actor = ctx.require_actor()?;
            let event = ctx
                .service
                .record_citations(actor, research_id, *month, *year, *count)
                .await?;
            output(&event, flags.format)
        }
        TrendCommands::Download {
            research_id,
            month,
            year,
            count,
        } => {
            let actor = ctx.require_actor()?;
            let event = ctx
                .service
                .record_downloads(actor, research_id, *month, *year, *count)
                .await?;
            output(&event, flags.format)
        }
        TrendCommands::List { research_id } => {
            let snapshot = ctx.service.list_trends(research_id).await?;
            output(&snapshot, flags.format)
        }
    }
}
