use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: Commands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Research { action } => commands::research::handle(&action, ctx, flags).await,
        Commands::Decide(args) => commands::decide::handle(&args, ctx, flags).await,
        Commands::Trend { action } => commands::trend::handle(&action, ctx, flags).await,
        Commands::Metrics(args) => commands::metrics::handle(&args, ctx, flags).await,
        Commands::Rank(args) => commands::rank::handle(&args, ctx, flags).await,
        Commands::Histogram(args) => commands::histogram::handle(&args, ctx, flags).await,
        Commands::Dashboard(args) => commands::dashboard::handle(&args, ctx, flags).await,
        Commands::Survey { action } => commands::survey::handle(&action, ctx, flags).await,
        Commands::Review { action } => commands::review::handle(&action, ctx, flags).await,
        Commands::Collaborator { action } => {
            commands::collaborator::handle(&action, ctx, flags).await
        }
        Commands::Audit(args) => commands::audit::handle(&args, ctx, flags).await,
    }
}
