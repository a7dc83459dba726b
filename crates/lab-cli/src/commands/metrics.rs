use crate::cli::GlobalFlags;
use crate::cli::root_commands::MetricsArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `labctl metrics`.
pub async fn handle(args: &MetricsArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let summary = match args.full_mark {
        Some(full_mark) => ctx.service.compute_metrics_with(&args.id, full_mark).await?,
        None => ctx.service.compute_metrics(&args.id).await?,
    };
    output(&summary, flags.format)
}
