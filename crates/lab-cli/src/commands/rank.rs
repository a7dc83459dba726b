use lab_core::enums::RankingMetric;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::RankArgs;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::parse_status;
use crate::context::AppContext;
use crate::output::output;

/// Handle `labctl rank`. `--limit` overrides `metrics.top_n`.
pub async fn handle(args: &RankArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let n = usize::try_from(effective_limit(flags.limit, ctx.config.metrics.top_n))?;
    let status = args.status.as_deref().map(parse_status).transpose()?;
    let ranked = ctx
        .service
        .top_by_metric_with_status(RankingMetric::from(args.metric), n, status)
        .await?;
    output(&ranked, flags.format)
}
