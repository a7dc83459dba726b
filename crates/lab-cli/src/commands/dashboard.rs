use crate::cli::GlobalFlags;
use crate::cli::root_commands::YearArgs;
use crate::commands::shared::parse::year_or_current;
use crate::context::AppContext;
use crate::output::output;

/// Handle `labctl dashboard`.
pub async fn handle(args: &YearArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let overview = ctx
        .service
        .dashboard_overview(year_or_current(args.year))
        .await?;
    output(&overview, flags.format)
}
