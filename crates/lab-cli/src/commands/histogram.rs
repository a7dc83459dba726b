use crate::cli::GlobalFlags;
use crate::cli::root_commands::YearArgs;
use crate::commands::shared::parse::year_or_current;
use crate::context::AppContext;
use crate::output::output;

/// Handle `labctl histogram`.
pub async fn handle(args: &YearArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let histogram = ctx
        .service
        .publication_histogram(year_or_current(args.year))
        .await?;
    output(&histogram, flags.format)
}
