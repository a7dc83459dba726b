use lab_core::enums::Decision;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::DecideArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `labctl decide`.
pub async fn handle(args: &DecideArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let actor = ctx.require_actor()?;
    let research = ctx
        .service
        .decide_with_reason(actor, &args.id, Decision::from(args.decision), args.reason.as_deref())
        .await?;
    output(&research, flags.format)
}
