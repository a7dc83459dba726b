use lab_db::updates::research::{ResearchUpdate, ResearchUpdateBuilder};
use serde_json::json;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::ResearchCommands;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::parse_status;
use crate::context::AppContext;
use crate::output::output;

/// Handle `labctl research`.
pub async fn handle(
    action: &ResearchCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let limit = effective_limit(flags.limit, ctx.config.general.default_limit);
    match action {
        ResearchCommands::Create {
            title,
            abstract_text,
        } => {
            let actor = ctx.require_actor()?;
            let research = ctx
                .service
                .create_research(actor, title, abstract_text.as_deref())
                .await?;
            output(&research, flags.format)
        }
        ResearchCommands::Get { id } => {
            let research = ctx.service.get_research(id).await?;
            output(&research, flags.format)
        }
        ResearchCommands::List { status } => {
            let status = status.as_deref().map(parse_status).transpose()?;
            let items = ctx.service.list_research(status, limit).await?;
            output(&items, flags.format)
        }
        ResearchCommands::Search { query } => {
            let items = ctx.service.search_research(query, limit).await?;
            output(&items, flags.format)
        }
        ResearchCommands::Update {
            id,
            title,
            abstract_text,
            clear_abstract,
        } => {
            let actor = ctx.require_actor()?;
            let update = build_update(title.as_deref(), abstract_text.as_deref(), *clear_abstract);
            if update.is_empty() {
                anyhow::bail!("nothing to update: pass --title, --abstract, or --clear-abstract");
            }
            let research = ctx.service.update_research(actor, id, update).await?;
            output(&research, flags.format)
        }
        ResearchCommands::Submit { id } => {
            let actor = ctx.require_actor()?;
            let research = ctx.service.submit_research(actor, id).await?;
            output(&research, flags.format)
        }
        ResearchCommands::View { id } => {
            let views = ctx.service.record_view(id).await?;
            output(&json!({ "id": id, "views": views }), flags.format)
        }
    }
}

fn build_update(
    title: Option<&str>,
    abstract_text: Option<&str>,
    clear_abstract: bool,
) -> ResearchUpdate {
    let mut builder = ResearchUpdateBuilder::new();
    if let Some(title) = title {
        builder = builder.title(title);
    }
    if clear_abstract {
        builder = builder.abstract_text(None);
    } else if let Some(text) = abstract_text {
        builder = builder.abstract_text(Some(text.to_string()));
    }
    builder.build()
}
