use crate::cli::GlobalFlags;
use crate::cli::subcommands::SurveyCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `labctl survey`.
pub async fn handle(
    action: &SurveyCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        SurveyCommands::Create {
            research_id,
            title,
            description,
            label,
        } => {
            let actor = ctx.require_actor()?;
            let survey = ctx
                .service
                .create_survey(actor, research_id, title, description.as_deref(), label)
                .await?;
            output(&survey, flags.format)
        }
        SurveyCommands::Form { survey_id, title } => {
            let actor = ctx.require_actor()?;
            let form = ctx.service.add_form(actor, survey_id, title).await?;
            output(&form, flags.format)
        }
        SurveyCommands::Question { form_id, prompt } => {
            let actor = ctx.require_actor()?;
            let question = ctx.service.add_question(actor, form_id, prompt).await?;
            output(&question, flags.format)
        }
        SurveyCommands::Choice { question_id, label } => {
            let actor = ctx.require_actor()?;
            let choice = ctx.service.add_choice(actor, question_id, label).await?;
            output(&choice, flags.format)
        }
        SurveyCommands::Close { survey_id } => {
            let actor = ctx.require_actor()?;
            let survey = ctx.service.close_survey(actor, survey_id).await?;
            output(&survey, flags.format)
        }
        SurveyCommands::Tree { research_id } => {
            let surveys = ctx.service.load_survey_tree(research_id).await?;
            output(&surveys, flags.format)
        }
    }
}
