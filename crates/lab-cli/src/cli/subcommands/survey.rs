use clap::Subcommand;

/// Survey tree commands.
#[derive(Clone, Debug, Subcommand)]
pub enum SurveyCommands {
    /// Create a survey attached to a submission.
    Create {
        research_id: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        label: String,
    },
    /// Add a form to a survey.
    Form {
        survey_id: String,
        #[arg(long)]
        title: String,
    },
    /// Add a question to a form.
    Question {
        form_id: String,
        #[arg(long)]
        prompt: String,
    },
    /// Add a choice to a question.
    Choice {
        question_id: String,
        #[arg(long)]
        label: String,
    },
    /// Close an active survey.
    Close { survey_id: String },
    /// Print every survey of a submission with its forms, questions, and choices.
    Tree { research_id: String },
}
