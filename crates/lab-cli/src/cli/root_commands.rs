use clap::{Args, Subcommand, ValueEnum};
use lab_core::enums::{Decision, RankingMetric};

use crate::cli::subcommands::{
    CollaboratorCommands, ResearchCommands, ReviewCommands, SurveyCommands, TrendCommands,
};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Research submissions.
    Research {
        #[command(subcommand)]
        action: ResearchCommands,
    },
    /// Approve or disapprove a pending or decided submission (admin only).
    Decide(DecideArgs),
    /// Citation and download trend rows.
    Trend {
        #[command(subcommand)]
        action: TrendCommands,
    },
    /// Aggregate paper metrics for one submission.
    Metrics(MetricsArgs),
    /// Top submissions by a related-record count.
    Rank(RankArgs),
    /// Submissions created per month for one year.
    Histogram(YearArgs),
    /// Admin dashboard overview.
    Dashboard(YearArgs),
    /// Surveys, forms, questions, and choices.
    Survey {
        #[command(subcommand)]
        action: SurveyCommands,
    },
    /// Reviews on a submission.
    Review {
        #[command(subcommand)]
        action: ReviewCommands,
    },
    /// Collaborators on a submission.
    Collaborator {
        #[command(subcommand)]
        action: CollaboratorCommands,
    },
    /// Query the audit trail.
    Audit(AuditArgs),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum DecisionArg {
    Approved,
    Disapproved,
}

impl From<DecisionArg> for Decision {
    fn from(value: DecisionArg) -> Self {
        match value {
            DecisionArg::Approved => Self::Approved,
            DecisionArg::Disapproved => Self::Disapproved,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum MetricArg {
    Citations,
    Reviews,
}

impl From<MetricArg> for RankingMetric {
    fn from(value: MetricArg) -> Self {
        match value {
            MetricArg::Citations => Self::Citations,
            MetricArg::Reviews => Self::Reviews,
        }
    }
}

#[derive(Clone, Debug, Args)]
pub struct DecideArgs {
    pub id: String,
    pub decision: DecisionArg,
    /// Reason recorded in the audit trail.
    #[arg(long)]
    pub reason: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct MetricsArgs {
    pub id: String,
    /// Impact ceiling; defaults to `metrics.full_mark` from config.
    #[arg(long)]
    pub full_mark: Option<f64>,
}

#[derive(Clone, Debug, Args)]
pub struct RankArgs {
    pub metric: MetricArg,
    /// Only rank submissions in this status.
    #[arg(long)]
    pub status: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct YearArgs {
    /// Calendar year; defaults to the current UTC year.
    #[arg(long)]
    pub year: Option<i32>,
}

#[derive(Clone, Debug, Args)]
pub struct AuditArgs {
    #[arg(long)]
    pub entity_type: Option<String>,
    #[arg(long)]
    pub entity_id: Option<String>,
    #[arg(long)]
    pub action: Option<String>,
    /// Only entries written by this actor.
    #[arg(long)]
    pub by: Option<String>,
}
