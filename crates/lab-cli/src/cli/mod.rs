use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{GlobalFlags, OutputFormat, RoleArg};
pub use root_commands::Commands;

/// Top-level CLI parser for the `labctl` binary.
#[derive(Debug, Parser)]
#[command(name = "labctl", version, about = "labdesk - research portal metrics and approval")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Max results to return
    #[arg(short, long, global = true)]
    pub limit: Option<u32>,

    /// Acting user ID for mutations
    #[arg(short, long, global = true)]
    pub actor: Option<String>,

    /// Role of the acting user (defaults to researcher)
    #[arg(short, long, global = true)]
    pub role: Option<RoleArg>,

    /// Database path, overriding `database.path` from config
    #[arg(long, global = true)]
    pub db: Option<String>,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            limit: self.limit,
            actor: self.actor.clone(),
            role: self.role,
            db: self.db.clone(),
        }
    }
}
