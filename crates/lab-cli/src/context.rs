use lab_config::LabConfig;
use lab_core::enums::ActorRole;
use lab_core::identity::Actor;
use lab_db::service::LabService;

use crate::cli::GlobalFlags;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub service: LabService,
    pub config: LabConfig,
    pub actor: Option<Actor>,
}

impl AppContext {
    /// Open the database named by `config` and resolve the acting user.
    pub async fn init(config: LabConfig, flags: &GlobalFlags) -> anyhow::Result<Self> {
        let service = LabService::from_config(&config).await?;
        tracing::debug!(path = %config.database.path, "labdesk service ready");
        Ok(Self {
            service,
            config,
            actor: resolve_actor(flags),
        })
    }

    /// The acting user, required by every mutating command.
    pub fn require_actor(&self) -> anyhow::Result<&Actor> {
        self.actor
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("No acting user. Pass --actor <user-id> (and --role admin for decisions)."))
    }
}

fn resolve_actor(flags: &GlobalFlags) -> Option<Actor> {
    let user_id = flags.actor.as_deref()?.trim();
    if user_id.is_empty() {
        return None;
    }
    let role = flags.role.map_or(ActorRole::Researcher, ActorRole::from);
    Some(Actor {
        user_id: user_id.to_string(),
        role,
    })
}

#[cfg(test)]
mod tests {
    use lab_core::enums::ActorRole;

    use super::resolve_actor;
    use crate::cli::{GlobalFlags, OutputFormat, RoleArg};

    fn flags(actor: Option<&str>, role: Option<RoleArg>) -> GlobalFlags {
        GlobalFlags {
            format: OutputFormat::Json,
            limit: None,
            actor: actor.map(String::from),
            role,
            db: None,
        }
    }

    #[test]
    fn role_defaults_to_researcher() {
        let actor = resolve_actor(&flags(Some("usr-1"), None)).expect("actor");
        assert_eq!(actor.user_id, "usr-1");
        assert_eq!(actor.role, ActorRole::Researcher);
    }

    #[test]
    fn explicit_admin_role() {
        let actor = resolve_actor(&flags(Some("usr-9"), Some(RoleArg::Admin))).expect("actor");
        assert!(actor.is_admin());
    }

    #[test]
    fn blank_or_missing_actor_is_none() {
        assert!(resolve_actor(&flags(None, Some(RoleArg::Admin))).is_none());
        assert!(resolve_actor(&flags(Some("  "), None)).is_none());
    }
}
