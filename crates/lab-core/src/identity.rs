use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::ActorRole;

/// The user on whose behalf an operation runs.
///
/// Authentication happens outside labdesk; callers resolve the session and
/// pass the result in explicitly. Nothing in the engine reads ambient session
/// state.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Actor {
    pub user_id: String,
    pub role: ActorRole,
}

impl Actor {
    #[must_use]
    pub fn admin(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            role: ActorRole::Admin,
        }
    }

    #[must_use]
    pub fn researcher(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            role: ActorRole::Researcher,
        }
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == ActorRole::Admin
    }
}
