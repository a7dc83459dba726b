//! Listing defaults shared by the presentation surfaces.

use serde::{Deserialize, Serialize};

const fn default_limit() -> u32 {
    20
}

const fn default_audit_limit() -> u32 {
    50
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Page size for research listings and full-text search.
    #[serde(default = "default_limit")]
    pub default_limit: u32,

    /// Page size for audit trail queries, newest first.
    #[serde(default = "default_audit_limit")]
    pub audit_limit: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            audit_limit: default_audit_limit(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_defaults() {
        let config = GeneralConfig::default();
        assert_eq!(config.default_limit, 20);
        assert_eq!(config.audit_limit, 50);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: GeneralConfig = serde_json::from_str(r#"{"audit_limit": 5}"#).unwrap();
        assert_eq!(config.default_limit, 20);
        assert_eq!(config.audit_limit, 5);
    }
}
