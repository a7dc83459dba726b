use chrono::{Datelike, Utc};
use lab_core::enums::ResearchStatus;
use serde::de::DeserializeOwned;

/// Parse a `snake_case` enum value using serde-deserialization.
pub fn parse_enum<T>(raw: &str, field: &str) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let normalized = raw.replace('-', "_");
    let json = format!("\"{normalized}\"");
    serde_json::from_str(&json).map_err(|error| anyhow::anyhow!("invalid {field} '{raw}': {error}"))
}

/// Parse a research status in any case (`approved`, `APPROVED`).
pub fn parse_status(raw: &str) -> anyhow::Result<ResearchStatus> {
    parse_enum(&raw.to_ascii_uppercase(), "status")
        .map_err(|_| anyhow::anyhow!("invalid status '{raw}': expected development, pending, approved, or disapproved"))
}

/// The requested year, or the current UTC year.
#[must_use]
pub fn year_or_current(year: Option<i32>) -> i32 {
    year.unwrap_or_else(|| Utc::now().year())
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Utc};
    use lab_core::enums::{AuditAction, EntityType, ResearchStatus};

    use super::{parse_enum, parse_status, year_or_current};

    #[test]
    fn parses_snake_case_enum() {
        let action: AuditAction = parse_enum("status_changed", "action").expect("action should parse");
        assert_eq!(action, AuditAction::StatusChanged);
    }

    #[test]
    fn parses_hyphenated_alias() {
        let entity: EntityType =
            parse_enum("citation-trend", "entity-type").expect("entity type should parse");
        assert_eq!(entity, EntityType::CitationTrend);
    }

    #[test]
    fn errors_on_invalid_enum() {
        let err = parse_enum::<AuditAction>("deleted", "action").expect_err("should fail");
        assert!(err.to_string().contains("invalid action 'deleted'"));
    }

    #[test]
    fn status_is_case_insensitive() {
        assert_eq!(parse_status("approved").unwrap(), ResearchStatus::Approved);
        assert_eq!(parse_status("PENDING").unwrap(), ResearchStatus::Pending);
        assert!(parse_status("published").is_err());
    }

    #[test]
    fn year_defaults_to_now() {
        assert_eq!(year_or_current(Some(1999)), 1999);
        assert_eq!(year_or_current(None), Utc::now().year());
    }
}
