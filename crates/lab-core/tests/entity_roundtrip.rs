//! Serde roundtrip and JsonSchema validation tests for payload types.

use chrono::{TimeZone, Utc};
use schemars::schema_for;
use lab_core::audit_detail::{RecordedDetail, StatusChangedDetail};
use lab_core::entities::*;
use lab_core::enums::*;
use lab_core::identity::Actor;
use lab_core::responses::*;

/// Validate a JSON value against a schemars-generated schema.
fn validate_against_schema(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

macro_rules! roundtrip_and_validate {
    ($name:ident, $ty:ty, $instance:expr) => {
        #[test]
        fn $name() {
            let val: $ty = $instance;

            // Serde roundtrip
            let json_str = serde_json::to_string_pretty(&val).unwrap();
            let recovered: $ty = serde_json::from_str(&json_str).unwrap();
            assert_eq!(
                recovered,
                val,
                "serde roundtrip failed for {}",
                stringify!($ty)
            );

            // Schema validation
            let schema = serde_json::to_value(schema_for!($ty)).unwrap();
            let instance = serde_json::to_value(&val).unwrap();
            let errors = validate_against_schema(&schema, &instance);
            assert!(
                errors.is_empty(),
                "Schema validation failed for {}: {:?}",
                stringify!($ty),
                errors
            );
        }
    };
}

fn research() -> ResearchSubmission {
    ResearchSubmission {
        id: "res-a3f8b2c1".into(),
        owner_id: "usr-1".into(),
        title: "Microplastics in alpine lakes".into(),
        abstract_text: Some("Sampling across 14 lakes.".into()),
        status: ResearchStatus::Approved,
        publication_date: Some(Utc.with_ymd_and_hms(2024, 4, 2, 9, 0, 0).unwrap()),
        views: 321,
        created_at: Utc.with_ymd_and_hms(2024, 1, 15, 8, 30, 0).unwrap(),
        updated_at: Utc.with_ymd_and_hms(2024, 4, 2, 9, 0, 0).unwrap(),
    }
}

roundtrip_and_validate!(research_roundtrip, ResearchSubmission, research());

roundtrip_and_validate!(
    draft_research_roundtrip,
    ResearchSubmission,
    ResearchSubmission {
        abstract_text: None,
        status: ResearchStatus::Development,
        publication_date: None,
        views: 0,
        ..research()
    }
);

roundtrip_and_validate!(
    citation_event_roundtrip,
    CitationEvent,
    CitationEvent {
        id: "cit-0000beef".into(),
        research_id: "res-a3f8b2c1".into(),
        month: 12,
        year: 2023,
        citations: 4,
        created_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    survey_tree_roundtrip,
    Survey,
    Survey {
        id: "srv-00000001".into(),
        research_id: "res-a3f8b2c1".into(),
        creator_id: "usr-1".into(),
        title: "Reader feedback".into(),
        description: None,
        label: "feedback-2024".into(),
        status: SurveyStatus::Active,
        created_at: Utc::now(),
        forms: vec![SurveyForm {
            id: "frm-00000001".into(),
            survey_id: "srv-00000001".into(),
            title: "Page 1".into(),
            position: 0,
            created_at: Utc::now(),
            questions: vec![Question {
                id: "qst-00000001".into(),
                form_id: "frm-00000001".into(),
                prompt: "Was the method clear?".into(),
                position: 0,
                choices: vec![
                    Choice {
                        id: "chc-00000001".into(),
                        question_id: "qst-00000001".into(),
                        label: "Yes".into(),
                        position: 0,
                    },
                    Choice {
                        id: "chc-00000002".into(),
                        question_id: "qst-00000001".into(),
                        label: "No".into(),
                        position: 1,
                    },
                ],
            }],
        }],
    }
);

roundtrip_and_validate!(
    audit_entry_roundtrip,
    AuditEntry,
    AuditEntry {
        id: "aud-00000001".into(),
        actor_id: Some("usr-admin".into()),
        entity_type: EntityType::Research,
        entity_id: "res-a3f8b2c1".into(),
        action: AuditAction::StatusChanged,
        detail: Some(
            serde_json::to_value(StatusChangedDetail {
                from: "PENDING".into(),
                to: "APPROVED".into(),
                reason: None,
            })
            .unwrap()
        ),
        created_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    recorded_detail_roundtrip,
    RecordedDetail,
    RecordedDetail {
        month: 3,
        year: 2024,
        count: 17,
    }
);

roundtrip_and_validate!(
    notification_roundtrip,
    Notification,
    Notification {
        recipient_id: "usr-1".into(),
        title: "Research approved".into(),
        body: "Your research \"Microplastics in alpine lakes\" has been approved.".into(),
    }
);

roundtrip_and_validate!(actor_roundtrip, Actor, Actor::admin("usr-admin"));

roundtrip_and_validate!(
    metrics_summary_roundtrip,
    MetricsSummary,
    MetricsSummary {
        research_id: "res-a3f8b2c1".into(),
        citation_series: vec![CitationPoint {
            label: "January 2024".into(),
            citations: 15,
        }],
        download_series: Vec::new(),
        total_citations: 15,
        total_downloads: 0,
        total_responses: 6,
        views: 300,
        collaborators: 2,
        impact: vec![
            ImpactAxis {
                subject: ImpactSubject::Citations,
                value: 15.0,
                full_mark: 150.0,
                ratio: 0.1,
            },
            ImpactAxis {
                subject: ImpactSubject::Views,
                value: 300.0,
                full_mark: 150.0,
                ratio: 2.0,
            },
        ],
    }
);

roundtrip_and_validate!(
    dashboard_overview_roundtrip,
    DashboardOverview,
    DashboardOverview {
        published: 1,
        pending: Vec::new(),
        active_surveys: 0,
        recent: vec![research()],
        high_citations: vec![research()],
        paper_histogram: PublicationHistogram {
            year: 2024,
            months: vec![MonthlyCount {
                name: "Jan".into(),
                papers: 1,
            }],
        },
    }
);

#[test]
fn research_wire_names() {
    let json = serde_json::to_value(research()).unwrap();
    assert_eq!(json["status"], "APPROVED");
    assert_eq!(json["abstract"], "Sampling across 14 lakes.");
    assert!(json.get("abstract_text").is_none());
}

#[test]
fn schema_rejects_unknown_status() {
    let schema = serde_json::to_value(schema_for!(ResearchSubmission)).unwrap();
    let mut instance = serde_json::to_value(research()).unwrap();
    instance["status"] = serde_json::json!("ARCHIVED");
    assert!(!validate_against_schema(&schema, &instance).is_empty());
}
