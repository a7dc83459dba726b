//! Approval State Machine.
//!
//! `decide` is a compare-and-set on `status`: the UPDATE only matches while
//! the row still holds the status the transition was validated against, so
//! two racing decisions cannot both apply. The publication date is stamped on
//! the first approval and never cleared, including on a later disapproval.

use chrono::Utc;

use lab_core::audit_detail::StatusChangedDetail;
use lab_core::entities::ResearchSubmission;
use lab_core::enums::{AuditAction, Decision, EntityType};
use lab_core::errors::CoreError;
use lab_core::identity::Actor;

use crate::error::DatabaseError;
use crate::notify::decision_notification;
use crate::repos::research::{read_research, require_research};
use crate::service::LabService;

impl LabService {
    /// Apply an administrator's decision to a submission.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Forbidden` for a non-admin actor,
    /// `CoreError::NotFound` for an unknown ID, or
    /// `CoreError::InvalidTransition` when the decision equals the current
    /// status or the submission has not been submitted yet.
    pub async fn decide(
        &self,
        actor: &Actor,
        research_id: &str,
        decision: Decision,
    ) -> Result<ResearchSubmission, DatabaseError> {
        self.decide_with_reason(actor, research_id, decision, None).await
    }

    /// [`Self::decide`] with a reason recorded in the audit detail.
    ///
    /// # Errors
    ///
    /// Same as [`Self::decide`].
    pub async fn decide_with_reason(
        &self,
        actor: &Actor,
        research_id: &str,
        decision: Decision,
        reason: Option<&str>,
    ) -> Result<ResearchSubmission, DatabaseError> {
        if !actor.is_admin() {
            return Err(CoreError::Forbidden {
                actor: actor.user_id.clone(),
                reason: "only administrators can decide on research".into(),
            }
            .into());
        }

        let target = decision.status();
        let tx = self.db().begin().await?;
        let current = require_research(&tx, research_id).await?;
        if !current.status.can_transition_to(target) {
            return Err(CoreError::invalid_transition(
                EntityType::Research,
                research_id,
                current.status,
                target,
            )
            .into());
        }

        let now = Utc::now().to_rfc3339();
        let changed = tx
            .execute(
                "UPDATE research_submissions
                 SET status = ?1,
                     publication_date = CASE WHEN ?1 = 'APPROVED'
                         THEN COALESCE(publication_date, ?2)
                         ELSE publication_date END,
                     updated_at = ?2
                 WHERE id = ?3 AND status = ?4",
                libsql::params![target.as_str(), now.as_str(), research_id, current.status.as_str()],
            )
            .await?;
        if changed == 0 {
            // Lost the race: report against whatever is there now.
            return Err(match read_research(&tx, research_id).await? {
                None => CoreError::not_found(EntityType::Research, research_id),
                Some(now_current) => CoreError::invalid_transition(
                    EntityType::Research,
                    research_id,
                    now_current.status,
                    target,
                ),
            }
            .into());
        }

        let detail = serde_json::to_value(StatusChangedDetail {
            from: current.status.as_str().to_string(),
            to: target.as_str().to_string(),
            reason: reason.map(String::from),
        })
        .map_err(|e| DatabaseError::Other(e.into()))?;
        self.audit(
            &tx,
            &actor.user_id,
            EntityType::Research,
            research_id,
            AuditAction::StatusChanged,
            Some(detail),
        )
        .await?;
        let updated = require_research(&tx, research_id).await?;
        tx.commit().await?;

        tracing::info!(
            research_id,
            from = %current.status,
            to = %target,
            admin = %actor.user_id,
            "research decision applied"
        );

        if let Err(e) = self.notifier().notify(decision_notification(&updated, decision)) {
            tracing::warn!(research_id, error = %e, "failed to dispatch decision notification");
        }

        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use lab_core::enums::ResearchStatus;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::notify::ChannelNotifier;
    use crate::repos::audit::AuditFilter;
    use crate::test_support::helpers::{
        ADMIN, OWNER, admin, create_pending_research, create_test_research, owner, test_service,
    };

    #[tokio::test]
    async fn approve_stamps_publication_date() {
        let svc = test_service().await;
        let research = create_pending_research(&svc, "r1").await;
        assert_eq!(research.publication_date, None);

        let approved = svc.decide(&admin(), &research.id, Decision::Approved).await.unwrap();
        assert_eq!(approved.status, ResearchStatus::Approved);
        assert!(approved.publication_date.is_some());
    }

    #[tokio::test]
    async fn second_identical_decision_is_rejected_and_date_unchanged() {
        let svc = test_service().await;
        let research = create_pending_research(&svc, "r1").await;
        let approved = svc.decide(&admin(), &research.id, Decision::Approved).await.unwrap();

        let err = svc
            .decide(&admin(), &research.id, Decision::Approved)
            .await
            .unwrap_err();
        assert!(err.is_invalid_transition());

        let after = svc.get_research(&research.id).await.unwrap();
        assert_eq!(after.publication_date, approved.publication_date);
    }

    #[tokio::test]
    async fn disapprove_keeps_publication_date_and_reapprove_does_not_reset() {
        let svc = test_service().await;
        let research = create_pending_research(&svc, "r1").await;
        let approved = svc.decide(&admin(), &research.id, Decision::Approved).await.unwrap();
        let stamped = approved.publication_date;

        let disapproved = svc
            .decide(&admin(), &research.id, Decision::Disapproved)
            .await
            .unwrap();
        assert_eq!(disapproved.status, ResearchStatus::Disapproved);
        assert_eq!(disapproved.publication_date, stamped);

        let reapproved = svc.decide(&admin(), &research.id, Decision::Approved).await.unwrap();
        assert_eq!(reapproved.publication_date, stamped);
    }

    #[tokio::test]
    async fn disapproved_from_pending_has_no_date() {
        let svc = test_service().await;
        let research = create_pending_research(&svc, "r1").await;
        let disapproved = svc
            .decide(&admin(), &research.id, Decision::Disapproved)
            .await
            .unwrap();
        assert_eq!(disapproved.publication_date, None);
    }

    #[tokio::test]
    async fn draft_cannot_be_decided() {
        let svc = test_service().await;
        let research = create_test_research(&svc, "draft").await;
        let err = svc.decide(&admin(), &research.id, Decision::Approved).await.unwrap_err();
        assert!(err.is_invalid_transition());
    }

    #[tokio::test]
    async fn unknown_id_and_non_admin() {
        let svc = test_service().await;
        assert!(
            svc.decide(&admin(), "res-missing", Decision::Approved)
                .await
                .unwrap_err()
                .is_not_found()
        );

        let research = create_pending_research(&svc, "r1").await;
        assert!(
            svc.decide(&owner(), &research.id, Decision::Approved)
                .await
                .unwrap_err()
                .is_forbidden()
        );
    }

    #[tokio::test]
    async fn writes_audit_with_reason() {
        let svc = test_service().await;
        let research = create_pending_research(&svc, "r1").await;
        svc.decide_with_reason(&admin(), &research.id, Decision::Disapproved, Some("out of scope"))
            .await
            .unwrap();

        let entries = svc
            .query_audit(&AuditFilter {
                actor_id: Some(ADMIN.into()),
                ..AuditFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(entries.len(), 1);
        let detail: StatusChangedDetail =
            serde_json::from_value(entries[0].detail.clone().unwrap()).unwrap();
        assert_eq!(
            detail,
            StatusChangedDetail {
                from: "PENDING".into(),
                to: "DISAPPROVED".into(),
                reason: Some("out of scope".into()),
            }
        );
    }

    #[tokio::test]
    async fn owner_is_notified_after_commit() {
        let (notifier, mut rx) = ChannelNotifier::channel(8);
        let svc = test_service().await.with_notifier(Arc::new(notifier));
        let research = create_pending_research(&svc, "Notify me").await;

        svc.decide(&admin(), &research.id, Decision::Approved).await.unwrap();
        let note = rx.recv().await.unwrap();
        assert_eq!(note.recipient_id, OWNER);
        assert_eq!(note.title, "Research approved");
    }

    #[tokio::test]
    async fn notifier_failure_does_not_roll_back() {
        let (notifier, rx) = ChannelNotifier::channel(1);
        drop(rx);
        let svc = test_service().await.with_notifier(Arc::new(notifier));
        let research = create_pending_research(&svc, "Nobody listening").await;

        let approved = svc.decide(&admin(), &research.id, Decision::Approved).await.unwrap();
        assert_eq!(approved.status, ResearchStatus::Approved);
        assert_eq!(
            svc.get_research(&research.id).await.unwrap().status,
            ResearchStatus::Approved
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_identical_decisions_apply_once() {
        let svc = Arc::new(test_service().await);
        let research = create_pending_research(&svc, "Contested").await;

        let approve = {
            let svc = Arc::clone(&svc);
            let id = research.id.clone();
            tokio::spawn(async move { svc.decide(&admin(), &id, Decision::Approved).await })
        };
        let approve_again = {
            let svc = Arc::clone(&svc);
            let id = research.id.clone();
            tokio::spawn(async move { svc.decide(&admin(), &id, Decision::Approved).await })
        };

        let results = [approve.await.unwrap(), approve_again.await.unwrap()];
        let wins = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(wins, 1, "exactly one identical decision applies");
        assert!(
            results
                .iter()
                .filter_map(|r| r.as_ref().err())
                .all(DatabaseError::is_invalid_transition)
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_opposite_decisions_serialize() {
        let svc = Arc::new(test_service().await);
        let research = create_pending_research(&svc, "Split panel").await;

        let approve = {
            let svc = Arc::clone(&svc);
            let id = research.id.clone();
            tokio::spawn(async move { svc.decide(&admin(), &id, Decision::Approved).await })
        };
        let disapprove = {
            let svc = Arc::clone(&svc);
            let id = research.id.clone();
            tokio::spawn(async move { svc.decide(&admin(), &id, Decision::Disapproved).await })
        };
        let results = [approve.await.unwrap(), disapprove.await.unwrap()];

        // APPROVED and DISAPPROVED may each follow the other, so the call
        // that waits on the lock still applies.
        assert!(results.iter().all(Result::is_ok));

        let entries = svc
            .query_audit(&AuditFilter {
                entity_id: Some(research.id.clone()),
                action: Some(AuditAction::StatusChanged),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(entries.len(), 2, "one status entry per applied decision");

        let field = |entry: &lab_core::entities::AuditEntry, key: &str| {
            entry.detail.as_ref().unwrap()[key].as_str().unwrap().to_string()
        };
        let first = entries
            .iter()
            .find(|e| field(e, "from") == "PENDING")
            .expect("one decision applied from PENDING");
        let last = entries
            .iter()
            .find(|e| field(e, "from") != "PENDING")
            .expect("one decision applied on top of the other");
        assert_eq!(field(last, "from"), field(first, "to"));

        let stored = svc.get_research(&research.id).await.unwrap();
        assert_eq!(stored.status.as_str(), field(last, "to"));
        // Approval ran at some point, and a later disapproval keeps the date.
        assert!(stored.publication_date.is_some());
    }
}
