//! Shared test utilities for lab-db unit tests.

#[cfg(test)]
pub(crate) mod helpers {
    use lab_core::entities::ResearchSubmission;
    use lab_core::enums::{Decision, ResearchStatus};
    use lab_core::identity::Actor;

    use crate::LabDb;
    use crate::service::LabService;

    pub const OWNER: &str = "usr-owner";
    pub const ADMIN: &str = "usr-admin";

    /// Create an in-memory `LabService` with the tracing notifier.
    pub async fn test_service() -> LabService {
        let db = LabDb::open_local(":memory:").await.unwrap();
        LabService::from_db(db)
    }

    pub fn owner() -> Actor {
        Actor::researcher(OWNER)
    }

    pub fn admin() -> Actor {
        Actor::admin(ADMIN)
    }

    /// Create a research item owned by [`OWNER`] in `DEVELOPMENT`.
    pub async fn create_test_research(svc: &LabService, title: &str) -> ResearchSubmission {
        svc.create_research(&owner(), title, None).await.unwrap()
    }

    /// Create a research item and move it to `PENDING`.
    pub async fn create_pending_research(svc: &LabService, title: &str) -> ResearchSubmission {
        let research = create_test_research(svc, title).await;
        svc.submit_research(&owner(), &research.id).await.unwrap()
    }

    /// Create a research item and approve it.
    pub async fn create_approved_research(svc: &LabService, title: &str) -> ResearchSubmission {
        let research = create_pending_research(svc, title).await;
        let approved = svc
            .decide(&admin(), &research.id, Decision::Approved)
            .await
            .unwrap();
        assert_eq!(approved.status, ResearchStatus::Approved);
        approved
    }

    /// Backdate a research item's `created_at`.
    pub async fn set_created_at(svc: &LabService, research_id: &str, created_at: &str) {
        svc.db()
            .conn()
            .execute(
                "UPDATE research_submissions SET created_at = ?1 WHERE id = ?2",
                [created_at, research_id],
            )
            .await
            .unwrap();
    }
}
