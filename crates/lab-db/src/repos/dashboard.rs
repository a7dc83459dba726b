//! Dashboard Composition Layer input.
//!
//! Assembles the admin overview from one snapshot so every figure on the
//! page describes the same moment.

use lab_core::enums::{RankingMetric, ResearchStatus};
use lab_core::responses::DashboardOverview;

use crate::error::DatabaseError;
use crate::repos::metrics::read_histogram;
use crate::repos::ranking::read_ranked;
use crate::repos::research::{read_count_by_status, read_research_list};
use crate::repos::survey::read_active_survey_count;
use crate::service::LabService;

impl LabService {
    /// Published count, pending queue, active surveys, newest submissions,
    /// most-cited submissions, and the publication histogram for `year`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if any of the reads fail.
    pub async fn dashboard_overview(&self, year: i32) -> Result<DashboardOverview, DatabaseError> {
        let config = self.metrics_config();
        let top_n = usize::try_from(config.top_n).unwrap_or(usize::MAX);

        let tx = self.db().snapshot().await?;
        let published = read_count_by_status(&tx, ResearchStatus::Approved).await?;
        let pending = read_research_list(&tx, Some(ResearchStatus::Pending), None).await?;
        let active_surveys = read_active_survey_count(&tx).await?;
        let recent = read_research_list(&tx, None, Some(config.recent_limit)).await?;
        let high_citations = read_ranked(&tx, RankingMetric::Citations, top_n, None).await?;
        let paper_histogram = read_histogram(&tx, year).await?;
        tx.commit().await?;

        tracing::debug!(
            published,
            pending = pending.len(),
            active_surveys,
            year,
            "composed dashboard overview"
        );
        Ok(DashboardOverview {
            published,
            pending,
            active_surveys,
            recent,
            high_citations,
            paper_histogram,
        })
    }
}

#[cfg(test)]
mod tests {
    use lab_config::MetricsConfig;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::test_support::helpers::{
        admin, create_approved_research, create_pending_research, create_test_research, owner,
        set_created_at, test_service,
    };

    #[tokio::test]
    async fn empty_database() {
        let svc = test_service().await;
        let overview = svc.dashboard_overview(2024).await.unwrap();
        assert_eq!(overview.published, 0);
        assert!(overview.pending.is_empty());
        assert!(overview.recent.is_empty());
        assert!(overview.high_citations.is_empty());
        assert_eq!(overview.paper_histogram.months.len(), 12);
    }

    #[tokio::test]
    async fn composes_every_section() {
        let svc = test_service().await.with_metrics(MetricsConfig {
            top_n: 2,
            recent_limit: 2,
            ..MetricsConfig::default()
        });
        let draft = create_test_research(&svc, "Draft").await;
        let pending = create_pending_research(&svc, "Pending").await;
        let published = create_approved_research(&svc, "Published").await;
        set_created_at(&svc, &draft.id, "2024-02-10T00:00:00+00:00").await;
        set_created_at(&svc, &pending.id, "2024-02-11T00:00:00+00:00").await;
        set_created_at(&svc, &published.id, "2024-07-01T00:00:00+00:00").await;
        svc.record_citations(&admin(), &draft.id, 1, 2024, 1).await.unwrap();
        svc.record_citations(&admin(), &draft.id, 2, 2024, 1).await.unwrap();
        svc.record_citations(&admin(), &published.id, 1, 2024, 1).await.unwrap();
        svc.create_survey(&owner(), &published.id, "S", None, "s")
            .await
            .unwrap();

        let overview = svc.dashboard_overview(2024).await.unwrap();
        assert_eq!(overview.published, 1);
        assert_eq!(overview.pending.len(), 1);
        assert_eq!(overview.pending[0].id, pending.id);
        assert_eq!(overview.active_surveys, 1);

        let recent: Vec<&str> = overview.recent.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(recent, vec![published.id.as_str(), pending.id.as_str()]);

        let cited: Vec<&str> = overview.high_citations.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(cited, vec![draft.id.as_str(), published.id.as_str()]);

        let papers: Vec<u64> = overview.paper_histogram.months.iter().map(|m| m.papers).collect();
        assert_eq!(papers, vec![0, 2, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0]);
    }
}
