//! Ranking Service: top-N research items by related-record count.

use lab_core::entities::ResearchSubmission;
use lab_core::enums::{RankingMetric, ResearchStatus};
use lab_metrics::rank_by_count;

use crate::error::DatabaseError;
use crate::helpers::get_count;
use crate::repos::research::row_to_research;
use crate::service::LabService;

const fn count_subquery(metric: RankingMetric) -> &'static str {
    match metric {
        RankingMetric::Citations => "SELECT COUNT(*) FROM citation_trends c WHERE c.research_id = r.id",
        RankingMetric::Reviews => "SELECT COUNT(*) FROM reviews v WHERE v.research_id = r.id",
    }
}

/// Score every candidate and rank in `lab-metrics`, which owns the tie-break.
pub(crate) async fn read_ranked(
    conn: &libsql::Connection,
    metric: RankingMetric,
    n: usize,
    status: Option<ResearchStatus>,
) -> Result<Vec<ResearchSubmission>, DatabaseError> {
    let select = format!(
        "SELECT r.id, r.owner_id, r.title, r.abstract, r.status, r.publication_date,
                r.views, r.created_at, r.updated_at, ({}) AS score
         FROM research_submissions r",
        count_subquery(metric)
    );
    let mut rows = match status {
        Some(status) => {
            conn.query(&format!("{select} WHERE r.status = ?1"), [status.as_str()])
                .await?
        }
        None => conn.query(&select, ()).await?,
    };

    let mut scored = Vec::new();
    while let Some(row) = rows.next().await? {
        scored.push((row_to_research(&row)?, get_count(&row, 9)?));
    }
    Ok(rank_by_count(scored, n))
}

impl LabService {
    /// At most `n` research items, descending by the number of related
    /// records for `metric`. Ties go to the older item, then the smaller id.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails. An empty corpus is an
    /// empty list.
    pub async fn top_by_metric(
        &self,
        metric: RankingMetric,
        n: usize,
    ) -> Result<Vec<ResearchSubmission>, DatabaseError> {
        self.top_by_metric_with_status(metric, n, None).await
    }

    /// [`Self::top_by_metric`] restricted to one status.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn top_by_metric_with_status(
        &self,
        metric: RankingMetric,
        n: usize,
        status: Option<ResearchStatus>,
    ) -> Result<Vec<ResearchSubmission>, DatabaseError> {
        let tx = self.db().snapshot().await?;
        let ranked = read_ranked(&tx, metric, n, status).await?;
        tx.commit().await?;
        tracing::debug!(%metric, n, returned = ranked.len(), "ranked research");
        Ok(ranked)
    }
}
