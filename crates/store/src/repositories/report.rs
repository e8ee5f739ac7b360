//! Report repository.

use cinelog_common::{AppError, AppResult};

use crate::records::ReportRecord;
use crate::repositories::paginate;
use crate::storage::Collection;

/// Report repository for store operations.
#[derive(Clone)]
pub struct ReportRepository {
    reports: Collection<ReportRecord>,
}

impl ReportRepository {
    /// Create a new report repository.
    #[must_use]
    pub const fn new(reports: Collection<ReportRecord>) -> Self {
        Self { reports }
    }

    /// Find a report by ID.
    pub async fn find_by_id(&self, id: &str) -> Option<ReportRecord> {
        self.reports.get(id).await
    }

    /// Find a report by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<ReportRecord> {
        self.find_by_id(id)
            .await
            .ok_or_else(|| AppError::NotFound(format!("Report '{id}' not found")))
    }

    /// Reports, newest first, optionally filtered by viewed status.
    pub async fn list(
        &self,
        viewed: Option<bool>,
        limit: usize,
        offset: usize,
    ) -> Vec<ReportRecord> {
        let mut reports = self
            .reports
            .find(|r| viewed.is_none_or(|v| r.admin_viewed == v))
            .await;
        reports.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        paginate(reports, limit, offset)
    }

    /// Reports filed against one review, newest first.
    pub async fn find_by_review(&self, review_id: &str) -> Vec<ReportRecord> {
        let mut reports = self.reports.find(|r| r.review_id == review_id).await;
        reports.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        reports
    }

    /// Create a new report.
    pub async fn create(&self, report: ReportRecord) -> AppResult<ReportRecord> {
        self.reports.insert(report).await
    }

    /// Update a report.
    pub async fn update(&self, report: ReportRecord) -> AppResult<ReportRecord> {
        self.reports.replace(report).await
    }

    /// Delete a report.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        if self.reports.remove(id).await? {
            Ok(())
        } else {
            Err(AppError::NotFound(format!("Report '{id}' not found")))
        }
    }

    /// Delete every report against a review. Returns the removed count.
    pub async fn delete_by_review(&self, review_id: &str) -> AppResult<usize> {
        self.reports
            .remove_where(|r| r.review_id == review_id)
            .await
    }

    /// Delete every report filed by a user. Returns the removed count.
    pub async fn delete_by_reporter(&self, reporter_id: &str) -> AppResult<usize> {
        self.reports
            .remove_where(|r| r.reporter_id == reporter_id)
            .await
    }

    /// Count all reports.
    pub async fn count(&self) -> usize {
        self.reports.count().await
    }
}
