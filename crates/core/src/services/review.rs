//! Review service.

use chrono::Utc;
use serde::Deserialize;

use cinelog_common::{AppError, AppResult, IdGenerator};
use cinelog_store::records::{ReportRecord, ReviewRecord, UserRecord};
use cinelog_store::repositories::{
    MovieRepository, ReportRepository, ReviewRepository, UserRepository,
};

use crate::services::notification::NotificationService;

/// Upper bound on review text length.
pub const MAX_REVIEW_TEXT_LEN: usize = 5000;

/// Input for creating a review.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewInput {
    pub movie_id: String,
    pub rating: u8,
    #[serde(default)]
    pub text: String,
}

/// Input for updating a review (all fields optional).
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReviewInput {
    pub rating: Option<u8>,
    pub text: Option<String>,
}

/// Review service for business logic.
#[derive(Clone)]
pub struct ReviewService {
    review_repo: ReviewRepository,
    movie_repo: MovieRepository,
    user_repo: UserRepository,
    report_repo: ReportRepository,
    notifications: NotificationService,
    id_gen: IdGenerator,
}

impl ReviewService {
    /// Create a new review service.
    #[must_use]
    pub const fn new(
        review_repo: ReviewRepository,
        movie_repo: MovieRepository,
        user_repo: UserRepository,
        report_repo: ReportRepository,
        notifications: NotificationService,
    ) -> Self {
        Self {
            review_repo,
            movie_repo,
            user_repo,
            report_repo,
            notifications,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a review.
    pub async fn create(&self, author_id: &str, input: CreateReviewInput) -> AppResult<ReviewRecord> {
        let author = self.user_repo.get_by_id(author_id).await?;
        if author.is_suspended {
            return Err(AppError::Forbidden(
                "Suspended accounts cannot write reviews".to_string(),
            ));
        }

        self.movie_repo.get_by_id(&input.movie_id).await?;
        validate_rating(input.rating)?;
        validate_text(&input.text)?;

        // One review per (author, movie)
        if self
            .review_repo
            .find_by_author_and_movie(author_id, &input.movie_id)
            .await
            .is_some()
        {
            return Err(AppError::Conflict(
                "You have already reviewed this movie".to_string(),
            ));
        }

        let review = ReviewRecord {
            id: self.id_gen.generate(),
            movie_id: input.movie_id,
            author_id: author_id.to_string(),
            rating: input.rating,
            text: input.text,
            created_at: Utc::now(),
            updated_at: None,
        };

        let review = self.review_repo.create(review).await?;
        tracing::info!(review_id = %review.id, movie_id = %review.movie_id, "Review created");
        Ok(review)
    }

    /// Update a review. Only the author may edit it.
    pub async fn update(
        &self,
        review_id: &str,
        caller_id: &str,
        input: UpdateReviewInput,
    ) -> AppResult<ReviewRecord> {
        let mut review = self.review_repo.get_by_id(review_id).await?;
        if review.author_id != caller_id {
            return Err(AppError::Forbidden(
                "Only the author can edit a review".to_string(),
            ));
        }

        if let Some(rating) = input.rating {
            validate_rating(rating)?;
            review.rating = rating;
        }
        if let Some(text) = input.text {
            validate_text(&text)?;
            review.text = text;
        }

        review.updated_at = Some(Utc::now());
        let review = self.review_repo.update(review).await?;
        tracing::info!(review_id = %review.id, "Review updated");
        Ok(review)
    }

    /// Delete a review. Allowed for the author or an admin; cascades the
    /// review's reports. Admin removal of someone else's review notifies
    /// the author.
    pub async fn delete(&self, review_id: &str, caller: &UserRecord) -> AppResult<()> {
        let review = self.review_repo.get_by_id(review_id).await?;
        if review.author_id != caller.id && !caller.is_admin {
            return Err(AppError::Forbidden(
                "Only the author or an admin can delete a review".to_string(),
            ));
        }

        let reports = self.report_repo.delete_by_review(review_id).await?;
        self.review_repo.delete(review_id).await?;

        if caller.is_admin && review.author_id != caller.id {
            let title = self
                .movie_repo
                .find_by_id(&review.movie_id)
                .await
                .map_or_else(|| review.movie_id.clone(), |m| m.title);
            if let Err(e) = self
                .notifications
                .notify_review_removed(&review.author_id, &title)
                .await
            {
                tracing::warn!(error = %e, "Failed to create review-removed notification");
            }
        }

        tracing::info!(review_id = %review_id, reports, "Review deleted");
        Ok(())
    }

    /// Get a review by ID.
    pub async fn get(&self, review_id: &str) -> AppResult<ReviewRecord> {
        self.review_repo.get_by_id(review_id).await
    }

    /// Reviews for a movie, newest first (paginated).
    pub async fn list_by_movie(
        &self,
        movie_id: &str,
        limit: usize,
        offset: usize,
    ) -> AppResult<Vec<ReviewRecord>> {
        self.movie_repo.get_by_id(movie_id).await?;
        Ok(self.review_repo.find_by_movie(movie_id, limit, offset).await)
    }

    /// Reviews written by a user, newest first (paginated).
    pub async fn list_by_user(
        &self,
        user_id: &str,
        limit: usize,
        offset: usize,
    ) -> AppResult<Vec<ReviewRecord>> {
        self.user_repo.get_by_id(user_id).await?;
        Ok(self.review_repo.find_by_author(user_id, limit, offset).await)
    }

    // ========== Reports ==========

    /// Report a review. Duplicate reports from the same user are accepted.
    pub async fn report(
        &self,
        reporter_id: &str,
        review_id: &str,
        reason: &str,
    ) -> AppResult<ReportRecord> {
        self.review_repo.get_by_id(review_id).await?;

        let report = ReportRecord {
            id: self.id_gen.generate(),
            review_id: review_id.to_string(),
            reporter_id: reporter_id.to_string(),
            reason: reason.to_string(),
            admin_viewed: false,
            created_at: Utc::now(),
        };

        let report = self.report_repo.create(report).await?;
        tracing::info!(report_id = %report.id, review_id = %review_id, "Review reported");
        Ok(report)
    }

    /// Reports, newest first, optionally filtered by viewed status.
    pub async fn list_reports(
        &self,
        viewed: Option<bool>,
        limit: usize,
        offset: usize,
    ) -> Vec<ReportRecord> {
        self.report_repo.list(viewed, limit, offset).await
    }

    /// Mark a report as viewed.
    pub async fn mark_report_viewed(&self, report_id: &str) -> AppResult<ReportRecord> {
        let mut report = self.report_repo.get_by_id(report_id).await?;
        report.admin_viewed = true;
        self.report_repo.update(report).await
    }

    /// Dismiss (delete) a report without touching the review.
    pub async fn dismiss_report(&self, report_id: &str) -> AppResult<()> {
        self.report_repo.delete(report_id).await?;
        tracing::info!(report_id = %report_id, "Report dismissed");
        Ok(())
    }

    /// Total review count.
    pub async fn count(&self) -> usize {
        self.review_repo.count().await
    }
}

fn validate_rating(rating: u8) -> AppResult<()> {
    if !(1..=5).contains(&rating) {
        return Err(AppError::Validation(
            "Rating must be between 1 and 5".to_string(),
        ));
    }
    Ok(())
}

fn validate_text(text: &str) -> AppResult<()> {
    if text.len() > MAX_REVIEW_TEXT_LEN {
        return Err(AppError::Validation(format!(
            "Review text must be at most {MAX_REVIEW_TEXT_LEN} characters"
        )));
    }
    Ok(())
}
