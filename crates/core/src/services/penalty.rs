//! Penalty service.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use cinelog_common::{AppError, AppResult, IdGenerator};
use cinelog_store::records::PenaltyRecord;
use cinelog_store::repositories::{PenaltyRepository, UserRepository};

use crate::services::notification::NotificationService;

/// Minimum length for a penalty reason.
pub const MIN_PENALTY_REASON_LEN: usize = 10;

/// Read-time penalty status filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PenaltyStatus {
    Active,
    Inactive,
}

/// Input for issuing a penalty.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePenaltyInput {
    pub user_id: String,
    pub reason: String,
    pub severity: u8,
    /// Defaults to now.
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    /// `None` means permanent.
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
}

/// Input for updating a penalty (all fields optional).
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePenaltyInput {
    pub reason: Option<String>,
    pub severity: Option<u8>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

/// A user's penalties split by read-time status.
#[derive(Debug, Clone, Default)]
pub struct PenaltyHistory {
    pub active: Vec<PenaltyRecord>,
    pub historical: Vec<PenaltyRecord>,
}

/// Penalty service for business logic.
#[derive(Clone)]
pub struct PenaltyService {
    penalty_repo: PenaltyRepository,
    user_repo: UserRepository,
    notifications: NotificationService,
    id_gen: IdGenerator,
}

impl PenaltyService {
    /// Create a new penalty service.
    #[must_use]
    pub const fn new(
        penalty_repo: PenaltyRepository,
        user_repo: UserRepository,
        notifications: NotificationService,
    ) -> Self {
        Self {
            penalty_repo,
            user_repo,
            notifications,
            id_gen: IdGenerator::new(),
        }
    }

    /// Issue a penalty against a user.
    ///
    /// Issuing a penalty never suspends the target; suspension is a separate
    /// admin action.
    pub async fn create(
        &self,
        admin_id: &str,
        input: CreatePenaltyInput,
    ) -> AppResult<PenaltyRecord> {
        self.user_repo.get_by_id(&input.user_id).await?;
        validate_severity(input.severity)?;
        validate_reason(&input.reason)?;

        let start_date = input.start_date.unwrap_or_else(Utc::now);
        if let Some(end) = input.end_date
            && end <= start_date
        {
            return Err(AppError::Validation(
                "Penalty end date must be after its start date".to_string(),
            ));
        }

        let penalty = PenaltyRecord {
            id: self.id_gen.generate(),
            user_id: input.user_id,
            issued_by: admin_id.to_string(),
            reason: input.reason,
            severity: input.severity,
            start_date,
            end_date: input.end_date,
            created_at: Utc::now(),
        };

        let penalty = self.penalty_repo.create(penalty).await?;

        if let Err(e) = self
            .notifications
            .notify_penalty(&penalty.user_id, admin_id, &penalty.reason)
            .await
        {
            tracing::warn!(error = %e, "Failed to create penalty notification");
        }

        tracing::info!(
            penalty_id = %penalty.id,
            user_id = %penalty.user_id,
            severity = penalty.severity,
            "Penalty issued"
        );
        Ok(penalty)
    }

    /// Get a penalty by ID.
    pub async fn get(&self, id: &str) -> AppResult<PenaltyRecord> {
        self.penalty_repo.get_by_id(id).await
    }

    /// All penalties, optionally filtered by status and target user.
    pub async fn list(
        &self,
        status: Option<PenaltyStatus>,
        user_id: Option<&str>,
    ) -> AppResult<Vec<PenaltyRecord>> {
        let penalties = match user_id {
            Some(uid) => {
                self.user_repo.get_by_id(uid).await?;
                self.penalty_repo.find_by_user(uid).await
            }
            None => self.penalty_repo.list_all().await,
        };

        let now = Utc::now();
        Ok(match status {
            Some(PenaltyStatus::Active) => penalties
                .into_iter()
                .filter(|p| p.is_active_at(now))
                .collect(),
            Some(PenaltyStatus::Inactive) => penalties
                .into_iter()
                .filter(|p| !p.is_active_at(now))
                .collect(),
            None => penalties,
        })
    }

    /// A user's penalties split into active and historical at read time.
    pub async fn history_for_user(&self, user_id: &str) -> AppResult<PenaltyHistory> {
        self.user_repo.get_by_id(user_id).await?;

        let now = Utc::now();
        let mut history = PenaltyHistory::default();
        for penalty in self.penalty_repo.find_by_user(user_id).await {
            if penalty.is_active_at(now) {
                history.active.push(penalty);
            } else {
                history.historical.push(penalty);
            }
        }
        Ok(history)
    }

    /// Update a penalty.
    pub async fn update(&self, id: &str, input: UpdatePenaltyInput) -> AppResult<PenaltyRecord> {
        let mut penalty = self.penalty_repo.get_by_id(id).await?;

        if let Some(reason) = input.reason {
            validate_reason(&reason)?;
            penalty.reason = reason;
        }
        if let Some(severity) = input.severity {
            validate_severity(severity)?;
            penalty.severity = severity;
        }
        if let Some(start_date) = input.start_date {
            penalty.start_date = start_date;
        }
        if let Some(end_date) = input.end_date {
            penalty.end_date = Some(end_date);
        }
        if penalty.end_date.is_some_and(|end| end <= penalty.start_date) {
            return Err(AppError::Validation(
                "Penalty end date must be after its start date".to_string(),
            ));
        }

        let penalty = self.penalty_repo.update(penalty).await?;
        tracing::info!(penalty_id = %penalty.id, "Penalty updated");
        Ok(penalty)
    }

    /// Delete a penalty.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.penalty_repo.delete(id).await?;
        tracing::info!(penalty_id = %id, "Penalty deleted");
        Ok(())
    }
}

fn validate_severity(severity: u8) -> AppResult<()> {
    if !(1..=5).contains(&severity) {
        return Err(AppError::Validation(
            "Severity must be between 1 and 5".to_string(),
        ));
    }
    Ok(())
}

fn validate_reason(reason: &str) -> AppResult<()> {
    if reason.trim().len() < MIN_PENALTY_REASON_LEN {
        return Err(AppError::Validation(format!(
            "Penalty reason must be at least {MIN_PENALTY_REASON_LEN} characters"
        )));
    }
    Ok(())
}
