//! Notification service.

use chrono::Utc;

use cinelog_common::{AppResult, IdGenerator};
use cinelog_store::records::{NotificationKind, NotificationRecord};
use cinelog_store::repositories::NotificationRepository;

/// Notification service for business logic.
#[derive(Clone)]
pub struct NotificationService {
    notification_repo: NotificationRepository,
    id_gen: IdGenerator,
}

impl NotificationService {
    /// Create a new notification service.
    #[must_use]
    pub const fn new(notification_repo: NotificationRepository) -> Self {
        Self {
            notification_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Notify a user that someone started following them.
    pub async fn notify_follow(
        &self,
        notifiee_id: &str,
        notifier_id: &str,
        notifier_username: &str,
    ) -> AppResult<NotificationRecord> {
        self.create_internal(
            notifiee_id,
            Some(notifier_id),
            NotificationKind::Follow,
            format!("{notifier_username} started following you"),
        )
        .await
    }

    /// Notify a user that an admin issued a penalty against them.
    pub async fn notify_penalty(
        &self,
        notifiee_id: &str,
        admin_id: &str,
        reason: &str,
    ) -> AppResult<NotificationRecord> {
        self.create_internal(
            notifiee_id,
            Some(admin_id),
            NotificationKind::PenaltyIssued,
            format!("A penalty was issued against your account: {reason}"),
        )
        .await
    }

    /// Notify a user that a moderator removed one of their reviews.
    pub async fn notify_review_removed(
        &self,
        notifiee_id: &str,
        movie_title: &str,
    ) -> AppResult<NotificationRecord> {
        self.create_internal(
            notifiee_id,
            None,
            NotificationKind::ReviewRemoved,
            format!("Your review of '{movie_title}' was removed by a moderator"),
        )
        .await
    }

    async fn create_internal(
        &self,
        notifiee_id: &str,
        notifier_id: Option<&str>,
        kind: NotificationKind,
        body: String,
    ) -> AppResult<NotificationRecord> {
        let notification = NotificationRecord {
            id: self.id_gen.generate(),
            notifiee_id: notifiee_id.to_string(),
            notifier_id: notifier_id.map(std::string::ToString::to_string),
            kind,
            body,
            is_read: false,
            created_at: Utc::now(),
        };
        self.notification_repo.create(notification).await
    }

    /// Get notifications for a user, newest first (paginated).
    pub async fn list(
        &self,
        user_id: &str,
        limit: usize,
        offset: usize,
        unread_only: bool,
    ) -> Vec<NotificationRecord> {
        self.notification_repo
            .find_by_notifiee(user_id, limit, offset, unread_only)
            .await
    }

    /// Mark one of the user's notifications as read.
    ///
    /// Notifications belonging to someone else are left untouched.
    pub async fn mark_as_read(&self, user_id: &str, notification_id: &str) -> AppResult<()> {
        self.notification_repo
            .mark_as_read(user_id, notification_id)
            .await?;
        Ok(())
    }

    /// Mark all of the user's notifications as read. Returns the count.
    pub async fn mark_all_as_read(&self, user_id: &str) -> AppResult<usize> {
        self.notification_repo.mark_all_as_read(user_id).await
    }

    /// Count the user's unread notifications.
    pub async fn count_unread(&self, user_id: &str) -> usize {
        self.notification_repo.count_unread(user_id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use cinelog_store::Collection;

    fn service() -> NotificationService {
        NotificationService::new(NotificationRepository::new(Collection::in_memory()))
    }

    #[tokio::test]
    async fn test_follow_notification_body() {
        let notifications = service();
        let n = notifications
            .notify_follow("u1", "u2", "reviewer_bob")
            .await
            .unwrap();

        assert_eq!(n.kind, NotificationKind::Follow);
        assert_eq!(n.notifier_id.as_deref(), Some("u2"));
        assert!(n.body.contains("reviewer_bob"));
        assert!(!n.is_read);
    }

    #[tokio::test]
    async fn test_mark_read_ignores_foreign_notifications() {
        let notifications = service();
        let n = notifications
            .notify_penalty("u1", "admin", "spam reviews")
            .await
            .unwrap();

        notifications.mark_as_read("someone-else", &n.id).await.unwrap();
        assert_eq!(notifications.count_unread("u1").await, 1);

        notifications.mark_as_read("u1", &n.id).await.unwrap();
        assert_eq!(notifications.count_unread("u1").await, 0);
    }
}
