//! Notification repository.

use cinelog_common::AppResult;

use crate::records::NotificationRecord;
use crate::repositories::paginate;
use crate::storage::Collection;

/// Notification repository for store operations.
#[derive(Clone)]
pub struct NotificationRepository {
    notifications: Collection<NotificationRecord>,
}

impl NotificationRepository {
    /// Create a new notification repository.
    #[must_use]
    pub const fn new(notifications: Collection<NotificationRecord>) -> Self {
        Self { notifications }
    }

    /// Find a notification by ID.
    pub async fn find_by_id(&self, id: &str) -> Option<NotificationRecord> {
        self.notifications.get(id).await
    }

    /// Notifications for a user, newest first (paginated).
    pub async fn find_by_notifiee(
        &self,
        notifiee_id: &str,
        limit: usize,
        offset: usize,
        unread_only: bool,
    ) -> Vec<NotificationRecord> {
        let mut notifications = self
            .notifications
            .find(|n| n.notifiee_id == notifiee_id && (!unread_only || !n.is_read))
            .await;
        notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        paginate(notifications, limit, offset)
    }

    /// Create a notification.
    pub async fn create(&self, notification: NotificationRecord) -> AppResult<NotificationRecord> {
        self.notifications.insert(notification).await
    }

    /// Mark one of a user's notifications as read.
    pub async fn mark_as_read(&self, notifiee_id: &str, id: &str) -> AppResult<usize> {
        self.notifications
            .update_where(
                |n| n.id == id && n.notifiee_id == notifiee_id,
                |n| n.is_read = true,
            )
            .await
    }

    /// Mark all of a user's notifications as read. Returns the count.
    pub async fn mark_all_as_read(&self, notifiee_id: &str) -> AppResult<usize> {
        self.notifications
            .update_where(
                |n| n.notifiee_id == notifiee_id && !n.is_read,
                |n| n.is_read = true,
            )
            .await
    }

    /// Count a user's unread notifications.
    pub async fn count_unread(&self, notifiee_id: &str) -> usize {
        self.notifications
            .find(|n| n.notifiee_id == notifiee_id && !n.is_read)
            .await
            .len()
    }

    /// Remove every notification addressed to or triggered by `user_id`.
    pub async fn delete_all_for_user(&self, user_id: &str) -> AppResult<usize> {
        self.notifications
            .remove_where(|n| {
                n.notifiee_id == user_id || n.notifier_id.as_deref() == Some(user_id)
            })
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::records::NotificationKind;
    use chrono::Utc;

    fn notification(id: &str, notifiee: &str, read: bool) -> NotificationRecord {
        NotificationRecord {
            id: id.to_string(),
            notifiee_id: notifiee.to_string(),
            notifier_id: None,
            kind: NotificationKind::Follow,
            body: "x started following you".to_string(),
            is_read: read,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_unread_filter_and_counts() {
        let repo = NotificationRepository::new(Collection::in_memory());
        repo.create(notification("n1", "u1", false)).await.unwrap();
        repo.create(notification("n2", "u1", true)).await.unwrap();
        repo.create(notification("n3", "u2", false)).await.unwrap();

        assert_eq!(repo.find_by_notifiee("u1", 10, 0, false).await.len(), 2);
        assert_eq!(repo.find_by_notifiee("u1", 10, 0, true).await.len(), 1);
        assert_eq!(repo.count_unread("u1").await, 1);
    }

    #[tokio::test]
    async fn test_mark_as_read_checks_owner() {
        let repo = NotificationRepository::new(Collection::in_memory());
        repo.create(notification("n1", "u1", false)).await.unwrap();

        assert_eq!(repo.mark_as_read("u2", "n1").await.unwrap(), 0);
        assert_eq!(repo.mark_as_read("u1", "n1").await.unwrap(), 1);
        assert_eq!(repo.count_unread("u1").await, 0);
    }

    #[tokio::test]
    async fn test_mark_all_as_read() {
        let repo = NotificationRepository::new(Collection::in_memory());
        repo.create(notification("n1", "u1", false)).await.unwrap();
        repo.create(notification("n2", "u1", false)).await.unwrap();

        assert_eq!(repo.mark_all_as_read("u1").await.unwrap(), 2);
        assert_eq!(repo.count_unread("u1").await, 0);
    }
}
