use anyhow::Result;
use axum::async_trait;
use chrono::{DateTime, Utc};
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::{
    membership_payments::MembershipPaymentEntity, memberships::MembershipEntity,
    notifications::InsertNotificationEntity,
};

#[automock]
#[async_trait]
pub trait MembershipRepository {
    async fn find_by_id(&self, membership_id: Uuid) -> Result<Option<MembershipEntity>>;
    async fn find_by_user_and_mess(
        &self,
        user_id: Uuid,
        mess_id: Uuid,
    ) -> Result<Option<MembershipEntity>>;
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<MembershipEntity>>;
    async fn list_by_mess(&self, mess_id: Uuid) -> Result<Vec<MembershipEntity>>;
    /// Soft cancel. `None` when the version moved.
    async fn cancel(
        &self,
        membership_id: Uuid,
        expected_version: i32,
    ) -> Result<Option<MembershipEntity>>;
    async fn list_payments(&self, membership_id: Uuid) -> Result<Vec<MembershipPaymentEntity>>;
    /// Active, paid memberships whose period ended before `now`.
    async fn list_lapsed_paid(&self, now: DateTime<Utc>) -> Result<Vec<MembershipEntity>>;
    /// Flags the membership overdue and stores the reminder. `false` when the
    /// version moved.
    async fn mark_overdue(
        &self,
        membership_id: Uuid,
        expected_version: i32,
        reminder: InsertNotificationEntity,
    ) -> Result<bool>;
}
