use anyhow::Result;
use axum::async_trait;
use mockall::automock;
use uuid::Uuid;

#[automock]
#[async_trait]
pub trait ChatGroupRepository {
    /// Adds the user to every default group of the mess. Existing rows are kept.
    async fn add_member_to_mess_groups(&self, mess_id: Uuid, user_id: Uuid) -> Result<usize>;
}
