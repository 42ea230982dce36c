use anyhow::Result;
use axum::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::messes::{InsertMessEntity, MessEntity};

#[automock]
#[async_trait]
pub trait MessRepository {
    /// Creates the mess together with its credit account.
    async fn register(
        &self,
        mess: InsertMessEntity,
        initial_balance: i32,
        member_cost: i32,
    ) -> Result<MessEntity>;
    async fn find_by_id(&self, mess_id: Uuid) -> Result<Option<MessEntity>>;
    async fn list_active(&self) -> Result<Vec<MessEntity>>;
}
