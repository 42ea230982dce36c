use anyhow::Result;
use axum::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::transactions::TransactionEntity;

#[automock]
#[async_trait]
pub trait TransactionRepository {
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<TransactionEntity>>;
    async fn list_by_mess(&self, mess_id: Uuid) -> Result<Vec<TransactionEntity>>;
}
