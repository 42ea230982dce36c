use anyhow::Result;
use axum::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::{
    entities::{credit_ledger::CreditLedgerEntity, mess_credits::MessCreditsEntity},
    value_objects::credits::GrantCreditsCommand,
};

#[automock]
#[async_trait]
pub trait MessCreditsRepository {
    async fn find_by_mess_id(&self, mess_id: Uuid) -> Result<Option<MessCreditsEntity>>;
    /// Balance increment, ledger row and `credit_grant` transaction in one unit.
    async fn grant(&self, command: GrantCreditsCommand) -> Result<MessCreditsEntity>;
    async fn list_ledger(&self, mess_id: Uuid) -> Result<Vec<CreditLedgerEntity>>;
}
