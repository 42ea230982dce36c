use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::{
    credit_ledger::CreditLedgerEntity, mess_credits::MessCreditsEntity,
    transactions::InsertTransactionEntity,
};

pub const REASON_MEMBER_ADMISSION: &str = "member_admission";
pub const REASON_GRANT: &str = "grant";

/// A member can be admitted only while the balance covers the per-member cost.
pub fn has_sufficient_credits(balance: i32, cost: i32) -> bool {
    cost <= 0 || balance >= cost
}

/// Deduction applied inside an approval transaction. The update only lands
/// when the stored version still equals `expected_version`.
#[derive(Debug, Clone, PartialEq)]
pub struct CreditCharge {
    pub mess_id: Uuid,
    pub amount: i32,
    pub expected_version: i32,
    pub charged_by: Uuid,
}

impl CreditCharge {
    pub fn for_admission(credits: &MessCreditsEntity, charged_by: Uuid) -> Self {
        Self {
            mess_id: credits.mess_id,
            amount: credits.member_cost,
            expected_version: credits.version,
            charged_by,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GrantCreditsModel {
    pub amount: i32,
    pub reason: Option<String>,
    #[serde(default)]
    pub price_minor: i32,
}

#[derive(Debug, Clone)]
pub struct GrantCreditsCommand {
    pub mess_id: Uuid,
    pub amount: i32,
    pub reason: String,
    pub granted_by: Uuid,
    pub transaction: InsertTransactionEntity,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CreditBalanceDto {
    pub mess_id: Uuid,
    pub balance: i32,
    pub member_cost: i32,
    pub members_admittable: i32,
    pub updated_at: DateTime<Utc>,
}

impl From<MessCreditsEntity> for CreditBalanceDto {
    fn from(value: MessCreditsEntity) -> Self {
        let members_admittable = if value.member_cost > 0 {
            value.balance.max(0) / value.member_cost
        } else {
            i32::MAX
        };

        Self {
            mess_id: value.mess_id,
            balance: value.balance,
            member_cost: value.member_cost,
            members_admittable,
            updated_at: value.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CreditLedgerDto {
    pub id: Uuid,
    pub delta: i32,
    pub balance_after: i32,
    pub reason: String,
    pub reference_id: Option<Uuid>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<CreditLedgerEntity> for CreditLedgerDto {
    fn from(value: CreditLedgerEntity) -> Self {
        Self {
            id: value.id,
            delta: value.delta,
            balance_after: value.balance_after,
            reason: value.reason,
            reference_id: value.reference_id,
            created_by: value.created_by,
            created_at: value.created_at,
        }
    }
}
