use chrono::{DateTime, Utc};
use rand::{Rng, distributions::Alphanumeric};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{
    entities::transactions::TransactionEntity,
    value_objects::enums::{
        transaction_statuses::TransactionStatus, transaction_types::TransactionType,
    },
};

const TRANSACTION_SUFFIX_LEN: usize = 8;

/// Public reference such as `TXN-20260301093000-7KQ2M9XA`.
pub fn generate_transaction_id(now: DateTime<Utc>) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TRANSACTION_SUFFIX_LEN)
        .map(|c| char::from(c).to_ascii_uppercase())
        .collect();

    format!("TXN-{}-{}", now.format("%Y%m%d%H%M%S"), suffix)
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TransactionDto {
    pub id: Uuid,
    pub transaction_id: String,
    pub user_id: Uuid,
    pub mess_id: Uuid,
    pub membership_id: Option<Uuid>,
    pub transaction_type: Option<TransactionType>,
    pub amount_minor: i32,
    pub status: Option<TransactionStatus>,
    pub gateway: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<TransactionEntity> for TransactionDto {
    fn from(value: TransactionEntity) -> Self {
        Self {
            id: value.id,
            transaction_id: value.transaction_id,
            user_id: value.user_id,
            mess_id: value.mess_id,
            membership_id: value.membership_id,
            transaction_type: TransactionType::from_str(&value.transaction_type),
            amount_minor: value.amount_minor,
            status: TransactionStatus::from_str(&value.status),
            gateway: value.gateway,
            description: value.description,
            created_at: value.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn transaction_id_embeds_timestamp_and_suffix() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap();

        let id = generate_transaction_id(now);
        let parts: Vec<&str> = id.split('-').collect();

        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "TXN");
        assert_eq!(parts[1], "20260301093000");
        assert_eq!(parts[2].len(), TRANSACTION_SUFFIX_LEN);
        assert!(
            parts[2]
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        );
    }
}
