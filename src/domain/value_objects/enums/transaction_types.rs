use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    SubscriptionPayment,
    CreditGrant,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::SubscriptionPayment => "subscription_payment",
            TransactionType::CreditGrant => "credit_grant",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "subscription_payment" => Some(TransactionType::SubscriptionPayment),
            "credit_grant" => Some(TransactionType::CreditGrant),
            _ => None,
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
