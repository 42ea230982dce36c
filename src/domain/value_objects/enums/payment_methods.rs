use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Upi,
    Cash,
    BankTransfer,
    Online,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Upi => "upi",
            PaymentMethod::Cash => "cash",
            PaymentMethod::BankTransfer => "bank_transfer",
            PaymentMethod::Online => "online",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "upi" => Some(PaymentMethod::Upi),
            "cash" => Some(PaymentMethod::Cash),
            "bank_transfer" => Some(PaymentMethod::BankTransfer),
            "online" => Some(PaymentMethod::Online),
            _ => None,
        }
    }
}

impl Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
