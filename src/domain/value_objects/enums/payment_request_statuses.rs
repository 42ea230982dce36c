use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentRequestStatus {
    #[default]
    NotRequested,
    Pending,
    Approved,
    Rejected,
}

impl PaymentRequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentRequestStatus::NotRequested => "none",
            PaymentRequestStatus::Pending => "pending",
            PaymentRequestStatus::Approved => "approved",
            PaymentRequestStatus::Rejected => "rejected",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "none" => Some(PaymentRequestStatus::NotRequested),
            "pending" => Some(PaymentRequestStatus::Pending),
            "approved" => Some(PaymentRequestStatus::Approved),
            "rejected" => Some(PaymentRequestStatus::Rejected),
            _ => None,
        }
    }
}

impl Display for PaymentRequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
