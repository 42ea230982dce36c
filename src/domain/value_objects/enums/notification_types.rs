use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    JoinRequest,
    PaymentRequest,
    LeaveRequest,
    JoinApproved,
    JoinRejected,
    PaymentApproved,
    PaymentRejected,
    LeaveApproved,
    LeaveRejected,
    BillingReminder,
    General,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::JoinRequest => "join_request",
            NotificationType::PaymentRequest => "payment_request",
            NotificationType::LeaveRequest => "leave_request",
            NotificationType::JoinApproved => "join_approved",
            NotificationType::JoinRejected => "join_rejected",
            NotificationType::PaymentApproved => "payment_approved",
            NotificationType::PaymentRejected => "payment_rejected",
            NotificationType::LeaveApproved => "leave_approved",
            NotificationType::LeaveRejected => "leave_rejected",
            NotificationType::BillingReminder => "billing_reminder",
            NotificationType::General => "general",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "join_request" => Some(NotificationType::JoinRequest),
            "payment_request" => Some(NotificationType::PaymentRequest),
            "leave_request" => Some(NotificationType::LeaveRequest),
            "join_approved" => Some(NotificationType::JoinApproved),
            "join_rejected" => Some(NotificationType::JoinRejected),
            "payment_approved" => Some(NotificationType::PaymentApproved),
            "payment_rejected" => Some(NotificationType::PaymentRejected),
            "leave_approved" => Some(NotificationType::LeaveApproved),
            "leave_rejected" => Some(NotificationType::LeaveRejected),
            "billing_reminder" => Some(NotificationType::BillingReminder),
            "general" => Some(NotificationType::General),
            _ => None,
        }
    }
}

impl Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
