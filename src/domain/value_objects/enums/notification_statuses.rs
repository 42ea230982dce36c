use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Completed,
}

impl NotificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationStatus::Pending => "pending",
            NotificationStatus::Approved => "approved",
            NotificationStatus::Rejected => "rejected",
            NotificationStatus::Completed => "completed",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(NotificationStatus::Pending),
            "approved" => Some(NotificationStatus::Approved),
            "rejected" => Some(NotificationStatus::Rejected),
            "completed" => Some(NotificationStatus::Completed),
            _ => None,
        }
    }
}

impl Display for NotificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
