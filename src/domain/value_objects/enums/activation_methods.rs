use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActivationMethod {
    Subscriber,
    Owner,
}

impl ActivationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivationMethod::Subscriber => "subscriber",
            ActivationMethod::Owner => "owner",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "subscriber" => Some(ActivationMethod::Subscriber),
            "owner" => Some(ActivationMethod::Owner),
            _ => None,
        }
    }
}

impl Display for ActivationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
