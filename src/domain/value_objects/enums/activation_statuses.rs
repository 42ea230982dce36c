use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Lifecycle of a QR meal activation code: `generated -> activated | expired`.
#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActivationStatus {
    #[default]
    Generated,
    Activated,
    Expired,
}

impl ActivationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivationStatus::Generated => "generated",
            ActivationStatus::Activated => "activated",
            ActivationStatus::Expired => "expired",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "generated" => Some(ActivationStatus::Generated),
            "activated" => Some(ActivationStatus::Activated),
            "expired" => Some(ActivationStatus::Expired),
            _ => None,
        }
    }

    /// Both `activated` and `expired` are terminal.
    pub fn can_transition_to(&self, next: ActivationStatus) -> bool {
        matches!(
            (self, next),
            (ActivationStatus::Generated, ActivationStatus::Activated)
                | (ActivationStatus::Generated, ActivationStatus::Expired)
        )
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, ActivationStatus::Generated)
    }
}

impl Display for ActivationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_moves_forward_only() {
        assert!(ActivationStatus::Generated.can_transition_to(ActivationStatus::Activated));
        assert!(ActivationStatus::Generated.can_transition_to(ActivationStatus::Expired));
        assert!(!ActivationStatus::Generated.can_transition_to(ActivationStatus::Generated));
    }

    #[test]
    fn terminal_states_do_not_move() {
        for terminal in [ActivationStatus::Activated, ActivationStatus::Expired] {
            assert!(terminal.is_terminal());
            assert!(!terminal.can_transition_to(ActivationStatus::Activated));
            assert!(!terminal.can_transition_to(ActivationStatus::Expired));
            assert!(!terminal.can_transition_to(ActivationStatus::Generated));
        }
    }

    #[test]
    fn round_trips_through_storage_string() {
        assert_eq!(
            ActivationStatus::from_str(ActivationStatus::Expired.as_str()),
            Some(ActivationStatus::Expired)
        );
        assert_eq!(ActivationStatus::from_str("used"), None);
    }
}
