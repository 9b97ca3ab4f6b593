//! Conversation stage machine — tracks which step the session is on.

use serde::{Deserialize, Serialize};

/// The stages of the guide conversation.
///
/// Progresses linearly: Greet → AwaitLocation → AwaitEmail → AwaitOtp →
/// ProvideInfo → Complete. Staying in place (a re-prompt) is not a
/// transition; the stage simply doesn't change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Greet,
    AwaitLocation,
    AwaitEmail,
    AwaitOtp,
    ProvideInfo,
    Complete,
}

impl Stage {
    /// Check if a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: Stage) -> bool {
        use Stage::*;
        matches!(
            (self, target),
            (Greet, AwaitLocation)
                | (AwaitLocation, AwaitEmail)
                | (AwaitEmail, AwaitOtp)
                | (AwaitOtp, ProvideInfo)
                | (ProvideInfo, Complete)
        )
    }

    /// Whether this stage is terminal (the guide has delivered its answer).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete)
    }

    /// Get the next stage in the linear progression, if any.
    pub fn next(&self) -> Option<Stage> {
        use Stage::*;
        match self {
            Greet => Some(AwaitLocation),
            AwaitLocation => Some(AwaitEmail),
            AwaitEmail => Some(AwaitOtp),
            AwaitOtp => Some(ProvideInfo),
            ProvideInfo => Some(Complete),
            Complete => None,
        }
    }
}

impl Default for Stage {
    fn default() -> Self {
        Self::Greet
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Greet => "greet",
            Self::AwaitLocation => "await_location",
            Self::AwaitEmail => "await_email",
            Self::AwaitOtp => "await_otp",
            Self::ProvideInfo => "provide_info",
            Self::Complete => "complete",
        };
        write!(f, "{s}")
    }
}
