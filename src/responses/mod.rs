//! Inbound reply handling: classify free-text answers and gate on the result.

pub mod classifier;
pub mod validator;

use serde::{Deserialize, Serialize};

pub use classifier::{ResponseClassifier, classify};
pub use validator::validate;

/// Recognized reply actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseOption {
    A,
    B,
    C,
    D,
    Confirm,
    Decline,
    Skip,
    Stop,
    /// Nothing matched. Never produced by a valid reply.
    #[default]
    Unknown,
}

impl std::fmt::Display for ResponseOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::A => write!(f, "A"),
            Self::B => write!(f, "B"),
            Self::C => write!(f, "C"),
            Self::D => write!(f, "D"),
            Self::Confirm => write!(f, "CONFIRM"),
            Self::Decline => write!(f, "DECLINE"),
            Self::Skip => write!(f, "SKIP"),
            Self::Stop => write!(f, "STOP"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}
