//! Reply gate. Admits only replies that classify to a known option.

use tracing::warn;

use super::{ResponseOption, classify};
use crate::error::ValidationError;

/// Accept a reply if it classifies to a recognized option, returning that option.
pub fn validate(text: &str) -> Result<ResponseOption, ValidationError> {
    match classify(text) {
        option @ (ResponseOption::A
        | ResponseOption::B
        | ResponseOption::C
        | ResponseOption::D
        | ResponseOption::Confirm
        | ResponseOption::Decline
        | ResponseOption::Skip
        | ResponseOption::Stop) => Ok(option),
        ResponseOption::Unknown => {
            warn!(text, "Rejected unrecognized reply");
            Err(ValidationError::InvalidPayload {
                text: text.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_known_replies() {
        for text in ["a", "B", "c", "D", "confirm", "DECLINE", "Skip", "stop"] {
            assert!(validate(text).is_ok(), "input {text:?}");
        }
    }

    #[test]
    fn accepted_reply_carries_its_option() {
        assert_eq!(validate("Confirm").unwrap(), ResponseOption::Confirm);
        assert_eq!(validate("d").unwrap(), ResponseOption::D);
    }

    #[test]
    fn rejects_unknown_replies() {
        for text in ["", "ab", " A", "A ", "yes", "maybe"] {
            let err = validate(text).unwrap_err();
            let ValidationError::InvalidPayload { text: rejected } = err;
            assert_eq!(rejected, text);
        }
    }

    #[test]
    fn agrees_with_classifier() {
        for text in ["a", "stop", "nope", "", "CONFIRM", "d d"] {
            match validate(text) {
                Ok(option) => assert_eq!(option, classify(text), "input {text:?}"),
                Err(_) => assert_eq!(classify(text), ResponseOption::Unknown, "input {text:?}"),
            }
        }
    }
}
