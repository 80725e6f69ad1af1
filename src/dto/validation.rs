//! Validation helpers for DTOs.

use validator::ValidationError;

/// Upper bound on submitted answer length, in characters.
pub const MAX_ANSWER_CHARS: usize = 512;

/// Validates that submitted answer text fits in a single input line.
///
/// Emptiness is *not* validated here: a blank submission is a legitimate
/// request that resolves to the `empty_input` outcome.
pub fn validate_answer_text(answer: &str) -> Result<(), ValidationError> {
    if answer.chars().count() > MAX_ANSWER_CHARS {
        let mut err = ValidationError::new("answer_length");
        err.message =
            Some(format!("Answer must be at most {MAX_ANSWER_CHARS} characters").into());
        return Err(err);
    }

    if answer.chars().any(|c| c == '\n' || c == '\r') {
        let mut err = ValidationError::new("answer_format");
        err.message = Some("Answer must be a single line".into());
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_answers() {
        assert!(validate_answer_text("lobster").is_ok());
        assert!(validate_answer_text("  spaced out  ").is_ok());
        assert!(validate_answer_text("").is_ok());
    }

    #[test]
    fn rejects_oversized_answers() {
        let huge = "a".repeat(MAX_ANSWER_CHARS + 1);
        assert!(validate_answer_text(&huge).is_err());
        let exact = "a".repeat(MAX_ANSWER_CHARS);
        assert!(validate_answer_text(&exact).is_ok());
    }

    #[test]
    fn rejects_multiline_answers() {
        assert!(validate_answer_text("line one\nline two").is_err());
        assert!(validate_answer_text("carriage\rreturn").is_err());
    }
}
