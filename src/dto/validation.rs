//! Validation helpers for DTOs.

use validator::ValidationError;

/// Validates that a participant name is non-empty once trimmed.
pub fn validate_participant_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        let mut err = ValidationError::new("name_required");
        err.message = Some("name required".into());
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_and_padded_names() {
        assert!(validate_participant_name("Alice").is_ok());
        assert!(validate_participant_name("  Bob  ").is_ok());
    }

    #[test]
    fn rejects_empty_and_whitespace_names() {
        assert!(validate_participant_name("").is_err());
        assert!(validate_participant_name("   ").is_err());
        assert!(validate_participant_name("\t\n").is_err());
    }
}
