//! Common validation utilities.

use validator::ValidationError;

/// Maximum length of a club name in characters.
pub const MAX_CLUB_NAME_LEN: usize = 100;

/// Maximum length of free-text fields on membership records
/// (join message, processing reason).
pub const MAX_MESSAGE_LEN: usize = 500;

/// Validates a club name: must be non-empty after trimming and at
/// most [`MAX_CLUB_NAME_LEN`] characters.
pub fn validate_club_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        let mut err = ValidationError::new("club_name_empty");
        err.message = Some("Name must not be empty".into());
        return Err(err);
    }
    if trimmed.chars().count() > MAX_CLUB_NAME_LEN {
        let mut err = ValidationError::new("club_name_length");
        err.message = Some("Name must be at most 100 characters".into());
        return Err(err);
    }
    Ok(())
}

/// Validates an optional free-text message field (join message,
/// processing reason).
pub fn validate_message(message: &str) -> Result<(), ValidationError> {
    if message.chars().count() > MAX_MESSAGE_LEN {
        let mut err = ValidationError::new("message_length");
        err.message = Some("Message must be at most 500 characters".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_club_name() {
        assert!(validate_club_name("Velo Club").is_ok());
        assert!(validate_club_name("  Velo Club  ").is_ok());
        assert!(validate_club_name("V").is_ok());
        assert!(validate_club_name(&"x".repeat(100)).is_ok());
    }

    #[test]
    fn test_validate_club_name_empty() {
        assert!(validate_club_name("").is_err());
        assert!(validate_club_name("   ").is_err());
        assert!(validate_club_name("\t\n").is_err());
    }

    #[test]
    fn test_validate_club_name_too_long() {
        assert!(validate_club_name(&"x".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_club_name_counts_chars_not_bytes() {
        // 100 multi-byte characters are still 100 characters
        assert!(validate_club_name(&"ü".repeat(100)).is_ok());
        assert!(validate_club_name(&"ü".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_club_name_error_message() {
        let err = validate_club_name("  ").unwrap_err();
        assert_eq!(err.message.unwrap().to_string(), "Name must not be empty");
    }

    #[test]
    fn test_validate_message() {
        assert!(validate_message("").is_ok());
        assert!(validate_message("please let me in").is_ok());
        assert!(validate_message(&"m".repeat(500)).is_ok());
        assert!(validate_message(&"m".repeat(501)).is_err());
    }
}
