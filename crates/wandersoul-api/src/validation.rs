//! Input validation shared by the account and admin routes

use crate::error::ApiError;

/// Minimum length of first name and surname
pub const MIN_NAME_LENGTH: usize = 3;
/// Minimum allowed password length
pub const MIN_PASSWORD_LENGTH: usize = 6;
/// Maximum allowed password length (prevent DoS with very large passwords)
pub const MAX_PASSWORD_LENGTH: usize = 256;

/// Treat empty strings the same as absent values
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Trim and lowercase an email address
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validate first name and surname
///
/// All lengths are checked before any character class.
pub fn validate_names(names: &[&str]) -> Result<(), ApiError> {
    if names.iter().any(|n| n.chars().count() < MIN_NAME_LENGTH) {
        return Err(ApiError::BadRequest(format!(
            "First name and surname must be at least {} characters long each",
            MIN_NAME_LENGTH
        )));
    }
    if !names.iter().all(|n| n.chars().all(char::is_alphabetic)) {
        return Err(ApiError::BadRequest(
            "First name and surname must contain only letters".to_string(),
        ));
    }
    Ok(())
}

/// Validate password length and character mix
pub fn validate_password(password: &str) -> Result<(), ApiError> {
    let len = password.chars().count();
    if len < MIN_PASSWORD_LENGTH {
        return Err(ApiError::BadRequest(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }
    if len > MAX_PASSWORD_LENGTH {
        return Err(ApiError::BadRequest(format!(
            "Password exceeds maximum length of {} characters",
            MAX_PASSWORD_LENGTH
        )));
    }
    let all_letters = password.chars().all(char::is_alphabetic);
    let all_digits = password.chars().all(|c| c.is_ascii_digit());
    if all_letters || all_digits {
        return Err(ApiError::BadRequest(
            "Password must contain both letters and numbers".to_string(),
        ));
    }
    Ok(())
}

/// Minimal email shape check
pub fn validate_email(email: &str) -> Result<(), ApiError> {
    if !email.contains('@') || !email.contains('.') {
        return Err(ApiError::BadRequest("Invalid email".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names() {
        assert!(validate_names(&["Anna", "Smith"]).is_ok());
        assert!(validate_names(&["Željka", "Ćosić"]).is_ok());
        assert!(validate_names(&["Al", "Smith"]).is_err());
        assert!(validate_names(&["Anna", "Sm1th"]).is_err());
        assert!(validate_names(&["Anna Marie", "Smith"]).is_err());
    }

    #[test]
    fn test_length_is_reported_before_letters() {
        let err = validate_names(&["An1", "Sm"]).unwrap_err();
        assert!(err.to_string().contains("at least"));
    }

    #[test]
    fn test_password() {
        assert!(validate_password("abc123").is_ok());
        assert!(validate_password("pass!word").is_ok());
        assert!(validate_password("ab12").is_err());
        assert!(validate_password("abcdefgh").is_err());
        assert!(validate_password("12345678").is_err());
        assert!(validate_password(&"a1".repeat(200)).is_err());
    }

    #[test]
    fn test_email() {
        assert!(validate_email("me@example.com").is_ok());
        assert!(validate_email("me.example.com").is_err());
        assert!(validate_email("me@example").is_err());
        assert_eq!(normalize_email("  Me@Example.COM "), "me@example.com");
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(Some("x".to_string())).as_deref(), Some("x"));
        assert_eq!(non_empty(Some(String::new())), None);
        assert_eq!(non_empty(None), None);
    }
}
