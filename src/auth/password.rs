use validator::ValidationError;

pub const MIN_PASSWORD_LEN: usize = 6;
pub const MAX_PASSWORD_LEN: usize = 12;

/// Password policy: 6-12 characters with at least one digit, one lowercase
/// and one uppercase letter.
pub fn validate_password_policy(password: &str) -> Result<(), ValidationError> {
    let len = password.chars().count();
    if !(MIN_PASSWORD_LEN..=MAX_PASSWORD_LEN).contains(&len) {
        return Err(ValidationError::new("password_length").with_message(
            format!("Password must be {MIN_PASSWORD_LEN}-{MAX_PASSWORD_LEN} characters").into(),
        ));
    }

    let has_lowercase = password.chars().any(|c| c.is_ascii_lowercase());
    let has_uppercase = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if has_lowercase && has_uppercase && has_digit {
        Ok(())
    } else {
        Err(ValidationError::new("password_complexity").with_message(
            "Password must contain a digit, a lowercase and an uppercase letter".into(),
        ))
    }
}

/// Compare a submitted password with the stored one.
///
/// Passwords are kept as entered; there is no hashing step.
pub fn verify_password(candidate: &str, stored: &str) -> bool {
    candidate == stored
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_accepts_valid_password() {
        assert!(validate_password_policy("Secret1").is_ok());
        assert!(validate_password_policy("Abcdefghij12").is_ok());
    }

    #[test]
    fn test_policy_rejects_length() {
        let err = validate_password_policy("Ab1").unwrap_err();
        assert_eq!(err.code, "password_length");

        let err = validate_password_policy("Abcdefghijk12").unwrap_err();
        assert_eq!(err.code, "password_length");
    }

    #[test]
    fn test_policy_requires_each_class() {
        assert!(validate_password_policy("secret1").is_err());
        assert!(validate_password_policy("SECRET1").is_err());
        assert!(validate_password_policy("Secrets").is_err());
    }

    #[test]
    fn test_verify_password() {
        assert!(verify_password("Secret1", "Secret1"));
        assert!(!verify_password("secret1", "Secret1"));
    }
}
