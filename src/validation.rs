//! Field-level checks applied to request payloads before they reach the
//! stores or the shift engine.

use crate::error::AppError;

pub const MAX_TEXT_LEN: usize = 1000;
pub const PHONE_DIGITS: usize = 10;

/// Trims, drops angle brackets and caps the length of free text.
pub fn sanitize(input: &str) -> String {
    input
        .trim()
        .chars()
        .filter(|c| *c != '<' && *c != '>')
        .take(MAX_TEXT_LEN)
        .collect::<String>()
        .trim()
        .to_string()
}

/// Emails are identity keys, compared after trimming and lower-casing.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_ascii_lowercase()
}

pub fn required(field: &str, value: Option<&str>) -> Result<String, AppError> {
    let cleaned = value.map(sanitize).unwrap_or_default();
    if cleaned.is_empty() {
        return Err(AppError::InvalidInput(format!("{field} is required")));
    }
    Ok(cleaned)
}

pub fn optional(value: Option<&str>) -> Option<String> {
    value.map(sanitize).filter(|cleaned| !cleaned.is_empty())
}

/// Non-empty, normalized email without a format check.
pub fn required_email(field: &str, value: Option<&str>) -> Result<String, AppError> {
    let email = value.map(normalize_email).unwrap_or_default();
    if email.is_empty() {
        return Err(AppError::InvalidInput(format!("{field} is required")));
    }
    Ok(email)
}

pub fn email(field: &str, value: Option<&str>) -> Result<String, AppError> {
    let email = required_email(field, value)?;
    if !looks_like_email(&email) {
        return Err(AppError::InvalidInput(format!(
            "{field} must be a valid email address"
        )));
    }
    Ok(email)
}

fn looks_like_email(email: &str) -> bool {
    if email.chars().any(|c| c.is_whitespace() || c == '<' || c == '>') {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

/// Accepts common separators and returns the bare digits.
pub fn phone(field: &str, value: Option<&str>) -> Result<String, AppError> {
    let raw = required(field, value)?;
    let mut digits = String::with_capacity(PHONE_DIGITS);
    for c in raw.chars() {
        match c {
            '0'..='9' => digits.push(c),
            ' ' | '-' | '(' | ')' | '.' => {}
            _ => {
                return Err(AppError::InvalidInput(format!(
                    "{field} may only contain digits"
                )));
            }
        }
    }
    if digits.len() != PHONE_DIGITS {
        return Err(AppError::InvalidInput(format!(
            "{field} must have {PHONE_DIGITS} digits"
        )));
    }
    Ok(digits)
}

pub fn min_len(field: &str, value: Option<&str>, min: usize) -> Result<String, AppError> {
    let cleaned = required(field, value)?;
    if cleaned.chars().count() < min {
        return Err(AppError::InvalidInput(format!(
            "{field} must be at least {min} characters"
        )));
    }
    Ok(cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_markup_and_caps_length() {
        assert_eq!(sanitize("  <b>Pan</b>  "), "bPan/b");
        assert_eq!(sanitize(&"x".repeat(1500)).len(), MAX_TEXT_LEN);
    }

    #[test]
    fn required_rejects_blank() {
        assert!(matches!(
            required("orgName", Some("   ")),
            Err(AppError::InvalidInput(_))
        ));
        assert!(matches!(
            required("orgName", None),
            Err(AppError::InvalidInput(_))
        ));
        assert_eq!(required("orgName", Some(" Fresko ")).unwrap(), "Fresko");
    }

    #[test]
    fn email_is_normalized_and_checked() {
        assert_eq!(
            email("donorEmail", Some(" Ana@Fresko.com ")).unwrap(),
            "ana@fresko.com"
        );
        for bad in ["ana", "ana@", "@fresko.com", "ana@fresko", "a b@x.com", "a@b@c.com"] {
            assert!(email("donorEmail", Some(bad)).is_err(), "{bad} accepted");
        }
    }

    #[test]
    fn phone_keeps_ten_digits() {
        assert_eq!(
            phone("donorPhone", Some("(33) 1122-3344")).unwrap(),
            "3311223344"
        );
        assert!(phone("donorPhone", Some("12345")).is_err());
        assert!(phone("donorPhone", Some("33a1223344")).is_err());
    }

    #[test]
    fn min_len_counts_characters() {
        assert!(min_len("foodType", Some("Pa"), 3).is_err());
        assert_eq!(min_len("foodType", Some("Pan"), 3).unwrap(), "Pan");
    }
}
