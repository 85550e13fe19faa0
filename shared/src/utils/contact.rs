//! Contact value utilities
//!
//! Validation, normalization, and masking for the two contact channels a
//! buyer can verify through: email addresses and US phone numbers.

use once_cell::sync::Lazy;
use regex::Regex;

// Pragmatic email check; the provider is the final authority.
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}$").unwrap()
});

/// Normalize an email address for storage (trim + lowercase)
pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

/// Check if an email address is valid
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email.trim())
}

/// Normalize a phone number by stripping formatting characters
pub fn normalize_phone(phone: &str) -> String {
    phone.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Check if a phone number is a valid 10-digit US number
pub fn is_valid_phone(phone: &str) -> bool {
    let normalized = normalize_phone(phone);
    normalized.len() == 10 && !normalized.starts_with('0') && !normalized.starts_with('1')
}

/// Mask an email address for logs (e.g. `jo****@example.com`)
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) if local.len() > 2 => {
            format!("{}****@{}", &local[..2], domain)
        }
        Some((_, domain)) => format!("****@{}", domain),
        None => "****".to_string(),
    }
}

/// Mask a phone number for logs (e.g. `509****1234`)
pub fn mask_phone(phone: &str) -> String {
    let normalized = normalize_phone(phone);
    if normalized.len() >= 7 {
        format!(
            "{}****{}",
            &normalized[..3],
            &normalized[normalized.len() - 4..]
        )
    } else {
        "****".to_string()
    }
}
