use once_cell::sync::Lazy;
use regex::Regex;

use super::models::BookingCandidate;
use crate::validation::ValidationError;

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

/// Trim and lowercase the email, then check it is `local@domain.tld` shaped.
pub fn normalize_booking(candidate: BookingCandidate) -> Result<BookingCandidate, ValidationError> {
    let email = candidate.email.trim().to_lowercase();
    if !EMAIL_PATTERN.is_match(&email) {
        return Err(ValidationError::InvalidEmail);
    }

    Ok(BookingCandidate { email, ..candidate })
}
