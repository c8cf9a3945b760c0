//! Phone number normalization.
//!
//! Every phone the engine stores or matches against goes through
//! [`normalize_phone`] so that `+254712345678`, `0712345678` and
//! `254712345678` all denote the same account. Transfer recipient matching
//! and reversal recipient matching both rely on this single definition.

/// Kenyan country code used when the input carries none.
const COUNTRY_CODE: &str = "254";

/// Normalizes a phone number to canonical `2547xxxxxxxx` form.
///
/// Rules:
/// - strip everything that is not an ASCII digit (tolerates a leading `+`,
///   spaces and dashes)
/// - drop a single leading `0` (local dialing form)
/// - prefix `254` when the number does not already start with it
#[must_use]
pub fn normalize_phone(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    let digits = digits.strip_prefix('0').unwrap_or(&digits);
    if digits.starts_with(COUNTRY_CODE) {
        digits.to_string()
    } else {
        format!("{COUNTRY_CODE}{digits}")
    }
}
