//! Segment validators.
//!
//! Predicates check a whole staged value; the clamps normalize expiration
//! values in place before those checks run.

/// True iff every character is an ASCII decimal digit. Empty is true.
#[must_use]
pub fn is_digit_string(s: &str) -> bool {
    s.chars().all(|c| c.is_ascii_digit())
}

/// True iff every character is alphabetic. Empty is true.
#[must_use]
pub fn is_letter_string(s: &str) -> bool {
    s.chars().all(char::is_alphabetic)
}

/// Normalize a staged month value: 0 becomes "1", anything above 12 becomes "12".
///
/// Values that are empty or not all digits are left for the content check
/// to reject.
///
/// ```
/// use card_entry::validate::clamp_month;
///
/// let mut month = String::from("13");
/// clamp_month(&mut month);
/// assert_eq!(month, "12");
/// ```
pub fn clamp_month(value: &mut String) {
    let Some(month) = numeric_value(value) else {
        return;
    };

    if month == 0 {
        *value = "1".to_string();
    } else if month > 12 {
        *value = "12".to_string();
    }
}

/// Normalize a staged year value. Any two-digit year is accepted as is;
/// the plausibility window is enforced at submit time.
pub fn clamp_year(_value: &mut String) {}

fn numeric_value(value: &str) -> Option<u64> {
    if value.is_empty() || !is_digit_string(value) {
        return None;
    }
    Some(value.parse().unwrap_or(u64::MAX))
}
