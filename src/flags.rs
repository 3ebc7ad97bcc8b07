//! Flag interpretation
//!
//! Ini values are free text. These helpers decide whether a value switches a
//! boolean option on, and whether a numeric threshold is active.

/// Tokens accepted as "true" (compared case-insensitively)
pub const TRUTHY: &[&str] = &["true", "t", "yes", "y", "do", "ok", "1"];

/// Tokens that disable a threshold (compared case-insensitively)
pub const FALSY_THRESHOLD: &[&str] = &["false", "f", "0", ""];

/// Determine if a flag is set to true or not
pub fn is_true(flag: &str) -> bool {
    let flag = flag.trim().to_lowercase();
    TRUTHY.contains(&flag.as_str())
}

/// Return the threshold verbatim if it is active, `None` if it is disabled
pub fn threshold(value: &str) -> Option<&str> {
    let value = value.trim();
    if FALSY_THRESHOLD.contains(&value.to_lowercase().as_str()) {
        None
    } else {
        Some(value)
    }
}

/// Check whether an active threshold looks like a number
pub fn is_numeric(value: &str) -> bool {
    value.parse::<f64>().is_ok()
}
