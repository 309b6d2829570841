//! Compiled regex patterns for form validation.
//!
//! Compiled once on first use and reused by every validator.

use once_cell::sync::Lazy;
use regex::Regex;

/// Loose email shape check: something@something.something, no whitespace.
pub static RE_EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// `HH:MM` with an optional `:SS` suffix, as produced by time inputs.
pub static RE_TIME_OF_DAY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{1,2}:\d{2}(:\d{2})?$").unwrap());
