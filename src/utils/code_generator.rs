//! Short code generation and validation utilities.
//!
//! Codes are drawn from a 62-character alphabet (upper/lowercase letters and
//! digits). Two strategies share one base-62 encoder:
//!
//! - [`CodeStrategy::Random`] maps a random 64-bit seed onto a fixed-length code.
//! - [`CodeStrategy::Sequential`] encodes a store-provided sequence number, so code
//!   length grows logarithmically with the number of links issued.
//!
//! Neither strategy checks uniqueness. That is the job of the store's atomic
//! insert, with collisions retried by the shortening service.

use std::fmt;
use std::str::FromStr;

use crate::error::AppError;
use serde_json::json;

/// Code alphabet. Index 0 (`A`) acts as the zero digit for padding.
pub const ALPHABET: &[u8; 62] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

const BASE: u64 = ALPHABET.len() as u64;

/// Bounds for random code length. `62^10` still fits in a `u64` seed.
pub const MIN_RANDOM_LENGTH: usize = 4;
pub const MAX_RANDOM_LENGTH: usize = 10;

/// Longest code accepted anywhere (custom codes, lookups).
pub const MAX_CODE_LENGTH: usize = 32;

const MIN_CUSTOM_LENGTH: usize = 4;

/// Codes that would shadow service routes.
const RESERVED_CODES: &[&str] = &["shorten", "health", "user", "links", "api"];

/// How candidate codes are derived from a seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeStrategy {
    /// Fixed-length code from a random seed.
    Random { length: usize },
    /// Variable-length code from a monotonically increasing sequence.
    Sequential,
}

impl CodeStrategy {
    /// Produces a code for `seed`. Never returns the empty string.
    ///
    /// For [`CodeStrategy::Random`] the seed is reduced into the code space of the
    /// configured length, so every output has exactly `length` characters.
    pub fn generate_code(&self, seed: u64) -> String {
        match *self {
            CodeStrategy::Random { length } => {
                let length = length.clamp(MIN_RANDOM_LENGTH, MAX_RANDOM_LENGTH);
                encode(seed % code_space(length), length)
            }
            CodeStrategy::Sequential => encode(seed, 1),
        }
    }

    /// Whether seeds come from the store's sequence rather than the RNG.
    pub fn uses_store_sequence(&self) -> bool {
        matches!(self, CodeStrategy::Sequential)
    }
}

impl fmt::Display for CodeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodeStrategy::Random { length } => write!(f, "random({length})"),
            CodeStrategy::Sequential => f.write_str("sequential"),
        }
    }
}

/// Parses the strategy name used in configuration (`random` or `sequential`).
///
/// `random` yields the default length; callers override it from config.
impl FromStr for CodeStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" => Ok(CodeStrategy::Random { length: 7 }),
            "sequential" => Ok(CodeStrategy::Sequential),
            other => Err(format!(
                "unknown code strategy '{other}', expected 'random' or 'sequential'"
            )),
        }
    }
}

/// Number of distinct codes of exactly `length` characters.
pub fn code_space(length: usize) -> u64 {
    BASE.checked_pow(length as u32).unwrap_or(u64::MAX)
}

/// Base-62 encodes `value`, left-padding with `A` up to `min_len` characters.
pub fn encode(mut value: u64, min_len: usize) -> String {
    let mut digits = Vec::with_capacity(min_len.max(11));

    loop {
        digits.push(ALPHABET[(value % BASE) as usize]);
        value /= BASE;
        if value == 0 {
            break;
        }
    }

    while digits.len() < min_len {
        digits.push(ALPHABET[0]);
    }

    digits.reverse();
    digits.into_iter().map(char::from).collect()
}

/// Decodes a base-62 code back to its numeric value.
///
/// Returns `None` for characters outside the alphabet, the empty string, or
/// values that overflow `u64`.
pub fn decode(code: &str) -> Option<u64> {
    if code.is_empty() {
        return None;
    }

    code.bytes().try_fold(0u64, |acc, byte| {
        let digit = ALPHABET.iter().position(|&c| c == byte)? as u64;
        acc.checked_mul(BASE)?.checked_add(digit)
    })
}

/// Returns true if `code` collides with a service route.
pub fn is_reserved(code: &str) -> bool {
    RESERVED_CODES.iter().any(|r| r.eq_ignore_ascii_case(code))
}

/// Cheap syntactic check used before hitting the store on lookups.
pub fn is_well_formed_code(code: &str) -> bool {
    !code.is_empty()
        && code.len() <= MAX_CODE_LENGTH
        && code
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-')
}

/// Validates a user-provided custom short code.
///
/// # Rules
///
/// - Length: 4-32 characters
/// - Allowed characters: letters, digits, hyphens
/// - Cannot start or end with a hyphen
/// - Cannot be a reserved route name
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
pub fn validate_custom_code(code: &str) -> Result<(), AppError> {
    if code.len() < MIN_CUSTOM_LENGTH || code.len() > MAX_CODE_LENGTH {
        return Err(AppError::bad_request(
            format!("Custom code must be {MIN_CUSTOM_LENGTH}-{MAX_CODE_LENGTH} characters"),
            json!({ "provided_length": code.len() }),
        ));
    }

    if !code.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-') {
        return Err(AppError::bad_request(
            "Custom code can only contain letters, digits, and hyphens",
            json!({ "code": code }),
        ));
    }

    if code.starts_with('-') || code.ends_with('-') {
        return Err(AppError::bad_request(
            "Custom code cannot start or end with a hyphen",
            json!({ "code": code }),
        ));
    }

    if is_reserved(code) {
        return Err(AppError::bad_request(
            "This code is reserved",
            json!({ "code": code }),
        ));
    }

    Ok(())
}
