//! Helpers for short code generation and URL validation.
//!
//! - [`code_generator`] - Base-62 codes, strategies and custom code rules
//! - [`url_validator`] - Absolute http/https URL checks

pub mod code_generator;
pub mod url_validator;
