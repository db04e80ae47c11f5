//! Core domain entities.
//!
//! Entities follow the "New Type" pattern with a separate struct for creation:
//! [`ShortLink`] is a persisted record, [`NewShortLink`] is what the shortening
//! service hands to the store.

pub mod link;

pub use link::{NewShortLink, ShortLink};
