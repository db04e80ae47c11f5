//! Domain layer containing business entities and repository contracts.
//!
//! The domain layer has no dependencies on infrastructure or presentation layers.
//! Repository traits define the contract the storage backends in
//! [`crate::infrastructure::persistence`] implement; business rules live in
//! [`crate::application::services`].
//!
//! - [`entities`] - Core data structures
//! - [`repositories`] - Data access trait definitions

pub mod entities;
pub mod repositories;
