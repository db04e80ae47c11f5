//! Link store implementations.
//!
//! Concrete implementations of [`crate::domain::repositories::LinkRepository`].
//!
//! - [`PgLinkRepository`] - PostgreSQL via SQLx, durable
//! - [`InMemoryLinkRepository`] - sharded in-process map for development and tests

pub mod memory_link_repository;
pub mod pg_link_repository;

pub use memory_link_repository::InMemoryLinkRepository;
pub use pg_link_repository::PgLinkRepository;
