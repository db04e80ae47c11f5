//! Application layer services implementing business logic.
//!
//! Services consume the [`crate::domain::repositories::LinkRepository`] trait and
//! expose a small API to the HTTP handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Short link creation, listing and deletion
//! - [`services::redirect_service::RedirectResolver`] - Code to URL resolution

pub mod services;
