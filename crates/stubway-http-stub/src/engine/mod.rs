//! The embedded HTTP stub engine.
//!
//! Deliberately small: an in-memory ordered mapping list, a matcher that
//! honors priority and recency, response rendering through the configured
//! extensions, and an admin surface for registration over localhost.

pub mod mapping;
pub mod matcher;
pub mod template;

mod admin;
mod handler;
mod server;

pub use mapping::{RequestPattern, ResponseDefinition, StubMapping};
pub use server::StubEngine;
