//! # collab-entity
//!
//! Domain entity models for the CollabVoice auth service. Every struct in
//! this crate represents a database table row or a domain value object.
//! All entities derive `Debug`, `Clone`, `Serialize`, `Deserialize`, and
//! database entities additionally derive `sqlx::FromRow`.

pub mod user;

pub use user::{NewUser, OAuthLink, Provider, User};
