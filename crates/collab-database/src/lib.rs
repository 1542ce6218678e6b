//! # collab-database
//!
//! PostgreSQL connection management, migrations, and the credential
//! store backing the CollabVoice auth service.
//!
//! The [`store::CredentialStore`] trait is the seam between the auth
//! logic and persistence: [`repositories::user::PgCredentialStore`] is
//! the production implementation, [`memory::MemoryCredentialStore`] the
//! single-node/test implementation.

pub mod memory;
pub mod postgres;
pub mod repositories;
pub mod store;

pub use memory::MemoryCredentialStore;
pub use repositories::user::PgCredentialStore;
pub use store::CredentialStore;
