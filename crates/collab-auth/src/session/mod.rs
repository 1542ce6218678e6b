//! Session lifecycle: minting, validation, and supersession.

pub mod authority;

pub use authority::{SessionAuthority, SessionHandle};
