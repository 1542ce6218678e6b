//! # collab-api
//!
//! The HTTP gateway for CollabVoice: axum handlers, DTOs, the
//! authenticated-user extractor, and error-to-status mapping. All
//! domain logic lives in `collab-auth`; this layer only translates
//! requests and responses.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
