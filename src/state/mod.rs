//! Client state module
//!
//! This module holds the viewer session and the context object that carries
//! it, together with the configured backend, into every operation.

pub mod context;
pub mod session;

pub use context::ClientContext;
pub use session::Session;
