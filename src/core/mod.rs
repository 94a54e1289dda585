//! Core types shared by every stage of the fetch cycle.
//!
//! - [`error`] - typed errors, user-facing error contexts
//! - [`diagnostics`] - per-cycle collection of non-fatal problems

pub mod diagnostics;
pub mod error;

pub use diagnostics::Diagnostics;
pub use error::{ErrorContext, PublishStatusError, TransportError, user_friendly_error};
