//! Remote analysis collaborator and the review service that falls back to local rules.

mod error;
mod service;

#[cfg(feature = "http")]
mod http;

pub use error::RemoteError;
pub use service::{RemoteBackend, ReviewService};

#[cfg(feature = "http")]
pub use http::{DEFAULT_TIMEOUT, RemoteClient};
