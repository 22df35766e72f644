//! Typed HTTP client for the analysis backend.
//!
//! Auth answers arrive wrapped in a `{status, message, data}` envelope;
//! helper tables and the analysis history are bare JSON arrays. Calls are
//! one-shot: no retries and no token refresh. A service that cannot be
//! reached surfaces as [`ApiError::Connect`] so front ends can say
//! "cannot connect" instead of leaking transport details.

mod client;
mod error;
mod types;

pub use client::{ApiClient, DEFAULT_API_URL};
pub use error::{ApiError, Result};
pub use types::{
    Credentials, HelperEntry, HelperTable, HistoryDetail, HistoryEntry, LoginData, RegisterRequest,
    UserProfile,
};
