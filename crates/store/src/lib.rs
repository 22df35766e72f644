//! Persisted client state.
//!
//! One pretty-printed JSON document per [`Namespace`] under a state
//! directory. The API never fails the caller: missing or corrupt documents
//! read as `None` (corruption is logged at warn), and write failures are
//! logged and dropped. Callers treat "no data" and "storage broken" the
//! same way.

mod paths;
mod store;

pub use paths::{resolve_state_dir, STATE_DIR_ENV, STATE_DIR_NAME};
pub use store::{LocalStore, Namespace};
