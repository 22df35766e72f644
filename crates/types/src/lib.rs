//! Domain model shared by the `viability-*` crates.
//!
//! Everything here is plain data: serde structs and enums mirroring the
//! persisted JSON documents and the analysis backend's wire vocabulary,
//! plus the field validators the form layer runs before submit.

mod analysis;
mod category;
mod company;
pub mod validate;

pub use analysis::{new_analysis_id, Analysis, AnalysisStatus};
pub use category::{Category, CategoryProfile, Tone};
pub use company::CompanyData;

/// Analyses allowed per session before further runs are refused.
pub const MAX_ATTEMPTS: u32 = 2;

/// Milliseconds since the unix epoch, or 0 when the clock is unavailable.
#[must_use]
pub fn unix_ms_now() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}
