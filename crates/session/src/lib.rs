//! Analysis session state.
//!
//! Ties the persisted store to the scoring engine: the per-session usage
//! budget, the analysis record list with its subscription registry, the
//! debounced draft autosaver, and the resolution flow that decides which
//! verdict a result view renders.

mod autosave;
mod counter;
mod records;
mod resolve;

pub use autosave::{DraftAutosaver, AUTOSAVE_DEBOUNCE};
pub use counter::UsageCounter;
pub use records::{RecordManager, SubscriptionId};
pub use resolve::{Resolution, ResolutionOrigin, ResultResolver};
