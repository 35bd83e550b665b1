mod coordinator;
mod staleness;

pub use coordinator::{system_clock, Clock, SyncCoordinator, SyncOutcome};
pub use staleness::{decide, Staleness, DEFAULT_STALE_THRESHOLD_MS};
