/// One hour. Older watermarks trigger a remote fetch.
pub const DEFAULT_STALE_THRESHOLD_MS: i64 = 60 * 60 * 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Staleness {
    Fresh,
    Stale,
}

/// Decides whether the cache must be refreshed.
///
/// Without a watermark the cache is always stale. A watermark in the future
/// (clock moved backwards) counts as age 0.
pub fn decide(last_sync: Option<i64>, now: i64, threshold_ms: i64, force: bool) -> Staleness {
    if force {
        return Staleness::Stale;
    }
    match last_sync {
        None => Staleness::Stale,
        Some(last_sync) => {
            let age = now.saturating_sub(last_sync).max(0);
            if age >= threshold_ms {
                Staleness::Stale
            } else {
                Staleness::Fresh
            }
        }
    }
}
