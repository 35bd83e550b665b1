// =============================================================================
// Test User
// =============================================================================

pub const TEST_USER: &str = "vinyl-lover";
pub const TEST_TOKEN: &str = "test-token-abc123";

// =============================================================================
// Releases
// =============================================================================

pub const RELEASE_1_ID: i64 = 101;
pub const RELEASE_1_TITLE: &str = "Kind of Blue";
pub const RELEASE_1_ARTIST: &str = "Miles Davis";

pub const RELEASE_2_ID: i64 = 202;
pub const RELEASE_2_TITLE: &str = "A Love Supreme";
pub const RELEASE_2_ARTIST: &str = "John Coltrane";

pub const RELEASE_3_ID: i64 = 303;
pub const RELEASE_3_TITLE: &str = "Blue Train";
pub const RELEASE_3_ARTIST: &str = "John Coltrane";

// =============================================================================
// Timing
// =============================================================================

pub const ONE_HOUR_MS: i64 = 3_600_000;
pub const BASE_TIME_MS: i64 = 1_700_000_000_000;

/// Maximum time to wait for the fake server to accept connections
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 10;
