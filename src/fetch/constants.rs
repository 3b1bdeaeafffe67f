//! Constants for the fetch module (timeouts, size limit).

/// Default HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default HTTP read timeout (5 minutes for slow image hosts).
pub const READ_TIMEOUT_SECS: u64 = 300;

/// Default in-memory limit for a fetched image body (3 MiB).
pub const DEFAULT_MAX_IMAGE_BYTES: u64 = 3 * 1024 * 1024;
