//! Configuration constants for the hotspot watcher

/// Default poll interval between discovery cycles in seconds
pub const DEFAULT_POLL_INTERVAL: u64 = 60;

/// Minimum poll interval in seconds
pub const MIN_POLL_INTERVAL: u64 = 5;

/// Maximum poll interval in seconds
pub const MAX_POLL_INTERVAL: u64 = 3600;

/// Timeout for a single reverse DNS lookup (synchronous, so we use spawn_blocking)
pub const DNS_TIMEOUT_MS: u64 = 2000;

/// Alert tone frequency requested from sinks that can synthesize one
pub const ALERT_TONE_HZ: u32 = 1000;

/// Alert tone duration requested from sinks that can synthesize one
pub const ALERT_TONE_MS: u64 = 200;

/// Display name used when no identity hint could be recovered at all
pub const UNKNOWN_DEVICE_LABEL: &str = "Unknown Device";

/// NetBIOS service marker for the workstation-service name record
pub const NETBIOS_WORKSTATION_MARKER: &str = "<00>";
