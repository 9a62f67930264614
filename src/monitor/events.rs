//! Watch loop events
//!
//! Structured events emitted through the watch callback. Rendering them as
//! console text is the caller's concern; the loop only produces records.

use serde::{Deserialize, Serialize};

use crate::models::{DeviceNotification, HotspotStatus};

/// Events emitted by the discovery loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum WatchEvent {
    /// Watch session started
    WatchStarted { interval_seconds: u64 },

    /// Hotspot was already running; no start issued
    HotspotActive,

    /// Hotspot was not running (or its state was unknown); starting it
    HotspotStarting { status: HotspotStatus },

    /// Hotspot start failed; the next cycle retries from scratch
    HotspotStartFailed { message: String },

    /// A device appeared that was absent from the previous snapshot
    NewDeviceConnected { notification: DeviceNotification },

    /// A discovery cycle finished
    CycleCompleted {
        cycle: u32,
        devices_online: usize,
        new_devices: usize,
    },
}
