//! Discovery loop
//!
//! The orchestrator: per cycle it ensures the hotspot is up, snapshots the
//! neighbor table, diffs against the previous snapshot by link address,
//! resolves and reports newly seen devices, then sleeps. The previous
//! snapshot is threaded through [`DeviceWatcher::run_cycle`] as an explicit
//! accumulator value, never ambient shared state.

mod events;

pub use events::WatchEvent;

use chrono::Utc;
use std::time::Duration;

use crate::alerts::AlertSink;
use crate::config::{
    ALERT_TONE_HZ, ALERT_TONE_MS, DEFAULT_POLL_INTERVAL, MAX_POLL_INTERVAL, MIN_POLL_INTERVAL,
    UNKNOWN_DEVICE_LABEL,
};
use crate::hotspot::AccessPointController;
use crate::models::{
    format_connection_duration, DeviceNotification, DeviceRecord, DeviceSnapshot, HotspotStatus,
};
use crate::neighbors::NeighborTableSource;
use crate::resolve::{resolve_display_name, NameResolver};

/// Watch loop settings.
#[derive(Debug, Clone)]
pub struct WatchSettings {
    pub ssid: String,
    pub passphrase: String,
    pub interval_secs: u64,
}

impl WatchSettings {
    pub fn new(ssid: impl Into<String>, passphrase: impl Into<String>) -> Self {
        Self {
            ssid: ssid.into(),
            passphrase: passphrase.into(),
            interval_secs: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Overrides the poll interval, clamped to the supported range.
    pub fn with_interval(mut self, interval_secs: u64) -> Self {
        self.interval_secs = interval_secs.clamp(MIN_POLL_INTERVAL, MAX_POLL_INTERVAL);
        self
    }
}

/// The discovery loop, generic over its four OS seams so it can be driven
/// entirely with fakes.
pub struct DeviceWatcher<C, N, R, A> {
    controller: C,
    table: N,
    resolver: R,
    alerts: A,
    settings: WatchSettings,
}

impl<C, N, R, A> DeviceWatcher<C, N, R, A>
where
    C: AccessPointController,
    N: NeighborTableSource,
    R: NameResolver,
    A: AlertSink,
{
    pub fn new(controller: C, table: N, resolver: R, alerts: A, settings: WatchSettings) -> Self {
        Self {
            controller,
            table,
            resolver,
            alerts,
            settings,
        }
    }

    /// Runs discovery cycles until externally cancelled.
    pub async fn run<F: Fn(WatchEvent)>(&self, callback: F) {
        callback(WatchEvent::WatchStarted {
            interval_seconds: self.settings.interval_secs,
        });

        let mut previous = DeviceSnapshot::new();
        let mut cycle: u32 = 0;
        loop {
            cycle = cycle.wrapping_add(1);
            previous = self.run_cycle(cycle, previous, &callback).await;
            tokio::time::sleep(Duration::from_secs(self.settings.interval_secs)).await;
        }
    }

    /// One discovery cycle: previous snapshot in, next snapshot out.
    pub async fn run_cycle<F: Fn(WatchEvent)>(
        &self,
        cycle: u32,
        previous: DeviceSnapshot,
        callback: &F,
    ) -> DeviceSnapshot {
        self.ensure_hotspot(callback).await;

        let mut current = self.table.read_table().await;
        current.carry_first_seen_from(&previous);

        let mut new_devices = 0usize;
        for record in current.iter().filter(|r| !previous.contains(&r.link_address)) {
            new_devices += 1;
            let notification = self.build_notification(record).await;
            tracing::info!(
                name = %notification.name,
                link_address = %notification.link_address,
                "new device connected"
            );
            callback(WatchEvent::NewDeviceConnected { notification });
            self.alerts.alert(ALERT_TONE_HZ, ALERT_TONE_MS);
        }

        callback(WatchEvent::CycleCompleted {
            cycle,
            devices_online: current.len(),
            new_devices,
        });
        tracing::debug!(cycle, devices = current.len(), new_devices, "cycle complete");

        current
    }

    async fn ensure_hotspot<F: Fn(WatchEvent)>(&self, callback: &F) {
        let status = self.controller.query_state().await;
        if status == HotspotStatus::Started {
            callback(WatchEvent::HotspotActive);
            return;
        }

        callback(WatchEvent::HotspotStarting { status });
        if let Err(e) = self
            .controller
            .start(&self.settings.ssid, &self.settings.passphrase)
            .await
        {
            tracing::warn!("hotspot start failed: {e}");
            callback(WatchEvent::HotspotStartFailed {
                message: e.to_string(),
            });
        }
    }

    async fn build_notification(&self, record: &DeviceRecord) -> DeviceNotification {
        let mut name =
            resolve_display_name(&self.resolver, Some(record.network_address)).await;

        // Forward resolution came back empty-handed when the "name" is just
        // the address echoed. Fall back to a reverse neighbor-table scan by
        // link address: not a name, but still more informative than nothing.
        if name == record.network_address.to_string() {
            name = match self.table.find_network_address(&record.link_address).await {
                Some(address) => address.to_string(),
                None => UNKNOWN_DEVICE_LABEL.to_string(),
            };
        }

        let duration_text = format_connection_duration(Utc::now() - record.first_seen_at);
        DeviceNotification {
            name,
            link_address: record.link_address.clone(),
            connected_at: record.last_observed_at,
            duration_text,
        }
    }
}
