//! Data models for the hotspot watcher

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

/// State of the hosted network as reported by the OS.
///
/// Produced fresh on every query; never cached across cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HotspotStatus {
    Started,
    Stopped,
    /// The status query itself failed (nonzero exit / unreachable subsystem).
    Unknown,
}

/// One device currently present in the neighbor table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceRecord {
    /// Stable hardware identifier; the unique key within a snapshot.
    pub link_address: String,
    /// Current network-layer address. May change across cycles; not part of
    /// the device's identity.
    pub network_address: Ipv4Addr,
    /// When this link address first appeared in any snapshot of this process.
    pub first_seen_at: DateTime<Utc>,
    /// Refreshed every cycle the device is still present.
    pub last_observed_at: DateTime<Utc>,
}

/// One cycle's view of the neighbor table.
///
/// Records are unique by link address (compared case-insensitively) and keep
/// their insertion order, so reporting order matches the raw table and does
/// not depend on hash-map iteration. A later row for a known link address
/// replaces the earlier record in place.
#[derive(Debug, Clone, Default)]
pub struct DeviceSnapshot {
    records: Vec<DeviceRecord>,
}

impl DeviceSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert keyed by canonical link address; last row wins, position is kept.
    pub fn insert(&mut self, record: DeviceRecord) {
        let key = canonical_link(&record.link_address);
        match self
            .records
            .iter_mut()
            .find(|r| canonical_link(&r.link_address) == key)
        {
            Some(existing) => *existing = record,
            None => self.records.push(record),
        }
    }

    pub fn contains(&self, link_address: &str) -> bool {
        self.get(link_address).is_some()
    }

    pub fn get(&self, link_address: &str) -> Option<&DeviceRecord> {
        let key = canonical_link(link_address);
        self.records
            .iter()
            .find(|r| canonical_link(&r.link_address) == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DeviceRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Carry `first_seen_at` forward for devices already known from the
    /// previous snapshot. Re-seeing a known link address is not a new
    /// arrival, and its connection age must not reset.
    pub fn carry_first_seen_from(&mut self, previous: &DeviceSnapshot) {
        for record in &mut self.records {
            if let Some(known) = previous.get(&record.link_address) {
                record.first_seen_at = known.first_seen_at;
            }
        }
    }
}

/// Canonical form of a link address for keying and comparison.
pub fn canonical_link(link_address: &str) -> String {
    link_address.to_ascii_lowercase()
}

/// Structured record handed to notification sinks for each new arrival.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceNotification {
    /// Best-effort display name from the resolution pipeline.
    pub name: String,
    pub link_address: String,
    /// When the device was observed connecting this cycle.
    pub connected_at: DateTime<Utc>,
    /// Connection age rendered for display.
    pub duration_text: String,
}

/// Renders a connection duration as days/hours/minutes/seconds.
///
/// Negative durations (clock skew) clamp to zero.
pub fn format_connection_duration(duration: Duration) -> String {
    let total = duration.num_seconds().max(0);
    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;
    let seconds = total % 60;
    format!("{days} days, {hours} hours, {minutes} minutes, {seconds} seconds")
}
