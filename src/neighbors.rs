//! Neighbor table access and parsing
//!
//! Reads the OS neighbor (ARP) table and parses it into device snapshots.
//! The parse is deliberately best-effort: any line that does not look like
//! "network address followed by link address" is skipped.

use chrono::{DateTime, Utc};
use std::net::Ipv4Addr;
use tokio::process::Command;

use crate::error::SentryError;
use crate::exec;
use crate::models::{DeviceRecord, DeviceSnapshot};

/// Read access to the OS neighbor table.
#[allow(async_fn_in_trait)]
pub trait NeighborTableSource {
    /// Snapshots the neighbor table. A failed read degrades to an empty
    /// snapshot rather than an error: an empty table is a valid state and
    /// the discovery loop must survive a transient OS hiccup.
    async fn read_table(&self) -> DeviceSnapshot;

    /// Reverse scan: the network address currently associated with a link
    /// address, if any row carries it. Used as the last-resort identity
    /// hint when forward name resolution fails entirely.
    async fn find_network_address(&self, link_address: &str) -> Option<Ipv4Addr>;
}

/// Real source backed by `arp -a`.
#[derive(Debug, Default)]
pub struct ArpTableSource;

impl ArpTableSource {
    pub fn new() -> Self {
        Self
    }
}

impl NeighborTableSource for ArpTableSource {
    async fn read_table(&self) -> DeviceSnapshot {
        match exec::capture_stdout("arp", &["-a"]).await {
            Ok(output) => parse_neighbor_table(&output, Utc::now()),
            Err(e) => {
                tracing::warn!("neighbor table read failed, treating as empty: {e}");
                DeviceSnapshot::new()
            }
        }
    }

    async fn find_network_address(&self, link_address: &str) -> Option<Ipv4Addr> {
        let output = exec::capture_stdout("arp", &["-a"]).await.ok()?;
        find_address_in_table(&output, link_address)
    }
}

/// Parses raw neighbor-table output into a snapshot.
///
/// A line contributes a record when its first token parses as an IPv4
/// address and a second token is present; everything else (headers,
/// `Interface:` banners, malformed rows) is skipped. Duplicate link
/// addresses take the last row seen.
pub fn parse_neighbor_table(output: &str, now: DateTime<Utc>) -> DeviceSnapshot {
    let mut snapshot = DeviceSnapshot::new();
    for line in output.lines() {
        let mut tokens = line.split_whitespace();
        let (Some(first), Some(second)) = (tokens.next(), tokens.next()) else {
            continue;
        };
        let Ok(network_address) = first.parse::<Ipv4Addr>() else {
            continue;
        };
        snapshot.insert(DeviceRecord {
            link_address: second.to_string(),
            network_address,
            first_seen_at: now,
            last_observed_at: now,
        });
    }
    snapshot
}

/// Scans raw neighbor-table output for a row carrying `link_address`
/// (case-insensitive) and extracts that row's IPv4 token.
pub fn find_address_in_table(output: &str, link_address: &str) -> Option<Ipv4Addr> {
    let needle = link_address.to_ascii_lowercase();
    output
        .lines()
        .find(|line| line.to_ascii_lowercase().contains(&needle))
        .and_then(|line| {
            line.split_whitespace()
                .find_map(|token| token.parse::<Ipv4Addr>().ok())
        })
}

/// Pre-flight capability check: reading the neighbor table requires
/// elevated privileges on the platforms this targets.
///
/// A command that cannot be spawned at all is an environment problem, not a
/// privilege problem; the loop will surface it per cycle instead.
pub async fn preflight_neighbor_access() -> Result<(), SentryError> {
    match Command::new("arp").arg("-a").output().await {
        Ok(output) if output.status.success() => Ok(()),
        Ok(_) => Err(SentryError::PrivilegeDenied),
        Err(_) => Ok(()),
    }
}
