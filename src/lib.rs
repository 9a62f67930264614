//! Hotspot Sentry — hotspot device watcher
//!
//! Keeps a local wireless hotspot running and reports every device that
//! joins it:
//! - Hosted-network lifecycle control (query / start / stop)
//! - Periodic neighbor-table polling with link-address-keyed diffing
//! - Layered identity resolution (reverse DNS, NetBIOS, neighbor-table hint)
//! - Structured watch events and an audible alert per new arrival

pub mod alerts;
pub mod config;
pub mod error;
mod exec;
pub mod hotspot;
pub mod logging;
pub mod models;
pub mod monitor;
pub mod neighbors;
pub mod resolve;

pub use alerts::{AlertSink, TerminalBell};
pub use error::SentryError;
pub use hotspot::{parse_hosted_network_status, AccessPointController, NetshController};
pub use models::{
    canonical_link, format_connection_duration, DeviceNotification, DeviceRecord, DeviceSnapshot,
    HotspotStatus,
};
pub use monitor::{DeviceWatcher, WatchEvent, WatchSettings};
pub use neighbors::{
    find_address_in_table, parse_neighbor_table, preflight_neighbor_access, ArpTableSource,
    NeighborTableSource,
};
pub use resolve::{parse_netbios_name, resolve_display_name, NameResolver, SystemResolver};
