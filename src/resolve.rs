//! Device identity resolution
//!
//! Resolves a network address to a best-effort display name through an
//! ordered fallback chain: reverse DNS, then a NetBIOS adapter-status
//! query, then the address itself. Every tier absorbs its predecessor's
//! failure; the chain as a whole always returns some string.

use dns_lookup::lookup_addr;
use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use crate::config::{DNS_TIMEOUT_MS, NETBIOS_WORKSTATION_MARKER, UNKNOWN_DEVICE_LABEL};
use crate::exec;

/// Forward name-resolution capabilities. Each method is one tier of the
/// fallback chain and reports a miss as `None`, never an error.
#[allow(async_fn_in_trait)]
pub trait NameResolver {
    async fn reverse_dns(&self, address: Ipv4Addr) -> Option<String>;
    async fn netbios_name(&self, address: Ipv4Addr) -> Option<String>;
}

/// Real resolver backed by the OS resolver and `nbtstat`.
#[derive(Debug, Default)]
pub struct SystemResolver;

impl SystemResolver {
    pub fn new() -> Self {
        Self
    }
}

impl NameResolver for SystemResolver {
    async fn reverse_dns(&self, address: Ipv4Addr) -> Option<String> {
        // The lookup is synchronous, so run it on a blocking thread with a
        // timeout.
        let lookup = tokio::time::timeout(
            Duration::from_millis(DNS_TIMEOUT_MS),
            tokio::task::spawn_blocking(move || lookup_addr(&IpAddr::V4(address)).ok()),
        )
        .await;

        match lookup {
            // A hostname equal to the address text is not a resolution.
            Ok(Ok(Some(hostname))) if hostname != address.to_string() => Some(hostname),
            _ => None,
        }
    }

    async fn netbios_name(&self, address: Ipv4Addr) -> Option<String> {
        let output = exec::capture_stdout("nbtstat", &["-A", &address.to_string()])
            .await
            .ok()?;
        parse_netbios_name(&output)
    }
}

/// Extracts the first name token whose line carries the workstation-service
/// marker from an adapter-status listing.
pub fn parse_netbios_name(output: &str) -> Option<String> {
    output.lines().find_map(|line| {
        let mut tokens = line.split_whitespace();
        let name = tokens.next()?;
        tokens
            .any(|token| token == NETBIOS_WORKSTATION_MARKER)
            .then(|| name.to_string())
    })
}

/// Resolves a display name for a device.
///
/// `None` is the "no address available" sentinel and short-circuits to the
/// unknown-device label with zero OS calls. Otherwise the tiers run in
/// order and the first hit wins; if every tier misses, the address itself
/// is returned as a name-shaped fallback (the caller may still apply a
/// reverse neighbor-table scan on top of that).
pub async fn resolve_display_name<R: NameResolver>(
    resolver: &R,
    address: Option<Ipv4Addr>,
) -> String {
    let Some(address) = address else {
        return UNKNOWN_DEVICE_LABEL.to_string();
    };
    if let Some(name) = resolver.reverse_dns(address).await {
        return name;
    }
    if let Some(name) = resolver.netbios_name(address).await {
        return name;
    }
    address.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Scripted resolver that counts how often each tier is consulted.
    #[derive(Default)]
    struct FakeResolver {
        dns: Option<String>,
        netbios: Option<String>,
        dns_calls: AtomicUsize,
        netbios_calls: AtomicUsize,
    }

    impl NameResolver for FakeResolver {
        async fn reverse_dns(&self, _address: Ipv4Addr) -> Option<String> {
            self.dns_calls.fetch_add(1, Ordering::SeqCst);
            self.dns.clone()
        }

        async fn netbios_name(&self, _address: Ipv4Addr) -> Option<String> {
            self.netbios_calls.fetch_add(1, Ordering::SeqCst);
            self.netbios.clone()
        }
    }

    const ADDRESS: Ipv4Addr = Ipv4Addr::new(192, 168, 137, 42);

    #[tokio::test]
    async fn dns_hit_short_circuits_the_chain() {
        let resolver = FakeResolver {
            dns: Some("laptop.lan".to_string()),
            netbios: Some("LAPTOP".to_string()),
            ..Default::default()
        };
        let name = resolve_display_name(&resolver, Some(ADDRESS)).await;
        assert_eq!(name, "laptop.lan");
        assert_eq!(resolver.netbios_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn netbios_covers_dns_miss() {
        let resolver = FakeResolver {
            netbios: Some("LAPTOP".to_string()),
            ..Default::default()
        };
        let name = resolve_display_name(&resolver, Some(ADDRESS)).await;
        assert_eq!(name, "LAPTOP");
        assert_eq!(resolver.dns_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn full_miss_returns_the_address_not_the_unknown_label() {
        let resolver = FakeResolver::default();
        let name = resolve_display_name(&resolver, Some(ADDRESS)).await;
        assert_eq!(name, ADDRESS.to_string());
    }

    #[tokio::test]
    async fn absent_address_resolves_to_unknown_without_any_lookup() {
        let resolver = FakeResolver {
            dns: Some("should-not-be-consulted".to_string()),
            ..Default::default()
        };
        let name = resolve_display_name(&resolver, None).await;
        assert_eq!(name, UNKNOWN_DEVICE_LABEL);
        assert_eq!(resolver.dns_calls.load(Ordering::SeqCst), 0);
        assert_eq!(resolver.netbios_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn netbios_parse_extracts_workstation_name() {
        let listing = "\
           NetBIOS Remote Machine Name Table

       Name               Type         Status
    ---------------------------------------------
    LAPTOP         <00>  UNIQUE      Registered
    WORKGROUP      <00>  GROUP       Registered
    LAPTOP         <20>  UNIQUE      Registered

    MAC Address = AA-BB-CC-DD-EE-01
";
        assert_eq!(parse_netbios_name(listing), Some("LAPTOP".to_string()));
    }

    #[test]
    fn netbios_parse_misses_when_no_marker() {
        let listing = "Host not found.\n";
        assert_eq!(parse_netbios_name(listing), None);
    }
}
