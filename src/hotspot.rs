//! Hosted-network lifecycle control
//!
//! Wraps the `netsh wlan` hosted-network commands behind a trait so the
//! discovery loop can be driven with fakes.

use crate::error::SentryError;
use crate::exec;
use crate::models::HotspotStatus;

/// Control surface over the OS access-point subsystem.
#[allow(async_fn_in_trait)]
pub trait AccessPointController {
    /// Queries the current hosted-network state. Never fails: a failed
    /// query is folded into [`HotspotStatus::Unknown`].
    async fn query_state(&self) -> HotspotStatus;

    /// Configures the hosted network (mode, SSID, key) and starts it.
    /// Both steps must succeed in sequence; the first failure aborts with
    /// that step's diagnostic text.
    async fn start(&self, ssid: &str, passphrase: &str) -> Result<(), SentryError>;

    /// Stops the hosted network.
    async fn stop(&self) -> Result<(), SentryError>;
}

/// Real controller driving `netsh wlan`.
#[derive(Debug, Default)]
pub struct NetshController;

impl NetshController {
    pub fn new() -> Self {
        Self
    }
}

impl AccessPointController for NetshController {
    async fn query_state(&self) -> HotspotStatus {
        match exec::capture_stdout("netsh", &["wlan", "show", "hostednetwork"]).await {
            Ok(output) => parse_hosted_network_status(&output),
            Err(e) => {
                tracing::warn!("hosted-network status query failed: {e}");
                HotspotStatus::Unknown
            }
        }
    }

    async fn start(&self, ssid: &str, passphrase: &str) -> Result<(), SentryError> {
        let ssid_arg = format!("ssid={ssid}");
        let key_arg = format!("key={passphrase}");
        exec::run_checked(
            "netsh",
            &["wlan", "set", "hostednetwork", "mode=allow", &ssid_arg, &key_arg],
        )
        .await?;
        exec::run_checked("netsh", &["wlan", "start", "hostednetwork"]).await?;
        tracing::info!(ssid, "hosted network started");
        Ok(())
    }

    async fn stop(&self) -> Result<(), SentryError> {
        exec::run_checked("netsh", &["wlan", "stop", "hostednetwork"]).await?;
        tracing::info!("hosted network stopped");
        Ok(())
    }
}

/// Scans a `netsh wlan show hostednetwork` listing for the status line.
///
/// Only an exact `Started` value counts as started; anything else in a
/// successful listing is treated as stopped.
pub fn parse_hosted_network_status(output: &str) -> HotspotStatus {
    for line in output.lines() {
        let Some(rest) = line.trim_start().strip_prefix("Status") else {
            continue;
        };
        let Some((_, value)) = rest.split_once(':') else {
            continue;
        };
        if value.trim() == "Started" {
            return HotspotStatus::Started;
        }
    }
    HotspotStatus::Stopped
}
