//! Hotspot Sentry — hotspot device watcher CLI
//!
//! Keeps a hosted network up, polls the neighbor table every cycle, and
//! reports each newly joined device with a resolved name and an audible
//! alert.

use anyhow::{Context, Result};

use hotspot_sentry::{
    preflight_neighbor_access, AccessPointController, ArpTableSource, DeviceWatcher,
    HotspotStatus, NetshController, SystemResolver, TerminalBell, WatchEvent, WatchSettings,
};

/// Pre-flight capability check failed; re-run elevated.
const EXIT_PRIVILEGE_DENIED: i32 = 2;
/// Operator cancellation.
const EXIT_INTERRUPTED: i32 = 130;

#[derive(Debug, PartialEq, Eq)]
enum CliCommand {
    Watch {
        ssid: String,
        key: String,
        interval: Option<u64>,
        json: bool,
    },
    Status,
    Up {
        ssid: String,
        key: String,
    },
    Down,
    Help,
    Version,
}

fn version_text() -> String {
    format!("hotspot-sentry {}", env!("CARGO_PKG_VERSION"))
}

fn usage_text() -> String {
    format!(
        "{version}
Hotspot Sentry — hotspot device watcher

Usage:
  hotspot-sentry [watch] --ssid <NAME> --key <PASSPHRASE> [--interval <SECS>] [--json]
  hotspot-sentry status
  hotspot-sentry up --ssid <NAME> --key <PASSPHRASE>
  hotspot-sentry down
  hotspot-sentry --help
  hotspot-sentry --version

Options:
      --ssid <NAME>       Network name the hosted network broadcasts
      --key <PASSPHRASE>  Pre-shared key for the hosted network
      --interval <SECS>   Seconds between discovery cycles (default: {default_interval})
      --json              Emit watch events as JSON lines instead of text
  -h, --help              Show this help text
  -V, --version           Show version",
        version = version_text(),
        default_interval = hotspot_sentry::config::DEFAULT_POLL_INTERVAL
    )
}

fn parse_u64_arg(flag: &str, raw: &str) -> Result<u64> {
    raw.parse::<u64>().ok().filter(|v| *v > 0).ok_or_else(|| {
        anyhow::anyhow!(
            "Invalid value for {}: '{}'. Expected a positive integer.\n\n{}",
            flag,
            raw,
            usage_text()
        )
    })
}

fn parse_cli_args<I, S>(args: I) -> Result<CliCommand>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut iter = args.into_iter();
    let _program_name = iter.next();

    let mut command: Option<String> = None;
    let mut ssid: Option<String> = None;
    let mut key: Option<String> = None;
    let mut interval: Option<u64> = None;
    let mut json = false;

    while let Some(arg) = iter.next() {
        let arg = arg.as_ref();
        match arg {
            "-h" | "--help" => return Ok(CliCommand::Help),
            "-V" | "--version" => return Ok(CliCommand::Version),
            "watch" | "status" | "up" | "down" => {
                if command.as_deref().is_some_and(|existing| existing != arg) {
                    return Err(anyhow::anyhow!(
                        "Multiple commands provided. Use only one command.\n\n{}",
                        usage_text()
                    ));
                }
                command = Some(arg.to_string());
            }
            "--ssid" => {
                let value = iter.next().ok_or_else(|| {
                    anyhow::anyhow!("Missing value for --ssid.\n\n{}", usage_text())
                })?;
                ssid = Some(value.as_ref().to_string());
            }
            "--key" => {
                let value = iter.next().ok_or_else(|| {
                    anyhow::anyhow!("Missing value for --key.\n\n{}", usage_text())
                })?;
                key = Some(value.as_ref().to_string());
            }
            "--interval" => {
                let value = iter.next().ok_or_else(|| {
                    anyhow::anyhow!("Missing value for --interval.\n\n{}", usage_text())
                })?;
                interval = Some(parse_u64_arg("--interval", value.as_ref())?);
            }
            "--json" => json = true,
            _ if arg.starts_with("--ssid=") => {
                let value = arg.split_once('=').map(|(_, v)| v).unwrap_or_default();
                if value.is_empty() {
                    return Err(anyhow::anyhow!(
                        "Missing value for --ssid.\n\n{}",
                        usage_text()
                    ));
                }
                ssid = Some(value.to_string());
            }
            _ if arg.starts_with("--key=") => {
                let value = arg.split_once('=').map(|(_, v)| v).unwrap_or_default();
                if value.is_empty() {
                    return Err(anyhow::anyhow!(
                        "Missing value for --key.\n\n{}",
                        usage_text()
                    ));
                }
                key = Some(value.to_string());
            }
            _ if arg.starts_with("--interval=") => {
                let value = arg.split_once('=').map(|(_, v)| v).unwrap_or_default();
                if value.is_empty() {
                    return Err(anyhow::anyhow!(
                        "Missing value for --interval.\n\n{}",
                        usage_text()
                    ));
                }
                interval = Some(parse_u64_arg("--interval", value)?);
            }
            _ => {
                return Err(anyhow::anyhow!(
                    "Unknown argument: {arg}\n\n{}",
                    usage_text()
                ));
            }
        }
    }

    let require_credentials = |ssid: Option<String>, key: Option<String>| {
        let ssid = ssid.ok_or_else(|| {
            anyhow::anyhow!("--ssid is required for this command.\n\n{}", usage_text())
        })?;
        let key = key.ok_or_else(|| {
            anyhow::anyhow!("--key is required for this command.\n\n{}", usage_text())
        })?;
        Ok::<_, anyhow::Error>((ssid, key))
    };

    match command.as_deref().unwrap_or("watch") {
        "watch" => {
            let (ssid, key) = require_credentials(ssid, key)?;
            Ok(CliCommand::Watch {
                ssid,
                key,
                interval,
                json,
            })
        }
        "up" => {
            if interval.is_some() || json {
                return Err(anyhow::anyhow!(
                    "--interval/--json are only valid with watch.\n\n{}",
                    usage_text()
                ));
            }
            let (ssid, key) = require_credentials(ssid, key)?;
            Ok(CliCommand::Up { ssid, key })
        }
        "status" | "down" => {
            if ssid.is_some() || key.is_some() || interval.is_some() || json {
                return Err(anyhow::anyhow!(
                    "Options are not valid with status or down.\n\n{}",
                    usage_text()
                ));
            }
            if command.as_deref() == Some("status") {
                Ok(CliCommand::Status)
            } else {
                Ok(CliCommand::Down)
            }
        }
        _ => unreachable!(),
    }
}

fn status_label(status: HotspotStatus) -> &'static str {
    match status {
        HotspotStatus::Started => "Started",
        HotspotStatus::Stopped => "Stopped",
        HotspotStatus::Unknown => "Unknown",
    }
}

fn render_event(event: &WatchEvent) {
    match event {
        WatchEvent::WatchStarted { interval_seconds } => {
            println!(
                "Watching for new devices every {interval_seconds}s. Press Ctrl+C to stop."
            );
        }
        WatchEvent::HotspotActive => println!("Hotspot is already On!"),
        WatchEvent::HotspotStarting { .. } => println!("Hotspot is off! Turning it on."),
        WatchEvent::HotspotStartFailed { message } => {
            println!("Failed to start hotspot: {message}");
        }
        WatchEvent::NewDeviceConnected { notification } => {
            println!("New device connected!");
            println!("   Device Name: {}", notification.name);
            println!("   MAC Address: {}", notification.link_address);
            println!(
                "   Connection Time: {}",
                notification.connected_at.format("%Y-%m-%d %H:%M:%S")
            );
            println!("   Duration: {}", notification.duration_text);
        }
        WatchEvent::CycleCompleted { .. } => {}
    }
}

fn emit_json(event: &WatchEvent) {
    match serde_json::to_string(event) {
        Ok(line) => println!("{line}"),
        Err(e) => tracing::warn!("failed to serialize watch event: {e}"),
    }
}

async fn run_watch(ssid: String, key: String, interval: Option<u64>, json: bool) -> Result<()> {
    if let Err(e) = preflight_neighbor_access().await {
        eprintln!("{e}");
        std::process::exit(EXIT_PRIVILEGE_DENIED);
    }

    let mut settings = WatchSettings::new(ssid, key);
    if let Some(secs) = interval {
        settings = settings.with_interval(secs);
    }

    let watcher = DeviceWatcher::new(
        NetshController::new(),
        ArpTableSource::new(),
        SystemResolver::new(),
        TerminalBell::new(),
        settings,
    );

    let callback = move |event: WatchEvent| {
        if json {
            emit_json(&event);
        } else {
            render_event(&event);
        }
    };

    tokio::select! {
        _ = watcher.run(callback) => {}
        _ = tokio::signal::ctrl_c() => {
            println!("\nExiting...");
            std::process::exit(EXIT_INTERRUPTED);
        }
    }

    Ok(())
}

/// Main entry point
async fn run<I, S>(args: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    match parse_cli_args(args)? {
        CliCommand::Help => {
            println!("{}", usage_text());
            Ok(())
        }
        CliCommand::Version => {
            println!("{}", version_text());
            Ok(())
        }
        CliCommand::Status => {
            let status = NetshController::new().query_state().await;
            println!("Hotspot status: {}", status_label(status));
            Ok(())
        }
        CliCommand::Up { ssid, key } => {
            NetshController::new()
                .start(&ssid, &key)
                .await
                .context("Failed to start hotspot")?;
            println!("Hotspot started successfully.");
            Ok(())
        }
        CliCommand::Down => {
            NetshController::new()
                .stop()
                .await
                .context("Failed to stop hotspot")?;
            println!("Hotspot stopped successfully.");
            Ok(())
        }
        CliCommand::Watch {
            ssid,
            key,
            interval,
            json,
        } => run_watch(ssid, key, interval, json).await,
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = hotspot_sentry::logging::init_logging() {
        eprintln!("[WARN] Failed to initialize structured logging: {}", e);
    }

    match run(std::env::args()).await {
        Ok(()) => {}
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("{:#}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_help_flag() {
        let args = ["hotspot-sentry", "--help"];
        let parsed = parse_cli_args(args).expect("help args should parse");
        assert_eq!(parsed, CliCommand::Help);
    }

    #[test]
    fn parse_version_flag() {
        let args = ["hotspot-sentry", "-V"];
        let parsed = parse_cli_args(args).expect("version args should parse");
        assert_eq!(parsed, CliCommand::Version);
    }

    #[test]
    fn parse_default_watch_command() {
        let args = ["hotspot-sentry", "--ssid", "sentry", "--key", "hunter22"];
        let parsed = parse_cli_args(args).expect("default watch should parse");
        assert_eq!(
            parsed,
            CliCommand::Watch {
                ssid: "sentry".to_string(),
                key: "hunter22".to_string(),
                interval: None,
                json: false,
            }
        );
    }

    #[test]
    fn parse_watch_with_interval_and_json() {
        let args = [
            "hotspot-sentry",
            "watch",
            "--ssid=sentry",
            "--key=hunter22",
            "--interval",
            "30",
            "--json",
        ];
        let parsed = parse_cli_args(args).expect("watch with options should parse");
        assert_eq!(
            parsed,
            CliCommand::Watch {
                ssid: "sentry".to_string(),
                key: "hunter22".to_string(),
                interval: Some(30),
                json: true,
            }
        );
    }

    #[test]
    fn parse_watch_requires_credentials() {
        let args = ["hotspot-sentry", "watch"];
        let err = parse_cli_args(args).expect_err("watch without ssid should fail");
        assert!(err.to_string().contains("--ssid is required"));
    }

    #[test]
    fn parse_status_command() {
        let args = ["hotspot-sentry", "status"];
        let parsed = parse_cli_args(args).expect("status should parse");
        assert_eq!(parsed, CliCommand::Status);
    }

    #[test]
    fn parse_status_rejects_watch_options() {
        let args = ["hotspot-sentry", "status", "--ssid", "sentry"];
        let err = parse_cli_args(args).expect_err("status should reject watch options");
        assert!(err.to_string().contains("not valid with status or down"));
    }

    #[test]
    fn parse_up_command() {
        let args = ["hotspot-sentry", "up", "--ssid", "sentry", "--key", "hunter22"];
        let parsed = parse_cli_args(args).expect("up should parse");
        assert_eq!(
            parsed,
            CliCommand::Up {
                ssid: "sentry".to_string(),
                key: "hunter22".to_string(),
            }
        );
    }

    #[test]
    fn parse_up_rejects_watch_only_options() {
        let args = [
            "hotspot-sentry",
            "up",
            "--ssid",
            "sentry",
            "--key",
            "hunter22",
            "--json",
        ];
        let err = parse_cli_args(args).expect_err("up should reject --json");
        assert!(err.to_string().contains("only valid with watch"));
    }

    #[test]
    fn parse_invalid_interval_errors() {
        let args = [
            "hotspot-sentry",
            "--ssid",
            "sentry",
            "--key",
            "hunter22",
            "--interval",
            "zero",
        ];
        let err = parse_cli_args(args).expect_err("non-numeric interval should fail");
        assert!(err.to_string().contains("Invalid value for --interval"));
    }

    #[test]
    fn parse_unknown_argument_errors() {
        let args = ["hotspot-sentry", "--unknown"];
        let err = parse_cli_args(args).expect_err("unknown flag should fail");
        assert!(err.to_string().contains("Unknown argument"));
    }
}
