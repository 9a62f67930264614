//! Audible new-device alerts
//!
//! Fire-and-forget notification tones. The discovery loop triggers the
//! sink exactly once per newly observed device; sinks must never fail the
//! cycle.

use std::io::Write;

/// Sink for audible alerts. `frequency_hz`/`duration_ms` describe the
/// requested tone for sinks that can synthesize one; sinks with a fixed
/// tone may ignore them.
pub trait AlertSink {
    fn alert(&self, frequency_hz: u32, duration_ms: u64);
}

/// Rings the terminal bell. The bell's tone is fixed by the terminal, so
/// the requested parameters are ignored.
#[derive(Debug, Default)]
pub struct TerminalBell;

impl TerminalBell {
    pub fn new() -> Self {
        Self
    }
}

impl AlertSink for TerminalBell {
    fn alert(&self, _frequency_hz: u32, _duration_ms: u64) {
        let mut stderr = std::io::stderr();
        let _ = stderr.write_all(b"\x07");
        let _ = stderr.flush();
    }
}
