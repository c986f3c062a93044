use std::time::{Duration, Instant};

/// Process start timestamp. Captured once, read-only afterwards.
#[derive(Debug, Clone, Copy)]
pub struct UptimeClock {
    started: Instant,
}

impl UptimeClock {
    pub fn start() -> Self {
        Self::started_at(Instant::now())
    }

    pub fn started_at(started: Instant) -> Self {
        Self { started }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn format(&self) -> String {
        format_uptime(self.elapsed())
    }
}

/// `dd.hh:mm:ss`, every field at least two digits wide.
pub fn format_uptime(uptime: Duration) -> String {
    let secs = uptime.as_secs();
    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3_600;
    let minutes = (secs % 3_600) / 60;
    let seconds = secs % 60;

    format!("{days:02}.{hours:02}:{minutes:02}:{seconds:02}")
}
