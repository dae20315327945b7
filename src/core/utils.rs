// Author: Dustin Pilgrim
// License: MIT

use std::time::Instant;

use once_cell::sync::Lazy;

static PROCESS_START: Lazy<Instant> = Lazy::new(Instant::now);

/// Monotonic milliseconds since the first call in this process.
pub fn now_ms() -> u64 {
    PROCESS_START.elapsed().as_millis() as u64
}

/// Stopwatch rendering, `HH:MM:SS`. Hours keep growing past 99.
pub fn format_elapsed(ms: u64) -> String {
    let secs = ms / 1000;
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}
