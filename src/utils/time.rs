/// Format milliseconds as M:SS (minutes are not wrapped into hours).
pub fn format_time(millis: u64) -> String {
    let total_seconds = millis / 1000;
    let minutes = total_seconds / 60;
    let secs = total_seconds % 60;

    format!("{}:{:02}", minutes, secs)
}

/// Playback progress in `0.0..=1.0`. A zero duration reads as no progress.
pub fn progress_fraction(position_ms: u64, duration_ms: u64) -> f32 {
    if duration_ms == 0 {
        return 0.0;
    }
    (position_ms as f64 / duration_ms as f64).clamp(0.0, 1.0) as f32
}
