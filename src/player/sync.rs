use std::time::{Duration, Instant};

/// Wall-clock position of a video surface, paused and resumed alongside it.
pub struct PlaybackClock {
    started_at: Option<Instant>,
    offset: Duration,
}

impl PlaybackClock {
    pub fn new() -> Self {
        Self {
            started_at: None,
            offset: Duration::ZERO,
        }
    }

    pub fn resume(&mut self) {
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
        }
    }

    pub fn pause(&mut self) {
        if let Some(start) = self.started_at.take() {
            self.offset += start.elapsed();
        }
    }

    pub fn elapsed(&self) -> Duration {
        match self.started_at {
            Some(start) => self.offset + start.elapsed(),
            None => self.offset,
        }
    }

    pub fn position_ms(&self) -> u64 {
        self.elapsed().as_millis() as u64
    }
}

impl Default for PlaybackClock {
    fn default() -> Self {
        Self::new()
    }
}
