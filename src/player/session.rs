//! The "now playing" state machine.
//!
//! A session owns at most one playback resource at a time. Every activation
//! releases the previous resource before acquiring the next one and bumps a
//! generation counter, so status reports from a released resource are
//! recognised as stale and dropped.

use crossbeam_channel::{Receiver, Sender};

use super::{
    AudioHandle, MediaBackend, PlaybackState, PlaybackStatus, StatusReporter, StatusUpdate,
    VideoSurface,
};
use crate::error::MediaResult;
use crate::library::{FilteredView, MediaItem, MediaType};
use crate::utils::progress_fraction;

enum Resource<B: MediaBackend> {
    Audio(B::Audio),
    Video(B::Video),
}

impl<B: MediaBackend> Resource<B> {
    fn play(&mut self) -> MediaResult<()> {
        match self {
            Resource::Audio(audio) => audio.play(),
            Resource::Video(video) => video.play(),
        }
    }

    fn pause(&mut self) -> MediaResult<()> {
        match self {
            Resource::Audio(audio) => audio.pause(),
            Resource::Video(video) => video.pause(),
        }
    }

    /// Audio has no mute flag; volume stands in for it.
    fn set_muted(&mut self, muted: bool) -> MediaResult<()> {
        match self {
            Resource::Audio(audio) => audio.set_volume(if muted { 0.0 } else { 1.0 }),
            Resource::Video(video) => video.set_muted(muted),
        }
    }

    fn release(&mut self) -> MediaResult<()> {
        match self {
            Resource::Audio(audio) => audio.unload(),
            Resource::Video(video) => video.release(),
        }
    }
}

pub struct PlaybackSession<B: MediaBackend> {
    backend: B,
    view: FilteredView,
    active_index: usize,
    state: PlaybackState,
    is_playing: bool,
    is_muted: bool,
    position_ms: u64,
    duration_ms: u64,
    resource: Option<Resource<B>>,
    generation: u64,
    status_tx: Sender<StatusUpdate>,
    status_rx: Receiver<StatusUpdate>,
}

impl<B: MediaBackend> PlaybackSession<B> {
    pub fn new(backend: B) -> Self {
        let (status_tx, status_rx) = crossbeam_channel::unbounded();

        Self {
            backend,
            view: FilteredView::default(),
            active_index: 0,
            state: PlaybackState::Idle,
            is_playing: false,
            is_muted: false,
            position_ms: 0,
            duration_ms: 0,
            resource: None,
            generation: 0,
            status_tx,
            status_rx,
        }
    }

    // ---- Read-only state ----

    pub fn view(&self) -> &FilteredView {
        &self.view
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    pub fn active_item(&self) -> Option<&MediaItem> {
        self.view.get(self.active_index)
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn is_muted(&self) -> bool {
        self.is_muted
    }

    pub fn position_ms(&self) -> u64 {
        self.position_ms
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    pub fn progress_fraction(&self) -> f32 {
        progress_fraction(self.position_ms, self.duration_ms)
    }

    /// Whether a resource is currently open for the active item.
    pub fn has_resource(&self) -> bool {
        self.resource.is_some()
    }

    pub fn video(&self) -> Option<&B::Video> {
        match &self.resource {
            Some(Resource::Video(video)) => Some(video),
            _ => None,
        }
    }

    // ---- Transitions ----

    /// Replace the view (new filter or reloaded catalog). Always restarts at
    /// the first item.
    pub fn set_view(&mut self, view: FilteredView) {
        self.teardown();
        self.view = view;
        self.active_index = 0;
        self.reset_status(None);

        if self.view.is_empty() {
            log::debug!("View is empty, session idle");
        } else {
            self.activate(0);
        }
    }

    /// Load and start the item at `index`, releasing whatever was open.
    pub fn activate(&mut self, index: usize) {
        let Some(item) = self.view.get(index).cloned() else {
            log::warn!("Ignoring activation of index {} ({} item(s))", index, self.view.len());
            return;
        };

        self.teardown();
        self.active_index = index;
        self.reset_status(Some(&item));
        self.acquire(&item);
    }

    pub fn next(&mut self) -> Option<usize> {
        if self.view.is_empty() {
            return None;
        }
        let index = (self.active_index + 1) % self.view.len();
        self.activate(index);
        Some(index)
    }

    pub fn previous(&mut self) -> Option<usize> {
        if self.view.is_empty() {
            return None;
        }
        let index = if self.active_index == 0 {
            self.view.len() - 1
        } else {
            self.active_index - 1
        };
        self.activate(index);
        Some(index)
    }

    /// Flip between playing and paused. With no open resource (the open failed
    /// earlier) this opens one and starts it.
    pub fn toggle_play_pause(&mut self) {
        let Some(item) = self.active_item().cloned() else {
            return;
        };

        let Some(resource) = self.resource.as_mut() else {
            log::debug!("No resource for {}, opening it", item.filename);
            self.acquire(&item);
            return;
        };

        let result = if self.is_playing {
            resource.pause()
        } else {
            resource.play()
        };

        match result {
            Ok(()) => {
                self.is_playing = !self.is_playing;
                self.state = if self.is_playing {
                    PlaybackState::Playing
                } else {
                    PlaybackState::Paused
                };
            }
            Err(e) => log::warn!("Playback error: {}", e),
        }
    }

    pub fn set_muted(&mut self, muted: bool) {
        if let Some(resource) = self.resource.as_mut() {
            if let Err(e) = resource.set_muted(muted) {
                log::warn!("Failed to change mute state: {}", e);
                return;
            }
        }
        self.is_muted = muted;
    }

    pub fn toggle_mute(&mut self) {
        self.set_muted(!self.is_muted);
    }

    /// Absorb a status report. Returns false for reports from a resource that
    /// has since been released.
    pub fn ingest(&mut self, update: StatusUpdate) -> bool {
        if update.generation != self.generation || self.resource.is_none() {
            return false;
        }

        let PlaybackStatus {
            position_ms,
            duration_ms,
            is_playing,
        } = update.status;
        self.position_ms = position_ms;
        self.duration_ms = duration_ms;
        self.is_playing = is_playing;
        self.state = if is_playing {
            PlaybackState::Playing
        } else if self.state == PlaybackState::Loaded && position_ms == 0 {
            PlaybackState::Loaded
        } else {
            PlaybackState::Paused
        };
        true
    }

    /// Drain pending status reports. Returns true if any were applied.
    pub fn pump_status(&mut self) -> bool {
        let mut applied = false;
        while let Ok(update) = self.status_rx.try_recv() {
            applied |= self.ingest(update);
        }
        applied
    }

    /// Release everything, e.g. when the screen goes away.
    pub fn shutdown(&mut self) {
        self.teardown();
        self.reset_status(None);
    }

    // ---- Internal helpers ----

    fn reset_status(&mut self, item: Option<&MediaItem>) {
        self.state = PlaybackState::Idle;
        self.is_playing = false;
        self.position_ms = 0;
        self.duration_ms = item.map(|i| i.duration_ms).unwrap_or(0);
    }

    fn teardown(&mut self) {
        // Anything reported under the old generation is now stale.
        self.generation += 1;

        if let Some(mut resource) = self.resource.take() {
            if let Err(e) = resource.release() {
                log::debug!("Ignoring teardown error: {}", e);
            }
        }
    }

    fn acquire(&mut self, item: &MediaItem) {
        let reporter = StatusReporter::new(self.generation, self.status_tx.clone());

        let opened = match item.media_type {
            MediaType::Video => self
                .backend
                .attach_video(item, self.is_muted, reporter)
                .map(Resource::Video),
            MediaType::Audio => self.backend.open_audio(item, reporter).map(Resource::Audio),
        };

        let mut resource = match opened {
            Ok(resource) => resource,
            Err(e) => {
                log::warn!("Playback error: {}", e);
                return;
            }
        };

        if item.is_audio() && self.is_muted {
            if let Err(e) = resource.set_muted(true) {
                log::warn!("Failed to mute {}: {}", item.filename, e);
            }
        }

        self.state = PlaybackState::Loaded;
        match resource.play() {
            Ok(()) => {
                self.is_playing = true;
                self.state = PlaybackState::Playing;
            }
            Err(e) => log::warn!("Playback error: {}", e),
        }
        self.resource = Some(resource);
    }
}

impl<B: MediaBackend> Drop for PlaybackSession<B> {
    fn drop(&mut self) {
        self.teardown();
    }
}
