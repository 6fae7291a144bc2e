mod audio_player;
mod backend;
mod session;
mod sync;
mod video_surface;

pub use audio_player::*;
pub use backend::*;
pub use session::*;
pub use sync::*;
pub use video_surface::*;

#[cfg(test)]
pub(crate) use session::tests as fakes;

use std::sync::Arc;

use crossbeam_channel::Sender;

use crate::error::MediaResult;
use crate::library::MediaItem;

/// Playback state of the active item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// Nothing loaded (empty view, or the last open failed).
    Idle,
    Loaded,
    Playing,
    Paused,
}

/// What a playback resource reports on every status tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaybackStatus {
    pub position_ms: u64,
    pub duration_ms: u64,
    pub is_playing: bool,
}

/// A status report tagged with the activation it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusUpdate {
    pub generation: u64,
    pub status: PlaybackStatus,
}

/// Handed to a resource when it is opened; the only way it can talk back to
/// the session.
#[derive(Debug, Clone)]
pub struct StatusReporter {
    generation: u64,
    tx: Sender<StatusUpdate>,
}

impl StatusReporter {
    pub fn new(generation: u64, tx: Sender<StatusUpdate>) -> Self {
        Self { generation, tx }
    }

    /// Returns false once the session is gone.
    pub fn report(&self, status: PlaybackStatus) -> bool {
        self.tx
            .send(StatusUpdate {
                generation: self.generation,
                status,
            })
            .is_ok()
    }
}

/// A decoded video frame
#[derive(Clone)]
pub struct VideoFrame {
    pub data: Arc<Vec<u8>>,
    pub width: u32,
    pub height: u32,
    pub pts: f64,
    /// Increases with every new frame from the same surface.
    pub seq: u64,
}

/// An open audio resource.
pub trait AudioHandle {
    fn play(&mut self) -> MediaResult<()>;
    fn pause(&mut self) -> MediaResult<()>;
    /// `0.0..=1.0`
    fn set_volume(&mut self, volume: f32) -> MediaResult<()>;
    fn unload(&mut self) -> MediaResult<()>;
}

/// The surface a video item is rendered to.
pub trait VideoSurface {
    fn play(&mut self) -> MediaResult<()>;
    fn pause(&mut self) -> MediaResult<()>;
    fn set_muted(&mut self, muted: bool) -> MediaResult<()>;
    fn release(&mut self) -> MediaResult<()>;
    /// Latest frame to draw, if any.
    fn current_frame(&self) -> Option<VideoFrame> {
        None
    }
}

/// Opens playback resources for the session.
pub trait MediaBackend {
    type Audio: AudioHandle;
    type Video: VideoSurface;

    fn open_audio(&mut self, item: &MediaItem, reporter: StatusReporter) -> MediaResult<Self::Audio>;

    fn attach_video(
        &mut self,
        item: &MediaItem,
        muted: bool,
        reporter: StatusReporter,
    ) -> MediaResult<Self::Video>;
}
