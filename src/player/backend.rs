use super::{AudioPlayer, FfmpegVideoSurface, MediaBackend, StatusReporter};
use crate::error::MediaResult;
use crate::library::MediaItem;

/// Plays audio through rodio and video through an FFmpeg frame pipe.
#[derive(Debug, Default)]
pub struct DesktopBackend;

impl MediaBackend for DesktopBackend {
    type Audio = AudioPlayer;
    type Video = FfmpegVideoSurface;

    fn open_audio(&mut self, item: &MediaItem, reporter: StatusReporter) -> MediaResult<AudioPlayer> {
        log::debug!("Opening {} {}", item.media_type.name(), item.uri);
        if item.is_remote() {
            log::info!("Streaming {} over the network", item.filename);
        }
        AudioPlayer::open(&item.uri, item.duration_ms, Some(reporter))
    }

    fn attach_video(
        &mut self,
        item: &MediaItem,
        muted: bool,
        reporter: StatusReporter,
    ) -> MediaResult<FfmpegVideoSurface> {
        log::debug!("Attaching {} surface to {}", item.media_type.name(), item.uri);
        if item.is_remote() {
            log::info!("Streaming {} over the network", item.filename);
        }
        FfmpegVideoSurface::open(&item.uri, item.duration_ms, muted, reporter)
    }
}
