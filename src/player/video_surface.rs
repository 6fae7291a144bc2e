//! FFmpeg-backed video surface.
//!
//! One persistent FFmpeg process streams real-time paced RGBA frames through a
//! stdout pipe. Pausing kills the process; playing respawns it at the clock
//! position. The decoder thread owns the clock: it only runs once frames
//! actually arrive, and the soundtrack is started at the clock position.

use std::io::Read;
use std::process::{Child, Stdio};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use parking_lot::Mutex;

use super::{AudioHandle, AudioPlayer, PlaybackClock, PlaybackStatus, SoundtrackHandle, StatusReporter, VideoFrame, VideoSurface};
use crate::error::{MediaError, MediaResult};
use crate::ffmpeg::{build_frame_stream_args, extract_poster, probe_uri};

const PREVIEW_MAX_WIDTH: u32 = 720;
const PREVIEW_MAX_HEIGHT: u32 = 1280;
const FPS: u32 = 24;
const STATUS_INTERVAL: Duration = Duration::from_millis(250);

/// Commands sent to the decoder thread
#[derive(Debug)]
enum DecoderCommand {
    Play,
    Pause,
    Stop,
}

pub struct FfmpegVideoSurface {
    command_tx: Sender<DecoderCommand>,
    current_frame: Arc<Mutex<Option<VideoFrame>>>,
    audio: Option<AudioPlayer>,
    released: bool,
}

impl FfmpegVideoSurface {
    pub fn open(uri: &str, nominal_duration_ms: u64, muted: bool, reporter: StatusReporter) -> MediaResult<Self> {
        let (command_tx, command_rx) = crossbeam_channel::unbounded();
        let current_frame = Arc::new(Mutex::new(None));

        // The soundtrack is optional; silent clips simply have none.
        let audio = match AudioPlayer::open(uri, nominal_duration_ms, None) {
            Ok(mut audio) => {
                if muted {
                    audio.set_volume(0.0)?;
                }
                Some(audio)
            }
            Err(e) => {
                log::debug!("No audio for {}: {}", uri, e);
                None
            }
        };

        let decoder = Decoder {
            uri: uri.to_string(),
            nominal_duration_ms,
            command_rx,
            current_frame: current_frame.clone(),
            state: DecoderState::new(audio.as_ref().map(AudioPlayer::soundtrack)),
            reporter,
        };
        thread::Builder::new()
            .name("video-decoder".to_string())
            .spawn(move || decoder.run())
            .map_err(|e| MediaError::open_failure(uri, e))?;

        Ok(Self {
            command_tx,
            current_frame,
            audio,
            released: false,
        })
    }

    fn send(&self, command: DecoderCommand) -> MediaResult<()> {
        self.command_tx
            .send(command)
            .map_err(|_| MediaError::control_failure("video decoder has stopped"))
    }
}

impl VideoSurface for FfmpegVideoSurface {
    fn play(&mut self) -> MediaResult<()> {
        self.send(DecoderCommand::Play)
    }

    fn pause(&mut self) -> MediaResult<()> {
        self.send(DecoderCommand::Pause)
    }

    fn set_muted(&mut self, muted: bool) -> MediaResult<()> {
        if let Some(ref mut audio) = self.audio {
            audio.set_volume(if muted { 0.0 } else { 1.0 })?;
        }
        Ok(())
    }

    fn release(&mut self) -> MediaResult<()> {
        if self.released {
            return Ok(());
        }
        self.released = true;
        let _ = self.command_tx.send(DecoderCommand::Stop);
        if let Some(mut audio) = self.audio.take() {
            audio.unload()?;
        }
        Ok(())
    }

    fn current_frame(&self) -> Option<VideoFrame> {
        self.current_frame.lock().clone()
    }
}

impl Drop for FfmpegVideoSurface {
    fn drop(&mut self) {
        let _ = self.release();
    }
}

/// Scale `width`x`height` down to fit the preview box, keeping the aspect ratio.
/// Dimensions stay even so FFmpeg's scaler accepts them.
pub fn calculate_preview_size(width: u32, height: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (640, 360);
    }
    if width <= PREVIEW_MAX_WIDTH && height <= PREVIEW_MAX_HEIGHT {
        return (width & !1, height & !1);
    }

    let scale = (PREVIEW_MAX_WIDTH as f32 / width as f32).min(PREVIEW_MAX_HEIGHT as f32 / height as f32);
    let w = ((width as f32 * scale) as u32).max(2) & !1;
    let h = ((height as f32 * scale) as u32).max(2) & !1;
    (w, h)
}

// ---- Clock and soundtrack bookkeeping ----

/// The audio side of a video, as seen by the decoder thread.
trait Soundtrack {
    fn is_ready(&self) -> bool;
    fn start_at(&self, position: Duration);
    fn pause(&self);
}

impl Soundtrack for SoundtrackHandle {
    fn is_ready(&self) -> bool {
        SoundtrackHandle::is_ready(self)
    }

    fn start_at(&self, position: Duration) {
        SoundtrackHandle::start_at(self, position)
    }

    fn pause(&self) {
        SoundtrackHandle::pause(self)
    }
}

/// Playback bookkeeping of the decoder thread.
///
/// The clock stays frozen between spawning FFmpeg and the first decoded frame,
/// so probing, poster extraction and process start-up never count as played
/// time. The soundtrack starts only once the clock runs and its source is
/// prepared, seeked to the clock position.
struct DecoderState<S> {
    clock: PlaybackClock,
    soundtrack: Option<S>,
    wants_play: bool,
    awaiting_first_frame: bool,
    soundtrack_running: bool,
}

impl<S: Soundtrack> DecoderState<S> {
    fn new(soundtrack: Option<S>) -> Self {
        Self {
            clock: PlaybackClock::new(),
            soundtrack,
            wants_play: false,
            awaiting_first_frame: false,
            soundtrack_running: false,
        }
    }

    fn wants_play(&self) -> bool {
        self.wants_play
    }

    fn position_ms(&self) -> u64 {
        self.clock.position_ms()
    }

    fn on_play(&mut self) {
        self.wants_play = true;
    }

    fn on_pause(&mut self) {
        self.wants_play = false;
        self.halt();
    }

    /// EOF, decode error or spawn failure: playback is over.
    fn on_end_of_stream(&mut self) {
        self.wants_play = false;
        self.halt();
    }

    /// A new FFmpeg process is about to start; returns its start offset.
    fn on_spawn(&mut self) -> f64 {
        self.awaiting_first_frame = true;
        self.clock.elapsed().as_secs_f64()
    }

    fn on_frame(&mut self) {
        if self.awaiting_first_frame {
            self.awaiting_first_frame = false;
            self.clock.resume();
        }
    }

    fn sync_soundtrack(&mut self) {
        if !self.wants_play || self.awaiting_first_frame || self.soundtrack_running {
            return;
        }
        if let Some(soundtrack) = self.soundtrack.as_ref().filter(|s| s.is_ready()) {
            soundtrack.start_at(self.clock.elapsed());
            self.soundtrack_running = true;
        }
    }

    fn halt(&mut self) {
        self.clock.pause();
        self.awaiting_first_frame = false;
        if self.soundtrack_running {
            if let Some(ref soundtrack) = self.soundtrack {
                soundtrack.pause();
            }
            self.soundtrack_running = false;
        }
    }
}

// ---- Decoder thread ----

struct Decoder {
    uri: String,
    nominal_duration_ms: u64,
    command_rx: Receiver<DecoderCommand>,
    current_frame: Arc<Mutex<Option<VideoFrame>>>,
    state: DecoderState<SoundtrackHandle>,
    reporter: StatusReporter,
}

impl Decoder {
    fn run(mut self) {
        let info = match probe_uri(&self.uri) {
            Ok(info) if info.has_video => info,
            Ok(_) => {
                log::warn!("Playback error: {} has no video stream", self.uri);
                return self.idle_until_stopped();
            }
            Err(e) => {
                log::warn!("Playback error: failed to probe {}: {}", self.uri, e);
                return self.idle_until_stopped();
            }
        };
        if !self.apply_commands(&mut None) {
            return;
        }

        let duration_ms = match info.duration_ms() {
            0 => self.nominal_duration_ms,
            probed => probed,
        };
        let (width, height) = calculate_preview_size(info.width, info.height);
        let frame_size = (width * height * 4) as usize;
        let mut seq = 0u64;

        match extract_poster(&self.uri, width) {
            Ok(poster) => {
                let mut slot = self.current_frame.lock();
                if slot.is_none() {
                    *slot = Some(VideoFrame {
                        width: poster.width(),
                        height: poster.height(),
                        data: Arc::new(poster.into_raw()),
                        pts: 0.0,
                        seq,
                    });
                }
            }
            Err(e) => log::debug!("No poster for {}: {}", self.uri, e),
        }

        let mut process: Option<Child> = None;
        let mut last_report: Option<Instant> = None;

        loop {
            if !self.apply_commands(&mut process) {
                return;
            }

            if self.state.wants_play() {
                if process.is_none() {
                    let start = self.state.on_spawn();
                    process = spawn_ffmpeg(&self.uri, start, width, height);
                }

                let frame = process
                    .as_mut()
                    .and_then(|child| read_one_frame(child, frame_size));
                match frame {
                    Some(data) => {
                        self.state.on_frame();
                        seq += 1;
                        *self.current_frame.lock() = Some(VideoFrame {
                            data: Arc::new(data),
                            width,
                            height,
                            pts: self.state.position_ms() as f64 / 1000.0,
                            seq,
                        });
                    }
                    None => {
                        self.state.on_end_of_stream();
                        kill_process(&mut process);
                    }
                }
                self.state.sync_soundtrack();
            } else {
                thread::sleep(Duration::from_millis(16));
            }

            if last_report.map_or(true, |t| t.elapsed() >= STATUS_INTERVAL) {
                last_report = Some(Instant::now());
                let status = PlaybackStatus {
                    position_ms: self.state.position_ms().min(duration_ms.max(1)),
                    duration_ms,
                    is_playing: self.state.wants_play(),
                };
                if !self.reporter.report(status) {
                    kill_process(&mut process);
                    return;
                }
            }
        }
    }

    /// Drain pending commands. Returns false once the surface is stopped.
    fn apply_commands(&mut self, process: &mut Option<Child>) -> bool {
        loop {
            match self.command_rx.try_recv() {
                Ok(DecoderCommand::Play) => self.state.on_play(),
                Ok(DecoderCommand::Pause) => {
                    self.state.on_pause();
                    kill_process(process);
                }
                Ok(DecoderCommand::Stop) | Err(TryRecvError::Disconnected) => {
                    self.state.on_pause();
                    kill_process(process);
                    return false;
                }
                Err(TryRecvError::Empty) => return true,
            }
        }
    }

    fn idle_until_stopped(&self) {
        let _ = self.reporter.report(PlaybackStatus {
            position_ms: 0,
            duration_ms: self.nominal_duration_ms,
            is_playing: false,
        });
        loop {
            match self.command_rx.recv() {
                Ok(DecoderCommand::Stop) | Err(_) => return,
                Ok(_) => {}
            }
        }
    }
}

/// Spawn a persistent FFmpeg process that outputs raw RGBA frames to stdout
fn spawn_ffmpeg(uri: &str, start_secs: f64, width: u32, height: u32) -> Option<Child> {
    let spawned = crate::ffmpeg::command("ffmpeg")
        .args(build_frame_stream_args(uri, start_secs, width, height, FPS))
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .stdin(Stdio::null())
        .spawn();

    match spawned {
        Ok(child) => Some(child),
        Err(e) => {
            log::warn!("Failed to start FFmpeg for {}: {}", uri, e);
            None
        }
    }
}

/// Kill a process cleanly (kill + wait to avoid zombies)
fn kill_process(proc: &mut Option<Child>) {
    if let Some(ref mut child) = proc {
        let _ = child.kill();
        let _ = child.wait();
    }
    *proc = None;
}

/// Read exactly one frame from the process stdout.
fn read_one_frame(proc: &mut Child, frame_size: usize) -> Option<Vec<u8>> {
    let stdout = proc.stdout.as_mut()?;
    let mut buf = vec![0u8; frame_size];
    stdout.read_exact(&mut buf).ok()?;
    Some(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::thread::sleep;

    #[test]
    fn test_preview_size_small_video_unchanged() {
        assert_eq!(calculate_preview_size(640, 360), (640, 360));
        assert_eq!(calculate_preview_size(641, 361), (640, 360));
    }

    #[test]
    fn test_preview_size_scales_landscape() {
        let (w, h) = calculate_preview_size(1920, 1080);
        assert_eq!(w, 720);
        assert_eq!(h, 404);
    }

    #[test]
    fn test_preview_size_scales_portrait() {
        let (w, h) = calculate_preview_size(1080, 1920);
        assert_eq!(w, 720);
        assert_eq!(h, 1280);
    }

    #[test]
    fn test_preview_size_unknown() {
        assert_eq!(calculate_preview_size(0, 0), (640, 360));
    }

    #[derive(Default)]
    struct FakeSoundtrack {
        ready: Cell<bool>,
        calls: RefCell<Vec<String>>,
    }

    impl Soundtrack for FakeSoundtrack {
        fn is_ready(&self) -> bool {
            self.ready.get()
        }

        fn start_at(&self, position: Duration) {
            self.calls.borrow_mut().push(format!("start {}", position.as_millis()));
        }

        fn pause(&self) {
            self.calls.borrow_mut().push("pause".to_string());
        }
    }

    fn state(ready: bool) -> DecoderState<FakeSoundtrack> {
        let soundtrack = FakeSoundtrack::default();
        soundtrack.ready.set(ready);
        DecoderState::new(Some(soundtrack))
    }

    fn calls(state: &DecoderState<FakeSoundtrack>) -> Vec<String> {
        state.soundtrack.as_ref().unwrap().calls.borrow().clone()
    }

    #[test]
    fn test_clock_waits_for_first_frame() {
        let mut state = state(true);
        state.on_play();
        assert_eq!(state.on_spawn(), 0.0);

        // Process start-up must not advance the position.
        sleep(Duration::from_millis(40));
        assert_eq!(state.position_ms(), 0);
        state.sync_soundtrack();
        assert!(calls(&state).is_empty());

        state.on_frame();
        sleep(Duration::from_millis(30));
        assert!(state.position_ms() >= 25);
    }

    #[test]
    fn test_soundtrack_starts_at_clock_position_once_ready() {
        let mut state = state(false);
        state.on_play();
        state.on_spawn();
        state.on_frame();
        sleep(Duration::from_millis(50));

        state.sync_soundtrack();
        assert!(calls(&state).is_empty());

        state.soundtrack.as_ref().unwrap().ready.set(true);
        state.sync_soundtrack();
        let started = calls(&state);
        assert_eq!(started.len(), 1);
        let ms: u64 = started[0].trim_start_matches("start ").parse().unwrap();
        assert!(ms >= 50);

        // Already running: no second start.
        state.sync_soundtrack();
        assert_eq!(calls(&state).len(), 1);
    }

    #[test]
    fn test_pause_freezes_clock_and_soundtrack() {
        let mut state = state(true);
        state.on_play();
        state.on_spawn();
        state.on_frame();
        state.sync_soundtrack();
        sleep(Duration::from_millis(20));

        state.on_pause();
        assert!(!state.wants_play());
        let paused_at = state.position_ms();
        sleep(Duration::from_millis(30));
        assert_eq!(state.position_ms(), paused_at);
        assert_eq!(calls(&state).last().map(String::as_str), Some("pause"));

        // Resuming respawns at the frozen position.
        state.on_play();
        let start_ms = state.on_spawn() * 1000.0;
        assert!((start_ms - paused_at as f64).abs() < 1.0);
        assert_eq!(state.position_ms(), paused_at);
    }

    #[test]
    fn test_end_of_stream_stops_playback() {
        let mut state = state(true);
        state.on_play();
        state.on_spawn();
        state.on_end_of_stream();

        assert!(!state.wants_play());
        assert_eq!(state.position_ms(), 0);
        state.sync_soundtrack();
        assert!(calls(&state).is_empty());
    }

    #[test]
    fn test_pause_before_first_frame_leaves_soundtrack_alone() {
        let mut state = state(true);
        state.on_play();
        state.on_spawn();
        state.on_pause();

        assert!(calls(&state).is_empty());
        assert_eq!(state.position_ms(), 0);
    }
}
