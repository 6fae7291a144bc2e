use parking_lot::Mutex;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process::{Child, Stdio};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::{AudioHandle, PlaybackStatus, StatusReporter};
use crate::error::{MediaError, MediaResult};

/// Extensions rodio can decode straight from disk.
const NATIVE_EXTENSIONS: &[&str] = &["wav", "mp3", "flac", "ogg"];

const STATUS_INTERVAL: Duration = Duration::from_millis(250);
const EXTRACT_POLL: Duration = Duration::from_millis(50);

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// State shared between the player and its preparation thread.
struct Shared {
    sink: Sink,
    temp_audio_path: Mutex<Option<PathBuf>>,
    /// The FFmpeg extraction still running, if any.
    extraction: Mutex<Option<Child>>,
    alive: AtomicBool,
    ready: AtomicBool,
}

/// Audio player using rodio for playback.
/// Decoding is prepared in the background; playback starts once ready.
pub struct AudioPlayer {
    _stream: OutputStream,
    _stream_handle: OutputStreamHandle,
    shared: Arc<Shared>,
}

/// A thread-safe view of a player's sink, used to start a video soundtrack
/// in step with the picture.
#[derive(Clone)]
pub struct SoundtrackHandle {
    shared: Arc<Shared>,
}

impl SoundtrackHandle {
    pub fn is_ready(&self) -> bool {
        self.shared.ready.load(Ordering::SeqCst)
    }

    /// Seek to `position` and start playing.
    pub fn start_at(&self, position: Duration) {
        if let Err(e) = self.shared.sink.try_seek(position) {
            log::debug!("Soundtrack seek to {:?} failed: {}", position, e);
        }
        self.shared.sink.play();
    }

    pub fn pause(&self) {
        self.shared.sink.pause();
    }
}

impl AudioPlayer {
    /// Open `uri` (a local path or a remote URL). Preparation runs in a
    /// background thread so the caller is NOT blocked. If a reporter is given,
    /// the same thread reports status until the player is unloaded.
    pub fn open(uri: &str, nominal_duration_ms: u64, reporter: Option<StatusReporter>) -> MediaResult<Self> {
        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| MediaError::open_failure(uri, format!("no audio output: {}", e)))?;

        let sink = Sink::try_new(&stream_handle)
            .map_err(|e| MediaError::open_failure(uri, format!("failed to create audio sink: {}", e)))?;
        // Nothing plays until asked to.
        sink.pause();

        let shared = Arc::new(Shared {
            sink,
            temp_audio_path: Mutex::new(None),
            extraction: Mutex::new(None),
            alive: AtomicBool::new(true),
            ready: AtomicBool::new(false),
        });

        let uri = uri.to_string();
        let worker = shared.clone();
        std::thread::spawn(move || {
            let duration_ms = match prepare_source(&uri, &worker) {
                Ok((source, total)) => {
                    worker.sink.append(source);
                    worker.ready.store(true, Ordering::SeqCst);
                    total.map(|d| d.as_millis() as u64).unwrap_or(nominal_duration_ms)
                }
                Err(e) => {
                    if worker.alive.load(Ordering::SeqCst) {
                        log::warn!("Playback error: {}", e);
                    }
                    nominal_duration_ms
                }
            };

            // Unloaded while preparing: the temp file is ours to clean up.
            if !worker.alive.load(Ordering::SeqCst) {
                remove_temp(&worker.temp_audio_path);
                return;
            }

            if let Some(reporter) = reporter {
                report_status(&worker, duration_ms, &reporter);
            }
        });

        Ok(Self {
            _stream: stream,
            _stream_handle: stream_handle,
            shared,
        })
    }

    pub fn soundtrack(&self) -> SoundtrackHandle {
        SoundtrackHandle {
            shared: self.shared.clone(),
        }
    }
}

impl AudioHandle for AudioPlayer {
    fn play(&mut self) -> MediaResult<()> {
        self.shared.sink.play();
        Ok(())
    }

    fn pause(&mut self) -> MediaResult<()> {
        self.shared.sink.pause();
        Ok(())
    }

    fn set_volume(&mut self, volume: f32) -> MediaResult<()> {
        self.shared.sink.set_volume(volume.clamp(0.0, 1.0));
        Ok(())
    }

    fn unload(&mut self) -> MediaResult<()> {
        if self.shared.alive.swap(false, Ordering::SeqCst) {
            kill_extraction(&self.shared.extraction);
            self.shared.sink.stop();
            self.shared.sink.clear();
            remove_temp(&self.shared.temp_audio_path);
        }
        Ok(())
    }
}

impl Drop for AudioPlayer {
    fn drop(&mut self) {
        let _ = self.unload();
    }
}

type PreparedSource = (Decoder<BufReader<File>>, Option<Duration>);

/// Decode `uri` directly when rodio understands it, otherwise let FFmpeg turn
/// it into a WAV file first.
fn prepare_source(uri: &str, shared: &Shared) -> MediaResult<PreparedSource> {
    let local = Path::new(uri);
    let path = if local.is_file() && is_native(local) {
        local.to_path_buf()
    } else {
        let temp_path = temp_wav_path();
        *shared.temp_audio_path.lock() = Some(temp_path.clone());
        extract_audio_to_temp(uri, &temp_path, &shared.extraction, &shared.alive)?;
        temp_path
    };

    let file = File::open(&path)
        .map_err(|e| MediaError::open_failure(uri, format!("failed to open audio file: {}", e)))?;
    let source = Decoder::new(BufReader::new(file))
        .map_err(|e| MediaError::open_failure(uri, format!("failed to decode audio: {}", e)))?;
    let total = source.total_duration();
    Ok((source, total))
}

fn is_native(path: &Path) -> bool {
    path.extension()
        .map(|ext| NATIVE_EXTENSIONS.contains(&ext.to_string_lossy().to_lowercase().as_str()))
        .unwrap_or(false)
}

fn report_status(shared: &Shared, duration_ms: u64, reporter: &StatusReporter) {
    while shared.alive.load(Ordering::SeqCst) {
        let status = PlaybackStatus {
            position_ms: shared.sink.get_pos().as_millis() as u64,
            duration_ms,
            is_playing: !shared.sink.is_paused() && !shared.sink.empty(),
        };
        if !reporter.report(status) {
            break;
        }
        std::thread::sleep(STATUS_INTERVAL);
    }
}

fn remove_temp(slot: &Mutex<Option<PathBuf>>) {
    if let Some(temp_path) = slot.lock().take() {
        let _ = std::fs::remove_file(temp_path);
    }
}

/// Kill a running extraction (kill + wait to avoid zombies)
fn kill_extraction(slot: &Mutex<Option<Child>>) {
    if let Some(mut child) = slot.lock().take() {
        let _ = child.kill();
        let _ = child.wait();
    }
}

fn temp_wav_path() -> PathBuf {
    std::env::temp_dir().join(format!(
        "media_feed_audio_{}_{}.wav",
        std::process::id(),
        TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
    ))
}

/// Extract audio to a temporary WAV file using FFmpeg.
fn extract_audio_to_temp(
    uri: &str,
    temp_path: &Path,
    extraction: &Mutex<Option<Child>>,
    alive: &AtomicBool,
) -> MediaResult<()> {
    let child = crate::ffmpeg::command("ffmpeg")
        .args(crate::ffmpeg::build_audio_extract_args(uri, temp_path))
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| MediaError::open_failure(uri, format!("failed to run FFmpeg: {}", e)))?;
    *extraction.lock() = Some(child);

    let succeeded = wait_for_extraction(extraction, alive)
        .map_err(|reason| MediaError::open_failure(uri, reason))?;

    let usable = succeeded && std::fs::metadata(temp_path).map(|m| m.len() > 0).unwrap_or(false);
    if !usable {
        let _ = std::fs::remove_file(temp_path);
        return Err(MediaError::open_failure(uri, "FFmpeg audio extraction failed"));
    }
    Ok(())
}

/// Poll the extraction in `slot` until it exits. Gives up as soon as the
/// player is unloaded or the child is taken out of the slot.
fn wait_for_extraction(slot: &Mutex<Option<Child>>, alive: &AtomicBool) -> Result<bool, String> {
    loop {
        if !alive.load(Ordering::SeqCst) {
            kill_extraction(slot);
            return Err("cancelled".to_string());
        }

        let polled = match slot.lock().as_mut() {
            Some(child) => child.try_wait(),
            None => return Err("cancelled".to_string()),
        };
        match polled {
            Ok(Some(status)) => {
                slot.lock().take();
                return Ok(status.success());
            }
            Ok(None) => std::thread::sleep(EXTRACT_POLL),
            Err(e) => {
                kill_extraction(slot);
                return Err(format!("failed to wait for FFmpeg: {}", e));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_native() {
        assert!(is_native(Path::new("/music/a.MP3")));
        assert!(is_native(Path::new("b.wav")));
        assert!(!is_native(Path::new("c.m4a")));
        assert!(!is_native(Path::new("noext")));
    }

    #[test]
    fn test_remove_temp_clears_slot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x.wav");
        std::fs::write(&path, b"data").unwrap();

        let slot = Mutex::new(Some(path.clone()));
        remove_temp(&slot);
        assert!(slot.lock().is_none());
        assert!(!path.exists());
    }

    #[cfg(unix)]
    fn long_running_child() -> Child {
        std::process::Command::new("sleep")
            .arg("30")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .unwrap()
    }

    #[cfg(unix)]
    #[test]
    fn test_unload_kills_running_extraction() {
        let slot = Mutex::new(Some(long_running_child()));
        let alive = AtomicBool::new(false);

        let started = std::time::Instant::now();
        assert_eq!(wait_for_extraction(&slot, &alive), Err("cancelled".to_string()));
        assert!(slot.lock().is_none());
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[cfg(unix)]
    #[test]
    fn test_kill_extraction_reaps_child() {
        let slot = Mutex::new(Some(long_running_child()));
        kill_extraction(&slot);
        assert!(slot.lock().is_none());

        // A second kill is a no-op.
        kill_extraction(&slot);
    }

    #[cfg(unix)]
    #[test]
    fn test_finished_extraction_reports_status() {
        let child = std::process::Command::new("true").spawn().unwrap();
        let slot = Mutex::new(Some(child));
        let alive = AtomicBool::new(true);

        assert_eq!(wait_for_extraction(&slot, &alive), Ok(true));
        assert!(slot.lock().is_none());
    }
}
