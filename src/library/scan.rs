//! Enumerating media stored in the user's folders.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use walkdir::WalkDir;

use super::{MediaItem, MediaType};
use crate::error::MediaResult;

/// Supported video file extensions
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mkv", "avi", "mov", "webm", "wmv", "flv", "m4v"];

/// Supported audio file extensions
pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "aac", "flac", "ogg", "m4a", "wma", "opus"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    CreationTimeDesc,
    CreationTimeAsc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetQuery {
    pub types: Vec<MediaType>,
    pub limit: usize,
    pub sort: SortOrder,
}

/// A raw asset as the source reports it.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetRecord {
    pub id: String,
    pub uri: String,
    pub filename: String,
    pub media_type: MediaType,
    pub duration_ms: u64,
    pub creation_time: Option<i64>,
}

impl From<AssetRecord> for MediaItem {
    fn from(record: AssetRecord) -> Self {
        MediaItem {
            id: record.id,
            uri: record.uri,
            filename: record.filename,
            media_type: record.media_type,
            duration_ms: record.duration_ms,
            creation_time: record.creation_time,
        }
    }
}

pub trait AssetSource {
    fn list_assets(&self, query: &AssetQuery) -> MediaResult<Vec<AssetRecord>>;
}

/// Classify a path by its extension.
pub fn media_type_for(path: &Path) -> Option<MediaType> {
    let ext = path.extension()?.to_string_lossy().to_lowercase();
    if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
        Some(MediaType::Video)
    } else if AUDIO_EXTENSIONS.contains(&ext.as_str()) {
        Some(MediaType::Audio)
    } else {
        None
    }
}

/// Scans a set of folders recursively.
pub struct FolderSource {
    dirs: Vec<PathBuf>,
    probe_durations: bool,
}

impl FolderSource {
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self {
            dirs,
            probe_durations: true,
        }
    }

    /// Skip ffprobe; durations stay 0 until playback reports them.
    pub fn without_probe(mut self) -> Self {
        self.probe_durations = false;
        self
    }

    fn collect(&self, query: &AssetQuery) -> Vec<ScannedFile> {
        let mut found = Vec::new();

        for dir in &self.dirs {
            for entry in WalkDir::new(dir).follow_links(true) {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        log::debug!("Skipping unreadable entry under {}: {}", dir.display(), e);
                        continue;
                    }
                };
                if !entry.file_type().is_file() {
                    continue;
                }
                let Some(media_type) = media_type_for(entry.path()) else {
                    continue;
                };
                if !query.types.contains(&media_type) {
                    continue;
                }
                let created = entry.metadata().ok().and_then(|m| {
                    m.created()
                        .or_else(|_| m.modified())
                        .ok()
                        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
                        .map(|d| d.as_millis() as i64)
                });
                found.push((entry.into_path(), media_type, created));
            }
        }

        sort_and_truncate(&mut found, query.sort, query.limit);
        found
    }
}

/// A file found by the scan: path, type and creation time in epoch millis.
type ScannedFile = (PathBuf, MediaType, Option<i64>);

/// Order scanned files by creation time and keep the first `limit`.
///
/// Duplicate paths are dropped. Ties keep path order, and files without a
/// timestamp go last whichever way the list is sorted.
fn sort_and_truncate(found: &mut Vec<ScannedFile>, sort: SortOrder, limit: usize) {
    found.sort_by(|a, b| a.0.cmp(&b.0));
    found.dedup_by(|a, b| a.0 == b.0);
    found.sort_by(|a, b| match (a.2, b.2) {
        (Some(x), Some(y)) => match sort {
            SortOrder::CreationTimeDesc => y.cmp(&x),
            SortOrder::CreationTimeAsc => x.cmp(&y),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    found.truncate(limit);
}

impl AssetSource for FolderSource {
    fn list_assets(&self, query: &AssetQuery) -> MediaResult<Vec<AssetRecord>> {
        let records = self
            .collect(query)
            .into_iter()
            .map(|(path, media_type, creation_time)| {
                let duration_ms = if self.probe_durations {
                    match crate::ffmpeg::probe_file(&path) {
                        Ok(info) => info.duration_ms(),
                        Err(e) => {
                            log::debug!("Could not probe {}: {}", path.display(), e);
                            0
                        }
                    }
                } else {
                    0
                };
                let uri = path.to_string_lossy().to_string();
                AssetRecord {
                    id: uri.clone(),
                    uri,
                    filename: path
                        .file_name()
                        .map(|s| s.to_string_lossy().to_string())
                        .unwrap_or_else(|| "Unknown".to_string()),
                    media_type,
                    duration_ms,
                    creation_time,
                }
            })
            .collect();

        Ok(records)
    }
}
