use serde::{Deserialize, Serialize};

use crate::utils::format_time;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Video,
    Audio,
}

impl MediaType {
    pub fn name(&self) -> &'static str {
        match self {
            MediaType::Video => "video",
            MediaType::Audio => "audio",
        }
    }
}

/// A single playable entry in the feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: String,
    pub uri: String,
    pub filename: String,
    pub media_type: MediaType,
    /// Nominal length. The live playback status is authoritative once known.
    pub duration_ms: u64,
    pub creation_time: Option<i64>,
}

impl MediaItem {
    pub fn is_video(&self) -> bool {
        self.media_type == MediaType::Video
    }

    pub fn is_audio(&self) -> bool {
        self.media_type == MediaType::Audio
    }

    pub fn is_remote(&self) -> bool {
        self.uri.starts_with("http://") || self.uri.starts_with("https://")
    }

    pub fn duration_string(&self) -> String {
        format_time(self.duration_ms)
    }
}

/// Category selected in the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MediaFilter {
    #[default]
    All,
    Video,
    Audio,
}

impl MediaFilter {
    pub fn all() -> &'static [MediaFilter] {
        &[MediaFilter::All, MediaFilter::Video, MediaFilter::Audio]
    }

    pub fn matches(&self, item: &MediaItem) -> bool {
        match self {
            MediaFilter::All => true,
            MediaFilter::Video => item.media_type == MediaType::Video,
            MediaFilter::Audio => item.media_type == MediaType::Audio,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            MediaFilter::All => "All media",
            MediaFilter::Video => "Videos",
            MediaFilter::Audio => "Music",
        }
    }

    pub fn empty_message(&self) -> &'static str {
        match self {
            MediaFilter::All => "No media files",
            MediaFilter::Video => "No videos",
            MediaFilter::Audio => "No audio files",
        }
    }
}

/// Ordered list of everything known for this screen activation.
///
/// Device items come first, sample items (if any) are appended after them.
/// A catalog is replaced wholesale on reload and never edited in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    items: Vec<MediaItem>,
}

impl Catalog {
    pub fn new(items: Vec<MediaItem>) -> Self {
        Self { items }
    }

    pub fn with_samples(mut device_items: Vec<MediaItem>) -> Self {
        device_items.extend(sample_media());
        Self::new(device_items)
    }

    pub fn samples() -> Self {
        Self::new(sample_media())
    }

    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn count(&self, filter: MediaFilter) -> usize {
        self.items.iter().filter(|item| filter.matches(item)).count()
    }
}

fn sample(id: &str, uri: &str, filename: &str, media_type: MediaType, secs: u64) -> MediaItem {
    MediaItem {
        id: id.to_string(),
        uri: uri.to_string(),
        filename: filename.to_string(),
        media_type,
        duration_ms: secs * 1000,
        creation_time: None,
    }
}

/// Built-in items used when the media folders are unavailable.
pub fn sample_media() -> Vec<MediaItem> {
    const BELL: &str = "https://www.soundjay.com/misc/sounds/bell-ringing-05.wav";

    vec![
        sample(
            "sample-1",
            "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/BigBuckBunny.mp4",
            "Big Buck Bunny",
            MediaType::Video,
            596,
        ),
        sample("sample-2", BELL, "Beautiful Music", MediaType::Audio, 180),
        sample(
            "sample-3",
            "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/ElephantsDream.mp4",
            "Elephants Dream",
            MediaType::Video,
            653,
        ),
        sample("sample-4", BELL, "Relaxing Sounds", MediaType::Audio, 240),
        sample(
            "sample-5",
            "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/ForBiggerBlazes.mp4",
            "For Bigger Blazes",
            MediaType::Video,
            15,
        ),
    ]
}

#[cfg(test)]
pub(crate) fn test_item(id: &str, media_type: MediaType) -> MediaItem {
    MediaItem {
        id: id.to_string(),
        uri: format!("/media/{}", id),
        filename: id.to_string(),
        media_type,
        duration_ms: 1000,
        creation_time: None,
    }
}
