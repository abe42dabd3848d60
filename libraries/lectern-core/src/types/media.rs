/// Media playlist and viewport types
use serde::{Deserialize, Serialize};

/// Lower zoom bound
pub const MIN_ZOOM: f64 = 0.1;

/// Upper zoom bound
pub const MAX_ZOOM: f64 = 5.0;

/// Kind of playable item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Audio,
    Image,
    Pdf,
}

/// One entry in the projection playlist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub id: String,

    /// Local file path or URL the projection view loads
    pub path: String,

    /// Display name
    pub name: String,

    pub kind: MediaKind,

    /// Duration in seconds, when known
    #[serde(default)]
    pub duration: Option<f64>,
}

/// Viewport pan offset
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pan {
    pub x: f64,
    pub y: f64,
}

/// Full media snapshot
///
/// `current_index` is always in `[-1, playlist.len() - 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaState {
    pub playlist: Vec<MediaItem>,

    /// Index into the playlist, -1 when empty
    pub current_index: i64,

    pub is_playing: bool,

    /// Clamped to `[MIN_ZOOM, MAX_ZOOM]`
    pub zoom_level: f64,

    pub pan: Pan,

    /// Clamped to `[0.0, 1.0]`
    pub volume: f64,

    /// 1-based PDF page
    pub pdf_page: u32,

    pub show_grid: bool,

    /// Bumped on stop so a bound view rewinds
    pub restart_trigger: u64,

    /// Playback position in seconds
    pub current_time: f64,

    /// Monotonic broadcast revision; mirrors drop anything older
    pub revision: u64,
}

impl Default for MediaState {
    fn default() -> Self {
        Self {
            playlist: Vec::new(),
            current_index: -1,
            is_playing: false,
            zoom_level: 1.0,
            pan: Pan::default(),
            volume: 1.0,
            pdf_page: 1,
            show_grid: false,
            restart_trigger: 0,
            current_time: 0.0,
            revision: 0,
        }
    }
}

impl MediaState {
    /// Item under `current_index`, if any
    pub fn current_item(&self) -> Option<&MediaItem> {
        usize::try_from(self.current_index)
            .ok()
            .and_then(|i| self.playlist.get(i))
    }
}

/// Commands accepted by the media state machine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MediaCommand {
    #[serde(rename_all = "camelCase")]
    SetPlaylist {
        items: Vec<MediaItem>,
        #[serde(default)]
        start_index: Option<i64>,
    },
    Play,
    Pause,
    Stop,
    Next,
    Prev,
    Jump {
        #[serde(default)]
        index: Option<i64>,
    },
    Seek {
        #[serde(default)]
        time: Option<f64>,
    },
    SetZoom {
        #[serde(default)]
        level: Option<f64>,
    },
    SetPan {
        #[serde(default)]
        x: Option<f64>,
        #[serde(default)]
        y: Option<f64>,
    },
    SetPdfPage {
        #[serde(default)]
        page: Option<u32>,
    },
    SetVolume {
        #[serde(default)]
        volume: Option<f64>,
    },
    ToggleGrid,
    Exit,
}

impl MediaCommand {
    /// Command name as it appears on the wire
    pub fn name(&self) -> &'static str {
        match self {
            Self::SetPlaylist { .. } => "setPlaylist",
            Self::Play => "play",
            Self::Pause => "pause",
            Self::Stop => "stop",
            Self::Next => "next",
            Self::Prev => "prev",
            Self::Jump { .. } => "jump",
            Self::Seek { .. } => "seek",
            Self::SetZoom { .. } => "setZoom",
            Self::SetPan { .. } => "setPan",
            Self::SetPdfPage { .. } => "setPdfPage",
            Self::SetVolume { .. } => "setVolume",
            Self::ToggleGrid => "toggleGrid",
            Self::Exit => "exit",
        }
    }
}
