//! Cross-process message contract
//!
//! `AppMessage` is the only thing that crosses the process boundary. Every
//! variant carries a full, self-describing snapshot for its domain (except the
//! timer tick, whose receiver already holds a superset from the last sync), so
//! late or duplicated messages are harmless.
//!
//! Wire shape: `{ "type": "<kebab-case>", "data": { ... } }`.

use super::{BibleContent, MediaState, TimerState, TimerTick};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What the projection display is currently showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectionView {
    #[default]
    Blank,
    Bible,
    Media,
    Timer,
}

/// Window and process lifecycle notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SystemEvent {
    WindowCreated,
    WindowClosed,
    FinishedLoading,
    ResyncRequest,
    Shutdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewChangeData {
    pub view: ProjectionView,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontSizeData {
    pub size: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeData {
    pub theme: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleData {
    pub locale: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentToggleData {
    pub visible: bool,
}

/// Transient media intent (seek, volume nudge, ...) keyed by `action`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaControlData {
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemData {
    pub event: SystemEvent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Typed cross-process message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "kebab-case")]
pub enum AppMessage {
    ViewChange(ViewChangeData),
    TimerTick(TimerTick),
    TimerSettingsSync(TimerState),
    BibleContentSync(BibleContent),
    BibleFontSize(FontSizeData),
    ThemeUpdate(ThemeData),
    LocaleUpdate(LocaleData),
    ProjectionContentToggle(ContentToggleData),
    MediaUpdate(MediaState),
    MediaControl(MediaControlData),
    System(SystemData),
}

/// Fieldless discriminant of `AppMessage`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    ViewChange,
    TimerTick,
    TimerSettingsSync,
    BibleContentSync,
    BibleFontSize,
    ThemeUpdate,
    LocaleUpdate,
    ProjectionContentToggle,
    MediaUpdate,
    MediaControl,
    System,
}

impl MessageType {
    /// Every message type, in declaration order
    pub const ALL: [MessageType; 11] = [
        Self::ViewChange,
        Self::TimerTick,
        Self::TimerSettingsSync,
        Self::BibleContentSync,
        Self::BibleFontSize,
        Self::ThemeUpdate,
        Self::LocaleUpdate,
        Self::ProjectionContentToggle,
        Self::MediaUpdate,
        Self::MediaControl,
        Self::System,
    ];

    /// Wire name (the `type` field)
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ViewChange => "view-change",
            Self::TimerTick => "timer-tick",
            Self::TimerSettingsSync => "timer-settings-sync",
            Self::BibleContentSync => "bible-content-sync",
            Self::BibleFontSize => "bible-font-size",
            Self::ThemeUpdate => "theme-update",
            Self::LocaleUpdate => "locale-update",
            Self::ProjectionContentToggle => "projection-content-toggle",
            Self::MediaUpdate => "media-update",
            Self::MediaControl => "media-control",
            Self::System => "system",
        }
    }

    /// Parse from wire name
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl AppMessage {
    pub fn message_type(&self) -> MessageType {
        match self {
            Self::ViewChange(_) => MessageType::ViewChange,
            Self::TimerTick(_) => MessageType::TimerTick,
            Self::TimerSettingsSync(_) => MessageType::TimerSettingsSync,
            Self::BibleContentSync(_) => MessageType::BibleContentSync,
            Self::BibleFontSize(_) => MessageType::BibleFontSize,
            Self::ThemeUpdate(_) => MessageType::ThemeUpdate,
            Self::LocaleUpdate(_) => MessageType::LocaleUpdate,
            Self::ProjectionContentToggle(_) => MessageType::ProjectionContentToggle,
            Self::MediaUpdate(_) => MessageType::MediaUpdate,
            Self::MediaControl(_) => MessageType::MediaControl,
            Self::System(_) => MessageType::System,
        }
    }

    /// `data.action`, for the variants that carry one
    pub fn action(&self) -> Option<&str> {
        match self {
            Self::MediaControl(data) => Some(data.action.as_str()),
            _ => None,
        }
    }

    /// Grouping identity for debouncing: `type` or `type:action`
    pub fn debounce_key(&self) -> String {
        match self.action() {
            Some(action) => format!("{}:{}", self.message_type(), action),
            None => self.message_type().as_str().to_string(),
        }
    }

    pub fn view_change(view: ProjectionView) -> Self {
        Self::ViewChange(ViewChangeData { view })
    }

    pub fn content_toggle(visible: bool) -> Self {
        Self::ProjectionContentToggle(ContentToggleData { visible })
    }

    pub fn locale(locale: impl Into<String>) -> Self {
        Self::LocaleUpdate(LocaleData {
            locale: locale.into(),
        })
    }

    pub fn theme(theme: impl Into<String>) -> Self {
        Self::ThemeUpdate(ThemeData {
            theme: theme.into(),
        })
    }

    pub fn font_size(size: u32) -> Self {
        Self::BibleFontSize(FontSizeData { size })
    }

    pub fn media_control(action: impl Into<String>, value: Option<serde_json::Value>) -> Self {
        Self::MediaControl(MediaControlData {
            action: action.into(),
            value,
        })
    }

    pub fn system(event: SystemEvent) -> Self {
        Self::System(SystemData {
            event,
            detail: None,
        })
    }
}
