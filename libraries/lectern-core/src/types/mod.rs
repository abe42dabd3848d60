mod bible;
mod media;
mod message;
mod timer;

pub use bible::{BibleContent, Verse};
pub use media::{MediaCommand, MediaItem, MediaKind, MediaState, Pan, MAX_ZOOM, MIN_ZOOM};
pub use message::{
    AppMessage, ContentToggleData, FontSizeData, LocaleData, MediaControlData, MessageType,
    ProjectionView, SystemData, SystemEvent, ThemeData, ViewChangeData,
};
pub use timer::{
    RunState, TimerCommand, TimerMode, TimerSeed, TimerState, TimerTick,
    DEFAULT_TIMER_DURATION_SECS, DEFAULT_TIMEZONE,
};
