//! Projection-side mirrored state

use crate::router::DispatchRouter;
use lectern_core::{
    AppMessage, BibleContent, MediaControlData, MediaState, ProjectionView, SystemEvent,
    TimerState,
};
use serde::Serialize;
use tracing::debug;

/// Everything the projection window renders from
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MirrorState {
    pub view: ProjectionView,
    pub content_visible: bool,
    pub theme: Option<String>,
    pub locale: Option<String>,
    pub timer: Option<TimerState>,
    pub media: Option<MediaState>,

    /// Most recent transient media intent
    pub media_control: Option<MediaControlData>,

    pub bible: Option<BibleContent>,
    pub font_size: Option<u32>,
    pub last_system_event: Option<SystemEvent>,
}

impl Default for MirrorState {
    fn default() -> Self {
        Self {
            view: ProjectionView::Blank,
            content_visible: true,
            theme: None,
            locale: None,
            timer: None,
            media: None,
            media_control: None,
            bible: None,
            font_size: None,
            last_system_event: None,
        }
    }
}

/// A projection window's receiving end: router plus mirrored state
#[derive(Default)]
pub struct ProjectionMirror {
    router: DispatchRouter,
    state: MirrorState,
}

impl ProjectionMirror {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_router(router: DispatchRouter) -> Self {
        Self {
            router,
            state: MirrorState::default(),
        }
    }

    /// Route one message; returns whether a handler claimed it
    pub fn dispatch(&mut self, message: &AppMessage) -> bool {
        self.router.dispatch(message, &mut self.state).is_some()
    }

    /// Parse and route one raw frame
    ///
    /// Frames that do not parse, including unknown message types, are
    /// dropped.
    pub fn dispatch_json(&mut self, raw: &str) -> bool {
        match serde_json::from_str::<AppMessage>(raw) {
            Ok(message) => self.dispatch(&message),
            Err(e) => {
                debug!(error = %e, "Dropping unparsable projection frame");
                false
            }
        }
    }

    pub fn state(&self) -> &MirrorState {
        &self.state
    }

    pub fn router(&self) -> &DispatchRouter {
        &self.router
    }
}
