/// Shared application state
use crate::{
    config::ConsoleConfig,
    settings::{PersistedSettings, SettingsStore},
};
use lectern_core::{
    channels, AppMessage, Clock, ProjectionView, TimerCommand, Window, WindowId, WindowRegistry,
};
use lectern_media::MediaService;
use lectern_projection::{
    MessageManager, PostMessageBus, ProjectionTransport, RegistryTransport, ResyncSnapshot,
};
use lectern_timer::TimerService;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

const DEFAULT_LOCALE: &str = "en";
const DEFAULT_FONT_SIZE: u32 = 48;
const DEFAULT_THEME: &str = "dark";

/// What the control side last told the projection to show
///
/// Replayed as the non-timer part of every full resync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayState {
    pub view: ProjectionView,
    pub content_visible: bool,
    pub locale: String,
    pub font_size: u32,
    pub theme: String,
}

impl DisplayState {
    fn from_settings(settings: &PersistedSettings) -> Self {
        Self {
            view: ProjectionView::Blank,
            content_visible: true,
            locale: settings
                .locale
                .clone()
                .unwrap_or_else(|| DEFAULT_LOCALE.to_string()),
            font_size: settings.font_size.unwrap_or(DEFAULT_FONT_SIZE),
            theme: settings
                .theme
                .clone()
                .unwrap_or_else(|| DEFAULT_THEME.to_string()),
        }
    }

    /// Record `message` if it carries display state
    ///
    /// Returns `Some(persist)` when something changed; `persist` says whether
    /// the change belongs in the settings file.
    fn apply(&mut self, message: &AppMessage) -> Option<bool> {
        match message {
            AppMessage::ViewChange(data) => {
                self.view = data.view;
                Some(false)
            }
            AppMessage::ProjectionContentToggle(data) => {
                self.content_visible = data.visible;
                Some(false)
            }
            AppMessage::LocaleUpdate(data) => {
                self.locale = data.locale.clone();
                Some(true)
            }
            AppMessage::BibleFontSize(data) => {
                self.font_size = data.size;
                Some(true)
            }
            AppMessage::ThemeUpdate(data) => {
                self.theme = data.theme.clone();
                Some(true)
            }
            _ => None,
        }
    }
}

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ConsoleConfig>,
    pub timer: Arc<TimerService>,
    pub media: Arc<MediaService>,
    pub projection: MessageManager,
    pub projection_registry: WindowRegistry,

    /// Same-process fallback bus, stamped with `projection.origin`
    pub post_bus: PostMessageBus,

    pub settings: Arc<SettingsStore>,
    pub display: Arc<RwLock<DisplayState>>,
}

impl AppState {
    /// Build services and start the timer tick
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(
        config: ConsoleConfig,
        clock: Arc<dyn Clock>,
        store: SettingsStore,
        persisted: &PersistedSettings,
    ) -> Self {
        // One registry per state machine
        let timer = TimerService::spawn(
            config.timer_config(),
            clock,
            WindowRegistry::new(),
            config.tick_interval(),
        );
        let media = Arc::new(MediaService::new(WindowRegistry::new()));

        let projection_registry = WindowRegistry::new();
        let post_bus = PostMessageBus::default();
        let transport = ProjectionTransport::new(
            Some(Arc::new(RegistryTransport::new(projection_registry.clone()))),
            Arc::new(post_bus.transport(config.projection.origin.clone())),
        );
        let projection = MessageManager::new(Arc::new(transport), config.debounce());

        Self {
            config: Arc::new(config),
            timer,
            media,
            projection,
            projection_registry,
            post_bus,
            settings: Arc::new(store),
            display: Arc::new(RwLock::new(DisplayState::from_settings(persisted))),
        }
    }

    // ===== Windows =====

    /// Add a projection window to every broadcast set
    pub fn register_window(&self, window: Arc<dyn Window>) {
        self.timer.registry().register(Arc::clone(&window));
        self.media.registry().register(Arc::clone(&window));
        self.projection_registry.register(window);
    }

    /// Remove a closed projection window from every broadcast set
    pub fn unregister_window(&self, id: &WindowId) {
        self.timer.registry().unregister(id);
        self.media.registry().unregister(id);
        self.projection_registry.unregister(id);
    }

    /// Wait (bounded) for at least one projection window
    pub async fn ensure_projection_window(&self) -> bool {
        lectern_projection::ensure_projection_window(
            &self.projection_registry,
            self.config.window_ready_timeout(),
        )
        .await
    }

    // ===== Projection =====

    /// Send through the message manager, tracking display state
    pub async fn send_projection(&self, message: AppMessage, force: bool) {
        if matches!(&message, AppMessage::ProjectionContentToggle(data) if data.visible) {
            self.ensure_projection_window().await;
        }

        let persist = self.display.write().await.apply(&message);
        self.projection.send(message, force).await;

        if persist == Some(true) {
            self.persist_settings().await;
        }
    }

    /// Send several messages as one batch
    pub async fn send_projection_batch(&self, messages: Vec<AppMessage>, force: bool) {
        let mut persist = false;
        {
            let mut display = self.display.write().await;
            for message in &messages {
                persist |= display.apply(message) == Some(true);
            }
        }

        self.projection.send_batch(messages, force).await;

        if persist {
            self.persist_settings().await;
        }
    }

    /// Snapshot of everything a fresh projection window needs
    pub async fn resync_snapshot(&self) -> ResyncSnapshot {
        let display = self.display.read().await.clone();
        ResyncSnapshot {
            timer: self.timer.get_state().await,
            view: display.view,
            content_visible: display.content_visible,
            locale: display.locale,
            font_size: display.font_size,
            theme: display.theme,
        }
    }

    /// Full resync to every projection window
    pub async fn resync(&self) {
        let snapshot = self.resync_snapshot().await;
        self.projection.sync_all_states(&snapshot).await;
    }

    /// Full resync for a single, freshly loaded window
    ///
    /// Goes straight to the window rather than through the message manager,
    /// so other windows are not disturbed; media state rides along.
    pub async fn resync_window(&self, window: &dyn Window) {
        let snapshot = self.resync_snapshot().await;
        let media = AppMessage::MediaUpdate(self.media.get_state().await);

        for message in snapshot.to_messages() {
            if let Err(e) = window.send(channels::PROJECTION_MESSAGE, &message) {
                warn!(
                    operation = "window_resync",
                    window_id = %window.id(),
                    message_type = %message.message_type(),
                    error = %e,
                    "Resync send failed"
                );
                return;
            }
        }
        if let Err(e) = window.send(channels::MEDIA_UPDATE, &media) {
            warn!(operation = "window_resync", window_id = %window.id(), error = %e, "Resync send failed");
        }
    }

    // ===== Settings =====

    /// Seed the timer from persisted settings, if they hold any timer fields
    ///
    /// Returns whether the seed was applied. Without persisted timer settings
    /// the timer keeps its configured defaults and stays open for a seed over
    /// `POST /api/timer/initialize`.
    pub async fn seed_timer(&self, persisted: &PersistedSettings) -> lectern_timer::Result<bool> {
        if !persisted.has_timer_seed() {
            debug!("No persisted timer settings, leaving timer unseeded");
            return Ok(false);
        }
        self.timer.initialize(persisted.to_seed()).await?;
        Ok(true)
    }

    /// Apply a timer command, persisting baseline changes
    pub async fn timer_command(&self, command: TimerCommand) {
        let persist = matches!(
            command,
            TimerCommand::SetDuration { .. }
                | TimerCommand::AddTime { .. }
                | TimerCommand::RemoveTime { .. }
                | TimerCommand::SetMode { .. }
                | TimerCommand::SetTimezone { .. }
        );

        self.timer.command(command).await;

        if persist {
            self.persist_settings().await;
        }
    }

    /// Current settings document
    pub async fn current_settings(&self) -> PersistedSettings {
        let display = self.display.read().await.clone();
        let timer = self.timer.get_state().await;

        PersistedSettings {
            timer_duration: timer.as_ref().map(|t| t.original_duration),
            timer_mode: timer.as_ref().map(|t| t.mode),
            timezone: timer.map(|t| t.timezone),
            locale: Some(display.locale),
            font_size: Some(display.font_size),
            theme: Some(display.theme),
            updated_at: None,
        }
    }

    /// Best-effort settings write
    pub async fn persist_settings(&self) {
        let settings = self.current_settings().await;
        if let Err(e) = self.settings.save(&settings).await {
            warn!(
                operation = "persist_settings",
                path = %self.settings.path().display(),
                error = %e,
                "Failed to save settings"
            );
        }
    }
}
