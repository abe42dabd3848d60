//! Broadcast channel names.
//! Shared by the control process (send side) and projection windows (receive side).

/// Full timer snapshot (`timer-settings-sync` payload)
pub const TIMER_UPDATE: &str = "timer:update";

/// Lightweight timer tick (`timer-tick` payload)
pub const TIMER_TICK: &str = "timer:tick";

/// Full media snapshot (`media-update` payload)
pub const MEDIA_UPDATE: &str = "media:update";

/// Message Manager traffic from the control window
pub const PROJECTION_MESSAGE: &str = "projection:message";
