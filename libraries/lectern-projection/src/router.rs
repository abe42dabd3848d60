//! Dispatch router
//!
//! Offers each incoming message to a fixed-priority chain of domain
//! handlers. The first handler that claims it stops the chain; a message
//! nobody claims is logged and dropped.

use crate::handlers::{BibleHandler, MediaHandler, ProjectionHandler, TimerHandler};
use crate::mirror::MirrorState;
use lectern_core::{AppMessage, MessageType};
use tracing::debug;

/// Consumer-side handler for one domain
pub trait MessageHandler: Send + Sync {
    /// Handler name for logs
    fn name(&self) -> &'static str;

    /// Message types this handler claims
    fn owns(&self) -> &'static [MessageType];

    /// Apply `message` to the mirror if owned; returns whether it was claimed
    fn handle(&self, message: &AppMessage, state: &mut MirrorState) -> bool;
}

/// Ordered handler chain
pub struct DispatchRouter {
    handlers: Vec<Box<dyn MessageHandler>>,
}

impl DispatchRouter {
    /// Router with no handlers
    pub fn empty() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Router with the projection, media, bible, and timer handlers, in
    /// that priority order
    pub fn new() -> Self {
        let mut router = Self::empty();
        router
            .add_handler(Box::new(ProjectionHandler))
            .add_handler(Box::new(MediaHandler))
            .add_handler(Box::new(BibleHandler))
            .add_handler(Box::new(TimerHandler));
        router
    }

    /// Append a handler at the lowest priority
    pub fn add_handler(&mut self, handler: Box<dyn MessageHandler>) -> &mut Self {
        self.handlers.push(handler);
        self
    }

    /// Offer `message` to each handler in turn
    ///
    /// Returns the name of the handler that claimed it.
    pub fn dispatch(&self, message: &AppMessage, state: &mut MirrorState) -> Option<&'static str> {
        for handler in &self.handlers {
            if handler.handle(message, state) {
                return Some(handler.name());
            }
        }

        debug!(
            message_type = %message.message_type(),
            "No handler claimed message, dropping"
        );
        None
    }

    /// Handler that owns `message_type`, if any
    pub fn owner_of(&self, message_type: MessageType) -> Option<&'static str> {
        self.handlers
            .iter()
            .find(|h| h.owns().contains(&message_type))
            .map(|h| h.name())
    }

    /// Handler names in priority order
    pub fn handler_names(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|h| h.name()).collect()
    }
}

impl Default for DispatchRouter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lectern_core::ProjectionView;

    struct Greedy;

    impl MessageHandler for Greedy {
        fn name(&self) -> &'static str {
            "greedy"
        }

        fn owns(&self) -> &'static [MessageType] {
            &[]
        }

        fn handle(&self, _message: &AppMessage, _state: &mut MirrorState) -> bool {
            true
        }
    }

    #[test]
    fn default_chain_order() {
        assert_eq!(
            DispatchRouter::new().handler_names(),
            vec!["projection", "media", "bible", "timer"]
        );
    }

    #[test]
    fn first_claim_stops_the_chain() {
        let mut router = DispatchRouter::empty();
        router
            .add_handler(Box::new(Greedy))
            .add_handler(Box::new(ProjectionHandler));

        let mut state = MirrorState::default();
        let claimed = router.dispatch(&AppMessage::view_change(ProjectionView::Bible), &mut state);

        assert_eq!(claimed, Some("greedy"));
        assert_eq!(state.view, ProjectionView::Blank);
    }

    #[test]
    fn empty_router_drops_everything() {
        let router = DispatchRouter::empty();
        let mut state = MirrorState::default();
        assert_eq!(router.dispatch(&AppMessage::theme("dark"), &mut state), None);
        assert_eq!(state, MirrorState::default());
    }
}
