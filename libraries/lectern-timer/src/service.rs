//! Timer service
//!
//! Wraps a [`TimerMachine`] behind an async mutex, runs the fixed-period
//! internal tick, and fans every queued event out to the registered windows
//! and to in-process subscribers.

use crate::{
    error::{Result, TimerError},
    events::TimerEvent,
    machine::{TimerConfig, TimerMachine},
};
use lectern_core::{Clock, TimerCommand, TimerSeed, TimerState, WindowRegistry};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError};
use std::time::Duration;
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Internal tick resolution
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(100);

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Authoritative timer owned by the control process
pub struct TimerService {
    machine: Mutex<TimerMachine>,
    registry: WindowRegistry,
    events_tx: broadcast::Sender<TimerEvent>,
    tick_interval: Duration,

    /// Set once the tick loop has been registered; never cleared
    started: AtomicBool,
    initialized: AtomicBool,
    closed: AtomicBool,
    tick_task: std::sync::Mutex<Option<JoinHandle<()>>>,
}

impl TimerService {
    /// Create the service without starting the tick loop
    pub fn new(
        config: TimerConfig,
        clock: Arc<dyn Clock>,
        registry: WindowRegistry,
        tick_interval: Duration,
    ) -> Arc<Self> {
        let (events_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Arc::new(Self {
            machine: Mutex::new(TimerMachine::new(clock, config)),
            registry,
            events_tx,
            tick_interval,
            started: AtomicBool::new(false),
            initialized: AtomicBool::new(false),
            closed: AtomicBool::new(false),
            tick_task: std::sync::Mutex::new(None),
        })
    }

    /// Create the service and start ticking
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(
        config: TimerConfig,
        clock: Arc<dyn Clock>,
        registry: WindowRegistry,
        tick_interval: Duration,
    ) -> Arc<Self> {
        let service = Self::new(config, clock, registry, tick_interval);
        service.start_ticking();
        service
    }

    /// Register the internal tick loop
    ///
    /// Returns `false` (and does nothing) if the loop was already started.
    pub fn start_ticking(self: &Arc<Self>) -> bool {
        if self.started.swap(true, Ordering::SeqCst) {
            warn!("Timer tick loop already started, ignoring");
            return false;
        }

        let period = self.tick_interval;
        let weak = Arc::downgrade(self);
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                interval.tick().await;
                let Some(service) = weak.upgrade() else {
                    break;
                };
                service.tick().await;
            }
            debug!("Timer tick loop exited");
        });

        *self
            .tick_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(handle);

        info!(tick_ms = period.as_millis() as u64, "Timer tick loop started");
        true
    }

    // ===== IPC Surface =====

    /// Apply a command (fire-and-forget)
    pub async fn command(&self, command: TimerCommand) {
        if self.closed.load(Ordering::SeqCst) {
            debug!(command = command.name(), "Timer service closed, dropping command");
            return;
        }

        let mut machine = self.machine.lock().await;
        machine.handle_command(command);
        self.publish(machine.drain_events());
    }

    /// Parse and apply a loosely-typed command
    ///
    /// Unknown command names are logged and ignored.
    pub async fn command_json(&self, value: serde_json::Value) {
        match parse_command(value) {
            Ok(command) => self.command(command).await,
            Err(e) => warn!(operation = "timer_command", error = %e, "Ignoring timer command"),
        }
    }

    /// Current snapshot, or `None` once the service has been shut down
    pub async fn get_state(&self) -> Option<TimerState> {
        if self.closed.load(Ordering::SeqCst) {
            return None;
        }
        Some(self.machine.lock().await.state().clone())
    }

    /// Subscribe to snapshots and ticks
    pub fn subscribe(&self) -> broadcast::Receiver<TimerEvent> {
        self.events_tx.subscribe()
    }

    /// Seed from persisted settings
    ///
    /// Only the first call takes effect.
    pub async fn initialize(&self, seed: TimerSeed) -> Result<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(TimerError::ShutDown);
        }
        if self.initialized.swap(true, Ordering::SeqCst) {
            warn!("Timer already initialized, ignoring seed");
            return Err(TimerError::AlreadyInitialized);
        }

        let mut machine = self.machine.lock().await;
        machine.apply_seed(seed);
        info!(
            mode = %machine.state().mode,
            duration = machine.state().original_duration,
            timezone = %machine.state().timezone,
            "Timer initialized"
        );
        self.publish(machine.drain_events());
        Ok(())
    }

    /// Run one internal tick
    pub async fn tick(&self) {
        let mut machine = self.machine.lock().await;
        machine.tick();
        self.publish(machine.drain_events());
    }

    /// Stop the tick loop; later commands are dropped
    pub fn shutdown(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        if let Some(handle) = self
            .tick_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            handle.abort();
        }
        info!("Timer service shut down");
    }

    /// Broadcast targets for this machine
    pub fn registry(&self) -> &WindowRegistry {
        &self.registry
    }

    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    /// Publish while the machine lock is held so revisions leave in order
    fn publish(&self, events: Vec<TimerEvent>) {
        for event in events {
            self.registry.broadcast(event.channel(), &event.to_message());
            // No in-process subscribers is fine
            let _ = self.events_tx.send(event);
        }
    }
}

impl Drop for TimerService {
    fn drop(&mut self) {
        if let Some(handle) = self
            .tick_task
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            handle.abort();
        }
    }
}

/// Parse a wire command
pub fn parse_command(value: serde_json::Value) -> Result<TimerCommand> {
    Ok(serde_json::from_value(value)?)
}
