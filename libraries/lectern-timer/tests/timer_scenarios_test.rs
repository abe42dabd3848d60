//! Timer state machine scenarios
//!
//! Drives the machine with a manual clock through full countdown runs.

use lectern_core::{ManualClock, RunState, TimerCommand, TimerMode};
use lectern_timer::{TimerConfig, TimerEvent, TimerMachine};
use std::sync::Arc;

const T0: i64 = 1_700_000_000_000;

fn machine() -> (TimerMachine, ManualClock) {
    let clock = ManualClock::new(T0);
    let machine = TimerMachine::new(Arc::new(clock.clone()), TimerConfig::default());
    (machine, clock)
}

fn count_ticks(events: &[TimerEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, TimerEvent::Tick(_)))
        .count()
}

// ===== Countdown =====

#[test]
fn ten_minute_countdown_runs_to_zero() {
    let (mut timer, clock) = machine();

    timer.handle_command(TimerCommand::SetDuration {
        duration: Some(600),
    });
    timer.handle_command(TimerCommand::Start);

    clock.advance(599_000);
    timer.tick();
    assert_eq!(timer.state().remaining_time, 1);
    assert_eq!(timer.state().state, RunState::Running);

    clock.advance(1_000);
    timer.tick();
    assert_eq!(timer.state().remaining_time, 0);
    assert_eq!(timer.state().state, RunState::Stopped);
    assert_eq!(timer.target_end_time(), None);
}

#[test]
fn add_time_while_running_raises_duration() {
    let (mut timer, clock) = machine();

    timer.handle_command(TimerCommand::Start);
    clock.advance(180_000);
    timer.tick();
    assert_eq!(timer.state().remaining_time, 120);
    assert_eq!(timer.state().timer_duration, 300);

    timer.handle_command(TimerCommand::AddTime {
        seconds: Some(250),
    });
    assert_eq!(timer.state().remaining_time, 370);
    assert_eq!(timer.state().timer_duration, 370);

    // The deadline moved with it
    clock.advance(369_000);
    timer.tick();
    assert_eq!(timer.state().remaining_time, 1);
    assert!(timer.state().progress() <= 1.0);
}

#[test]
fn completion_emits_full_snapshot() {
    let (mut timer, clock) = machine();
    timer.handle_command(TimerCommand::SetDuration { duration: Some(2) });
    timer.handle_command(TimerCommand::Start);
    timer.drain_events();

    clock.advance(2_000);
    timer.tick();

    match timer.drain_events().as_slice() {
        [TimerEvent::StateChanged(state)] => {
            assert_eq!(state.state, RunState::Stopped);
            assert_eq!(state.remaining_time, 0);
        }
        other => panic!("expected one snapshot, got {other:?}"),
    }
}

#[test]
fn zero_duration_finishes_on_first_tick() {
    let (mut timer, _) = machine();
    timer.handle_command(TimerCommand::SetDuration { duration: Some(0) });
    timer.handle_command(TimerCommand::Start);
    timer.tick();

    assert_eq!(timer.state().state, RunState::Stopped);
}

#[test]
fn clock_only_mode_runs_without_deadline() {
    let (mut timer, clock) = machine();
    timer.handle_command(TimerCommand::SetMode {
        mode: Some(TimerMode::Clock),
    });
    timer.handle_command(TimerCommand::Start);

    clock.advance(3_600_000);
    timer.tick();
    assert_eq!(timer.state().state, RunState::Running);
    assert_eq!(timer.state().current_time, T0 + 3_600_000);
    assert_eq!(timer.state().start_time, Some(T0));
}

// ===== Broadcast Resolution =====

#[test]
fn ticks_broadcast_once_per_displayed_second() {
    let (mut timer, clock) = machine();
    timer.handle_command(TimerCommand::Start);
    timer.drain_events();

    for _ in 0..100 {
        clock.advance(100);
        timer.tick();
    }

    assert_eq!(count_ticks(&timer.drain_events()), 10);
    assert_eq!(timer.state().remaining_time, 290);
}

#[test]
fn idle_timer_still_ticks_for_the_wall_clock() {
    let (mut timer, clock) = machine();
    timer.drain_events();

    // Repeated ticks within the same second say nothing new
    for _ in 0..9 {
        clock.advance(100);
        timer.tick();
    }
    assert_eq!(count_ticks(&timer.drain_events()), 0);

    clock.advance(100);
    timer.tick();
    assert_eq!(count_ticks(&timer.drain_events()), 1);
}

#[test]
fn running_stopwatch_ticks_continuously() {
    let (mut timer, clock) = machine();
    timer.handle_command(TimerCommand::StopwatchStart);
    timer.drain_events();

    for _ in 0..20 {
        clock.advance(100);
        timer.tick();
    }

    let events = timer.drain_events();
    assert_eq!(count_ticks(&events), 20);
    match events.last() {
        Some(TimerEvent::Tick(tick)) => assert_eq!(tick.stopwatch_elapsed_time, 2_000),
        other => panic!("expected tick, got {other:?}"),
    }
}

#[test]
fn tick_after_command_in_same_second_is_suppressed() {
    let (mut timer, clock) = machine();
    timer.handle_command(TimerCommand::Start);
    clock.advance(100);
    timer.tick();

    let events = timer.drain_events();
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], TimerEvent::StateChanged(_)));
}
