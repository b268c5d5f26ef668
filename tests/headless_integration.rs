use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use splitr::app::{App, AppState, Prompt};
use splitr::clock::ManualClock;
use splitr::config::Config;
use splitr::history::AttemptLog;
use splitr::runtime::{Cadence, Runner, SplitEvent, TestEventSource};
use splitr::storage::{CategoryStore, MemoryGateway};
use splitr::{Category, TimerPhase};

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn headless_app(categories: Vec<Category>) -> (App, ManualClock, MemoryGateway) {
    let gateway = MemoryGateway::new(categories);
    let store = CategoryStore::open(gateway.clone()).unwrap();
    let clock = ManualClock::new();
    let app = App::with_clock(store, Config::default(), clock.clone());
    (app, clock, gateway)
}

// Headless flow through the Runner/TestEventSource without a TTY:
// open a category, run it to the end, reset and accept both prompts.
#[test]
fn headless_full_run_saves_personal_best() {
    let (mut app, clock, gateway) = headless_app(vec![Category::new("Any%", &["A", "B"])]);

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        Cadence::new(Duration::from_millis(5)),
    );

    app.handle_key(key(KeyCode::Enter));
    assert_eq!(app.state, AppState::Timer);

    tx.send(SplitEvent::Key(key(KeyCode::Char(' ')))).unwrap();
    let ev = runner.step(app.refresh_active()).unwrap();
    if let SplitEvent::Key(k) = ev {
        app.handle_key(k);
    }
    assert!(app.refresh_active());

    // Ticks only refresh the display; time comes from the clock
    clock.advance_ms(10_000);
    assert!(matches!(runner.step(true), Some(SplitEvent::Tick)));
    app.on_tick();
    assert_eq!(app.displayed_elapsed(), 10_000);

    app.handle_key(key(KeyCode::Char(' ')));
    clock.advance_ms(15_000);
    app.handle_key(key(KeyCode::Char(' ')));

    assert_eq!(app.controller.phase(), TimerPhase::Finished);
    assert!(!app.refresh_active());
    let run = app.controller.run().unwrap();
    assert_eq!(run.segments()[0].split_time, Some(10_000));
    assert_eq!(run.segments()[0].segment_time, Some(10_000));
    assert_eq!(run.segments()[1].split_time, Some(25_000));
    assert_eq!(run.segments()[1].segment_time, Some(15_000));

    app.handle_key(key(KeyCode::Char('r')));
    assert_eq!(
        app.prompt.as_ref().map(Prompt::text),
        Some("Do you want to save the new personal best?")
    );
    app.handle_key(key(KeyCode::Char('y')));
    assert_eq!(
        app.prompt.as_ref().map(Prompt::text),
        Some("Do you want to save the new best segments?")
    );
    app.handle_key(key(KeyCode::Char('y')));
    assert_eq!(app.prompt, None);

    let saved = gateway.snapshot();
    let segments = &saved[0].segments;
    assert_eq!(segments[0].split_time, Some(10_000));
    assert_eq!(segments[0].best_time, Some(10_000));
    assert_eq!(segments[1].split_time, Some(25_000));
    assert_eq!(segments[1].segment_time, Some(15_000));
    assert_eq!(app.controller.phase(), TimerPhase::Idle);
    assert_eq!(app.displayed_elapsed(), 0);
}

#[test]
fn headless_declined_prompts_leave_baseline() {
    let (mut app, clock, gateway) = headless_app(vec![Category::new("Any%", &["A", "B", "C"])]);
    app.open_timer(0);
    app.handle_key(key(KeyCode::Char(' ')));
    clock.advance_ms(3_000);
    app.handle_key(key(KeyCode::Char(' ')));

    // Abandoned after one segment: only the golds question is asked
    app.handle_key(key(KeyCode::Esc));
    assert_eq!(
        app.prompt.as_ref().map(Prompt::text),
        Some("Do you want to save the new best segments?")
    );
    app.handle_key(key(KeyCode::Char('n')));

    assert_eq!(app.state, AppState::Categories);
    assert_eq!(gateway.save_count(), 0);
    assert_eq!(gateway.snapshot()[0], Category::new("Any%", &["A", "B", "C"]));
}

#[test]
fn headless_timer_keys_ignored_during_prompt() {
    let (mut app, clock, _) = headless_app(vec![Category::new("Any%", &["A", "B"])]);
    app.open_timer(0);
    app.handle_key(key(KeyCode::Char(' ')));
    clock.advance_ms(1_000);
    app.handle_key(key(KeyCode::Char(' ')));
    app.handle_key(key(KeyCode::Char('r')));
    assert!(app.prompt.is_some());

    app.handle_key(key(KeyCode::Char(' ')));
    app.handle_key(key(KeyCode::Left));
    assert_eq!(app.controller.run().unwrap().current_index(), 1);
}

#[test]
fn headless_undo_and_skip_flow() {
    let (mut app, clock, _) = headless_app(vec![Category::new("Any%", &["A", "B", "C"])]);
    app.open_timer(0);
    app.handle_key(key(KeyCode::Char(' ')));
    app.handle_key(key(KeyCode::Right));
    assert_eq!(app.controller.run().unwrap().current_index(), 1);
    assert_eq!(app.controller.phase(), TimerPhase::Running);

    clock.advance_ms(2_000);
    app.handle_key(key(KeyCode::Char(' ')));
    app.handle_key(key(KeyCode::Left));
    let run = app.controller.run().unwrap();
    assert_eq!(run.current_index(), 1);
    assert_eq!(run.segments()[1].split_time, None);

    // Final segment cannot be skipped
    app.handle_key(key(KeyCode::Right));
    app.handle_key(key(KeyCode::Right));
    assert_eq!(app.controller.run().unwrap().current_index(), 2);
}

#[test]
fn headless_attempts_are_logged() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("history.csv");
    let (app, clock, _) = headless_app(vec![Category::new("Any%", &["A", "B"])]);
    let mut app = app.with_history(AttemptLog::with_path(&log_path));

    app.open_timer(0);
    app.handle_key(key(KeyCode::Char('r')));
    assert!(!log_path.exists(), "untouched runs are not logged");

    app.handle_key(key(KeyCode::Char(' ')));
    clock.advance_ms(4_200);
    app.handle_key(key(KeyCode::Char(' ')));
    app.handle_key(key(KeyCode::Char('r')));
    app.handle_key(key(KeyCode::Char('n')));

    let rows = AttemptLog::with_path(&log_path).read_all().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(&rows[0][1], "Any%");
    assert_eq!(&rows[0][2], "1");
    assert_eq!(&rows[0][4], "");
}

#[test]
fn headless_create_category_through_form() {
    let (mut app, _, gateway) = headless_app(vec![]);
    app.handle_key(key(KeyCode::Char('n')));
    for c in "Glitchless".chars() {
        app.handle_key(key(KeyCode::Char(c)));
    }
    app.handle_key(key(KeyCode::Down));
    for c in "Tutorial".chars() {
        app.handle_key(key(KeyCode::Char(c)));
    }
    app.handle_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL));

    assert_eq!(app.state, AppState::Categories);
    assert_eq!(
        app.status.as_deref(),
        Some("The category was successfully created!")
    );
    assert_eq!(
        gateway.snapshot(),
        vec![Category::new("Glitchless", &["Tutorial"])]
    );
}

#[test]
fn headless_abandoned_attempt_after_personal_best() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("history.csv");
    let (app, clock, _) = headless_app(vec![Category::new("Any%", &["A", "B"])]);
    let mut app = app.with_history(AttemptLog::with_path(&log_path));

    app.open_timer(0);
    app.handle_key(key(KeyCode::Char(' ')));
    clock.advance_ms(10_000);
    app.handle_key(key(KeyCode::Char(' ')));
    clock.advance_ms(15_000);
    app.handle_key(key(KeyCode::Char(' ')));
    app.handle_key(key(KeyCode::Char('r')));
    app.handle_key(key(KeyCode::Char('y')));
    app.handle_key(key(KeyCode::Char('y')));

    // Second attempt stops after the first segment
    app.handle_key(key(KeyCode::Char(' ')));
    clock.advance_ms(8_000);
    app.handle_key(key(KeyCode::Char(' ')));
    app.handle_key(key(KeyCode::Char('r')));
    app.handle_key(key(KeyCode::Char('n')));

    let rows = AttemptLog::with_path(&log_path).read_all().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[0][2], "2");
    assert_eq!(&rows[0][4], "00:25.00");
    assert_eq!(&rows[1][2], "1");
    assert_eq!(&rows[1][4], "");
}
