use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum SplitEvent {
    Key(KeyEvent),
    Resize,
    /// Display refresh; carries no timing information.
    Tick,
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait EventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    fn recv_timeout(&self, timeout: Duration) -> Result<SplitEvent, RecvTimeoutError>;

    /// Block until an event arrives. `None` once the source is gone.
    fn recv(&self) -> Option<SplitEvent>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    rx: Receiver<SplitEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let forwarded = match event::read() {
                // Release/repeat events would double every action on some terminals
                Ok(CtEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                    tx.send(SplitEvent::Key(key))
                }
                Ok(CtEvent::Resize(_, _)) => tx.send(SplitEvent::Resize),
                Ok(_) => Ok(()),
                Err(_) => break,
            };
            if forwarded.is_err() {
                break;
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<SplitEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }

    fn recv(&self) -> Option<SplitEvent> {
        self.rx.recv().ok()
    }
}

/// Channel-backed event source for tests
pub struct TestEventSource {
    rx: Receiver<SplitEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<SplitEvent>) -> Self {
        Self { rx }
    }
}

impl EventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<SplitEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }

    fn recv(&self) -> Option<SplitEvent> {
        self.rx.recv().ok()
    }
}

/// Refresh period used while the display is live.
#[derive(Clone, Copy, Debug)]
pub struct Cadence {
    interval: Duration,
}

impl Cadence {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

/// Advances the application one event at a time
pub struct Runner<E: EventSource> {
    event_source: E,
    cadence: Cadence,
}

impl<E: EventSource> Runner<E> {
    pub fn new(event_source: E, cadence: Cadence) -> Self {
        Self {
            event_source,
            cadence,
        }
    }

    /// Next event. While `refresh_active`, a Tick is produced when no input
    /// arrives within the cadence. Otherwise this waits for input only, so no
    /// refresh fires while nothing is running. `None` when input is closed.
    pub fn step(&self, refresh_active: bool) -> Option<SplitEvent> {
        if refresh_active {
            match self.event_source.recv_timeout(self.cadence.interval()) {
                Ok(ev) => Some(ev),
                Err(RecvTimeoutError::Timeout) => Some(SplitEvent::Tick),
                Err(RecvTimeoutError::Disconnected) => None,
            }
        } else {
            self.event_source.recv()
        }
    }
}
