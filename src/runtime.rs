use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::session::InputEvent;

/// Interval at which idle sessions are polled for their time limit.
pub const TICK_RATE_MS: u64 = 100;

/// Raw terminal input as seen by the event loop, before key mapping.
#[derive(Clone, Debug)]
pub enum TermEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Anything the runner can pull terminal input from.
pub trait TermEventSource: Send + 'static {
    /// Wait at most `timeout`; `Err(Timeout)` means nothing arrived.
    fn recv_timeout(&self, timeout: Duration) -> Result<TermEvent, RecvTimeoutError>;
}

/// Reads crossterm events on a background thread and hands them over a channel.
pub struct CrosstermEventSource {
    rx: Receiver<TermEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let forwarded = match event::read() {
                // Windows reports releases too; only presses count as typing
                Ok(CtEvent::Key(key)) if key.kind != KeyEventKind::Release => {
                    tx.send(TermEvent::Key(key))
                }
                Ok(CtEvent::Resize(_, _)) => tx.send(TermEvent::Resize),
                Ok(_) => Ok(()),
                Err(err) => {
                    tracing::warn!(%err, "terminal event reader stopped");
                    break;
                }
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

impl TermEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<TermEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Decides how long the runner waits before reporting an idle tick.
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Default for FixedTicker {
    fn default() -> Self {
        Self::new(Duration::from_millis(TICK_RATE_MS))
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Channel-fed source for driving the loop without a terminal.
pub struct TestEventSource {
    rx: Receiver<TermEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<TermEvent>) -> Self {
        Self { rx }
    }
}

impl TermEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<TermEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Pulls one event per call from a source, bounded by the ticker.
pub struct Runner<E: TermEventSource, T: Ticker> {
    event_source: E,
    ticker: T,
}

impl<E: TermEventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
        }
    }

    /// Next event, or `Tick` once the interval passes with no input. A closed
    /// source keeps ticking so the time limit is still enforced.
    pub fn step(&self) -> TermEvent {
        match self.event_source.recv_timeout(self.ticker.interval()) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => TermEvent::Tick,
        }
    }
}

impl From<KeyEvent> for InputEvent {
    fn from(key: KeyEvent) -> Self {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);

        match key.code {
            KeyCode::Char('d') | KeyCode::Char('c') if ctrl => InputEvent::Quit,
            // ^W, and ^H which many terminals send for ctrl+backspace
            KeyCode::Char('w') | KeyCode::Char('h') if ctrl => InputEvent::DeleteWord,
            KeyCode::Backspace if ctrl || alt => InputEvent::DeleteWord,
            KeyCode::Esc => InputEvent::Quit,
            KeyCode::Backspace => InputEvent::DeleteChar,
            KeyCode::Char(' ') => InputEvent::Space,
            KeyCode::Char(_) if ctrl || alt => InputEvent::Ignored,
            KeyCode::Char(c) if c.is_control() || c.is_whitespace() => InputEvent::Ignored,
            KeyCode::Char(c) => InputEvent::Char(c),
            _ => InputEvent::Ignored,
        }
    }
}
