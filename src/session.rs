use std::time::{Duration, Instant};

use crate::layout::TargetBuffer;
use crate::scoring::SessionReport;
use crate::typing_policy::{self, Step};

/// Default time limit of a session.
pub const DEFAULT_TIME_LIMIT_SECS: u64 = 15;

/// Input vocabulary understood by the engine. Terminal keys are mapped onto
/// it by [`crate::runtime`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Char(char),
    Space,
    DeleteChar,
    DeleteWord,
    Quit,
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellStatus {
    #[default]
    Untouched,
    Correct,
    Incorrect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum SessionOutcome {
    #[strum(serialize = "quit")]
    QuitRequested,
    #[strum(serialize = "timeout")]
    TimedOut,
    #[strum(serialize = "completed")]
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Active,
    Finished(SessionOutcome),
}

/// What a call to [`Session::handle`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Unchanged,
    Updated,
    Finished(SessionOutcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    pub row: usize,
    pub column: usize,
}

impl Cursor {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

/// Per-cell typing status, shaped like the target it was created from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusGrid {
    cells: Vec<Vec<CellStatus>>,
}

impl StatusGrid {
    pub fn new(target: &TargetBuffer) -> Self {
        Self {
            cells: target
                .rows()
                .iter()
                .map(|row| vec![CellStatus::Untouched; row.len()])
                .collect(),
        }
    }

    pub fn get(&self, row: usize, column: usize) -> Option<CellStatus> {
        self.cells.get(row)?.get(column).copied()
    }

    pub fn rows(&self) -> &[Vec<CellStatus>] {
        &self.cells
    }

    pub fn count(&self, status: CellStatus) -> usize {
        self.cells.iter().flatten().filter(|s| **s == status).count()
    }

    pub(crate) fn set(&mut self, row: usize, column: usize, status: CellStatus) {
        if let Some(cell) = self.cells.get_mut(row).and_then(|r| r.get_mut(column)) {
            *cell = status;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionConfig {
    pub time_limit: Duration,
}

impl SessionConfig {
    pub fn from_secs(secs: u64) -> Self {
        Self {
            time_limit: Duration::from_secs(secs),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::from_secs(DEFAULT_TIME_LIMIT_SECS)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SessionStats {
    /// Matched characters and separators. Never decreases.
    pub correct_chars: usize,
    pub started_at: Option<Instant>,
    pub elapsed: Option<Duration>,
}

/// One typing test over a fixed target.
#[derive(Debug, Clone)]
pub struct Session {
    pub(crate) target: TargetBuffer,
    pub(crate) status: StatusGrid,
    pub(crate) cursor: Cursor,
    pub(crate) stats: SessionStats,
    config: SessionConfig,
    state: SessionState,
}

impl Session {
    pub fn new(target: TargetBuffer, config: SessionConfig) -> Self {
        let status = StatusGrid::new(&target);
        Self {
            target,
            status,
            cursor: Cursor::default(),
            stats: SessionStats::default(),
            config,
            state: SessionState::Active,
        }
    }

    /// Feed one input event. `elapsed` is the time since [`Session::start`].
    ///
    /// Quit wins over everything, then the time limit, then the typing
    /// rules. A finished session ignores every further event.
    pub fn handle(&mut self, event: InputEvent, elapsed: Duration) -> Transition {
        if self.is_finished() {
            return Transition::Unchanged;
        }

        if event == InputEvent::Quit {
            return self.finish(SessionOutcome::QuitRequested, elapsed);
        }

        if elapsed > self.config.time_limit {
            return self.finish(SessionOutcome::TimedOut, elapsed);
        }

        match typing_policy::apply(self, event) {
            Step::Unchanged => Transition::Unchanged,
            Step::Updated => Transition::Updated,
            Step::Completed => self.finish(SessionOutcome::Completed, elapsed),
        }
    }

    /// Timeout check without an input event, for idle ticks.
    pub fn poll(&mut self, elapsed: Duration) -> Transition {
        if !self.is_finished() && elapsed > self.config.time_limit {
            return self.finish(SessionOutcome::TimedOut, elapsed);
        }
        Transition::Unchanged
    }

    /// Start the clock. Later calls keep the first instant.
    pub fn start(&mut self, now: Instant) {
        self.stats.started_at.get_or_insert(now);
    }

    pub fn has_started(&self) -> bool {
        self.stats.started_at.is_some()
    }

    pub fn elapsed_at(&self, now: Instant) -> Duration {
        self.stats
            .started_at
            .map(|started| now.saturating_duration_since(started))
            .unwrap_or_default()
    }

    pub fn time_remaining(&self, now: Instant) -> Duration {
        match self.stats.elapsed {
            Some(elapsed) => self.config.time_limit.saturating_sub(elapsed),
            None => self.config.time_limit.saturating_sub(self.elapsed_at(now)),
        }
    }

    fn finish(&mut self, outcome: SessionOutcome, elapsed: Duration) -> Transition {
        self.state = SessionState::Finished(outcome);
        self.stats.elapsed = Some(elapsed);
        tracing::debug!(
            %outcome,
            correct_chars = self.stats.correct_chars,
            elapsed_ms = elapsed.as_millis() as u64,
            "session finished"
        );
        Transition::Finished(outcome)
    }

    pub fn report(&self) -> Option<SessionReport> {
        let outcome = self.outcome()?;
        let elapsed = self.stats.elapsed.unwrap_or_default();
        Some(SessionReport::new(outcome, elapsed, self.stats.correct_chars))
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn outcome(&self) -> Option<SessionOutcome> {
        match self.state {
            SessionState::Finished(outcome) => Some(outcome),
            SessionState::Active => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.state, SessionState::Finished(_))
    }

    pub fn target(&self) -> &TargetBuffer {
        &self.target
    }

    pub fn status(&self) -> &StatusGrid {
        &self.status
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn correct_chars(&self) -> usize {
        self.stats.correct_chars
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Character under the cursor, `None` once the text is exhausted.
    pub fn expected_char(&self) -> Option<char> {
        self.target.get(self.cursor.row, self.cursor.column)
    }
}
