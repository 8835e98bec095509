//! Per-event typing rules applied to an active [`Session`].
//!
//! The session decides *whether* an event is processed (quit, timeout,
//! finished); this module decides what the event does to the cursor and the
//! status grid.

use crate::layout::SEPARATOR;
use crate::session::{CellStatus, Cursor, InputEvent, Session};

/// Result of applying one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    Unchanged,
    Updated,
    /// The cursor ran past the last typeable cell.
    Completed,
}

pub(crate) fn apply(session: &mut Session, event: InputEvent) -> Step {
    match event {
        InputEvent::Quit | InputEvent::Ignored => Step::Unchanged,
        InputEvent::DeleteChar => delete_char(session),
        InputEvent::DeleteWord => delete_word(session),
        InputEvent::Space | InputEvent::Char(SEPARATOR) => space(session),
        InputEvent::Char(c) if c.is_control() || c.is_whitespace() => Step::Unchanged,
        InputEvent::Char(c) => write_char(session, c),
    }
}

fn write_char(session: &mut Session, c: char) -> Step {
    let Cursor { row, column } = session.cursor;
    let Some(expected) = session.target.get(row, column) else {
        return Step::Unchanged;
    };

    if c == expected {
        session.status.set(row, column, CellStatus::Correct);
        session.stats.correct_chars += 1;
        advance(session)
    } else if expected == SEPARATOR {
        // Extra letter past the end of a word: flag the boundary, keep it as
        // the next target.
        if session.status.get(row, column) == Some(CellStatus::Incorrect) {
            return Step::Unchanged;
        }
        session.status.set(row, column, CellStatus::Incorrect);
        Step::Updated
    } else {
        session.status.set(row, column, CellStatus::Incorrect);
        advance(session)
    }
}

fn space(session: &mut Session) -> Step {
    let Cursor { row, column } = session.cursor;
    let Some(expected) = session.target.get(row, column) else {
        return Step::Unchanged;
    };

    if expected == SEPARATOR {
        session.status.set(row, column, CellStatus::Correct);
        session.stats.correct_chars += 1;
        return advance(session);
    }

    // Early space: jump past the next separator, leaving skipped cells as
    // they are.
    let row_len = session.target.row_len(row);
    let boundary = session.target.rows()[row][column..]
        .iter()
        .position(|&c| c == SEPARATOR)
        .map_or(row_len - 1, |offset| column + offset);
    session.cursor.column = boundary;
    advance(session)
}

fn delete_char(session: &mut Session) -> Step {
    if clear_extra_letter(session) {
        return Step::Updated;
    }

    let Cursor { row, column } = session.cursor;
    if column == 0 {
        return Step::Unchanged;
    }

    session.status.set(row, column - 1, CellStatus::Untouched);
    session.cursor.column = column - 1;
    Step::Updated
}

fn delete_word(session: &mut Session) -> Step {
    let cleared = clear_extra_letter(session);

    let Cursor { row, mut column } = session.cursor;
    if column == 0 {
        return if cleared { Step::Updated } else { Step::Unchanged };
    }

    column -= 1;
    session.status.set(row, column, CellStatus::Untouched);
    while column > 0 && !session.target.is_separator(row, column - 1) {
        column -= 1;
        session.status.set(row, column, CellStatus::Untouched);
    }

    session.cursor.column = column;
    Step::Updated
}

/// Reset a separator flagged by an extra letter. Returns whether there was one.
fn clear_extra_letter(session: &mut Session) -> bool {
    let Cursor { row, column } = session.cursor;
    if session.status.get(row, column) == Some(CellStatus::Incorrect) {
        session.status.set(row, column, CellStatus::Untouched);
        return true;
    }
    false
}

/// Move one cell right, wrapping to the next row at the row boundary.
///
/// Content ends when the next row is empty or when the last row is
/// exhausted; the cursor then rests at the wrap target or at the end of the
/// last row.
fn advance(session: &mut Session) -> Step {
    let Cursor { row, column } = session.cursor;
    let row_len = session.target.row_len(row);

    if column + 1 < row_len {
        session.cursor.column = column + 1;
        return Step::Updated;
    }

    let next_row = row + 1;
    if next_row >= session.target.height() {
        session.cursor.column = row_len;
        return Step::Completed;
    }

    session.cursor = Cursor::new(next_row, 0);
    match session.target.get(next_row, 0) {
        Some(c) if c != SEPARATOR => Step::Updated,
        _ => Step::Completed,
    }
}
