use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
    Frame,
};
use std::time::Instant;
use t4::{
    layout::SEPARATOR,
    session::{CellStatus, Session, SessionOutcome},
};

use crate::{App, AppState};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

const QUIT_HINT: &str = "Press Control-D to exit :^D";

pub fn draw(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.state {
            AppState::Typing => render_typing(&self.session, area, buf),
            AppState::Results => render_results(self, area, buf),
        }
    }
}

struct Styles {
    untouched: Style,
    correct: Style,
    incorrect: Style,
    caret: Style,
}

impl Styles {
    fn new() -> Self {
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_bold_style = bold_style.add_modifier(Modifier::DIM);

        Self {
            untouched: dim_bold_style,
            correct: bold_style.fg(Color::Green),
            incorrect: bold_style.fg(Color::Red),
            caret: dim_bold_style.add_modifier(Modifier::UNDERLINED),
        }
    }
}

fn render_typing(session: &Session, area: Rect, buf: &mut Buffer) {
    let styles = Styles::new();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .split(area);

    let header = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Length(8)])
        .split(chunks[0]);

    Paragraph::new(Span::styled(QUIT_HINT, styles.untouched)).render(header[0], buf);

    let remaining = session.time_remaining(Instant::now());
    Paragraph::new(Span::styled(
        format!("{:.1}", remaining.as_secs_f64()),
        styles.untouched,
    ))
    .alignment(Alignment::Right)
    .render(header[1], buf);

    let grid_area = chunks[2];
    let first_row = first_visible_row(session.cursor().row, grid_area.height as usize);
    Paragraph::new(grid_lines(session, &styles, first_row)).render(grid_area, buf);
}

/// Top row of the grid window, scrolled so the caret row stays on screen.
fn first_visible_row(cursor_row: usize, visible_rows: usize) -> usize {
    cursor_row.saturating_sub(visible_rows.saturating_sub(1))
}

fn grid_lines(session: &Session, styles: &Styles, first_row: usize) -> Vec<Line<'static>> {
    let cursor = session.cursor();

    session
        .target()
        .rows()
        .iter()
        .zip(session.status().rows())
        .enumerate()
        .skip(first_row)
        .map(|(row, (chars, statuses))| {
            let spans = chars
                .iter()
                .zip(statuses)
                .enumerate()
                .map(|(column, (&c, &status))| {
                    let style = match status {
                        CellStatus::Untouched => styles.untouched,
                        CellStatus::Correct => styles.correct,
                        CellStatus::Incorrect => styles.incorrect,
                    };
                    let at_caret = cursor.row == row && cursor.column == column;
                    let style = if at_caret && !session.is_finished() {
                        style.patch(styles.caret)
                    } else {
                        style
                    };
                    let symbol = match (c, status) {
                        (SEPARATOR, CellStatus::Incorrect) => "·".to_owned(),
                        _ => c.to_string(),
                    };
                    Span::styled(symbol, style)
                })
                .collect::<Vec<Span>>();
            Line::from(spans)
        })
        .collect()
}

fn render_results(app: &App, area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(1), // outcome
            Constraint::Length(1), // wpm
            Constraint::Length(1), // details
            Constraint::Min(0),
            Constraint::Length(1), // legend
        ])
        .split(area);

    let Some(report) = app.session.report() else {
        return;
    };

    let headline = match report.outcome {
        SessionOutcome::Completed => "text complete",
        SessionOutcome::TimedOut => "time is up",
        SessionOutcome::QuitRequested => "session ended",
    };

    Paragraph::new(Span::styled(headline, italic_style))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

    Paragraph::new(Span::styled(
        format!("{:.1} wpm", report.wpm),
        bold_style.fg(Color::Green),
    ))
    .alignment(Alignment::Center)
    .render(chunks[2], buf);

    Paragraph::new(Span::styled(
        format!(
            "{:.1}s   {} correct chars   seed {}",
            report.elapsed_secs, report.correct_chars, app.seed
        ),
        bold_style,
    ))
    .alignment(Alignment::Center)
    .render(chunks[3], buf);

    Paragraph::new(Span::styled("(r)etry / (n)ew / (esc)ape", italic_style)).render(chunks[5], buf);
}
