use std::time::Duration;

use crate::session::SessionOutcome;

/// Characters that count as one word.
pub const CHARS_PER_WORD: f64 = 5.0;

/// Words per minute from correctly typed characters.
///
/// An instantaneous session scores zero instead of dividing by zero.
pub fn wpm(correct_chars: usize, elapsed_ms: u128) -> f64 {
    if elapsed_ms == 0 {
        return 0.0;
    }
    correct_chars as f64 * (60_000.0 / elapsed_ms as f64) / CHARS_PER_WORD
}

/// Final numbers of a finished session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionReport {
    pub outcome: SessionOutcome,
    pub elapsed_secs: f64,
    pub wpm: f64,
    pub correct_chars: usize,
}

impl SessionReport {
    pub fn new(outcome: SessionOutcome, elapsed: Duration, correct_chars: usize) -> Self {
        Self {
            outcome,
            elapsed_secs: elapsed.as_secs_f64(),
            wpm: wpm(correct_chars, elapsed.as_millis()),
            correct_chars,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifty_chars_in_a_minute_is_ten_wpm() {
        assert_eq!(wpm(50, 60_000), 10.0);
    }

    #[test]
    fn zero_elapsed_scores_zero() {
        assert_eq!(wpm(120, 0), 0.0);
    }

    #[test]
    fn no_correct_chars_scores_zero() {
        assert_eq!(wpm(0, 15_000), 0.0);
    }

    #[test]
    fn half_minute_doubles_rate() {
        assert_eq!(wpm(50, 30_000), 20.0);
    }

    #[test]
    fn report_uses_elapsed_duration() {
        let report = SessionReport::new(SessionOutcome::TimedOut, Duration::from_secs(15), 75);

        assert_eq!(report.elapsed_secs, 15.0);
        assert_eq!(report.wpm, 60.0);
        assert_eq!(report.correct_chars, 75);
        assert_eq!(report.outcome, SessionOutcome::TimedOut);
    }
}
