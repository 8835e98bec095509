use std::time::Duration;

use proptest::prelude::*;
use t4::layout;
use t4::session::{InputEvent, Session, SessionConfig, SessionOutcome, Transition};
use t4::word_source::WordPool;

fn input_event() -> impl Strategy<Value = InputEvent> {
    prop_oneof![
        6 => proptest::char::range('a', 'z').prop_map(InputEvent::Char),
        2 => Just(InputEvent::Space),
        1 => Just(InputEvent::DeleteChar),
        1 => Just(InputEvent::DeleteWord),
        1 => Just(InputEvent::Ignored),
    ]
}

fn session_for(seed: u64, columns: usize, rows: usize) -> Session {
    let pool = WordPool::builtin().unwrap();
    let target = layout::build(pool.seeded(seed), columns, rows, None).unwrap();
    Session::new(target, SessionConfig::default())
}

proptest! {
    #[test]
    fn same_seed_builds_same_grid(seed in any::<u64>(), columns in 10usize..80, rows in 1usize..10) {
        let pool = WordPool::builtin().unwrap();

        let first = layout::build(pool.seeded(seed), columns, rows, None).unwrap();
        let second = layout::build(pool.seeded(seed), columns, rows, None).unwrap();

        prop_assert_eq!(&first, &second);
        prop_assert!(first.height() <= rows);
        prop_assert!(first.rows().iter().all(|row| row.len() <= columns));
    }

    #[test]
    fn replaying_events_is_deterministic(
        seed in any::<u64>(),
        columns in 10usize..80,
        rows in 1usize..10,
        events in proptest::collection::vec(input_event(), 0..200),
    ) {
        let mut first = session_for(seed, columns, rows);
        let mut second = session_for(seed, columns, rows);

        for &event in &events {
            let a = first.handle(event, Duration::ZERO);
            let b = second.handle(event, Duration::ZERO);
            prop_assert_eq!(a, b);
        }

        prop_assert_eq!(first.cursor(), second.cursor());
        prop_assert_eq!(first.status(), second.status());
        prop_assert_eq!(first.correct_chars(), second.correct_chars());
        prop_assert_eq!(first.state(), second.state());
    }

    #[test]
    fn counter_never_decreases_and_cursor_stays_on_grid(
        seed in any::<u64>(),
        columns in 10usize..80,
        rows in 1usize..10,
        events in proptest::collection::vec(input_event(), 0..200),
    ) {
        let mut session = session_for(seed, columns, rows);
        let mut last_count = 0;

        for event in events {
            session.handle(event, Duration::ZERO);

            let count = session.correct_chars();
            prop_assert!(count >= last_count);
            last_count = count;

            let cursor = session.cursor();
            prop_assert!(cursor.row < session.target().height());
            prop_assert!(cursor.column <= session.target().row_len(cursor.row));
        }
    }

    #[test]
    fn ignored_events_change_nothing(
        seed in any::<u64>(),
        columns in 10usize..80,
        rows in 1usize..10,
        events in proptest::collection::vec(input_event(), 0..50),
    ) {
        let mut session = session_for(seed, columns, rows);
        for event in events {
            session.handle(event, Duration::ZERO);
        }
        let cursor = session.cursor();
        let status = session.status().clone();
        let count = session.correct_chars();

        prop_assert_eq!(session.handle(InputEvent::Ignored, Duration::ZERO), Transition::Unchanged);
        prop_assert_eq!(session.cursor(), cursor);
        prop_assert_eq!(session.status(), &status);
        prop_assert_eq!(session.correct_chars(), count);
    }

    #[test]
    fn past_the_limit_every_event_but_quit_times_out(
        seed in any::<u64>(),
        prefix in proptest::collection::vec(input_event(), 0..50),
        event in input_event(),
    ) {
        let mut session = session_for(seed, 40, 5);
        for e in prefix {
            session.handle(e, Duration::ZERO);
        }
        prop_assume!(!session.is_finished());
        let cursor = session.cursor();
        let status = session.status().clone();
        let count = session.correct_chars();

        let limit = session.config().time_limit;
        let transition = session.handle(event, limit + Duration::from_millis(1));

        prop_assert_eq!(transition, Transition::Finished(SessionOutcome::TimedOut));
        prop_assert_eq!(session.cursor(), cursor);
        prop_assert_eq!(session.status(), &status);
        prop_assert_eq!(session.correct_chars(), count);
    }

    #[test]
    fn quit_finishes_any_active_session(
        seed in any::<u64>(),
        events in proptest::collection::vec(input_event(), 0..50),
    ) {
        let mut session = session_for(seed, 40, 5);
        for event in events {
            session.handle(event, Duration::ZERO);
        }
        let was_finished = session.is_finished();

        let transition = session.handle(InputEvent::Quit, Duration::from_secs(100));

        if was_finished {
            prop_assert_eq!(transition, Transition::Unchanged);
        } else {
            prop_assert_eq!(transition, Transition::Finished(SessionOutcome::QuitRequested));
        }
    }
}
