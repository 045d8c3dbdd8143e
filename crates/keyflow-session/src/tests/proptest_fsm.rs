//! Property-based tests for the keyboard session.
//!
//! Generates random event sequences via proptest and verifies that the
//! structural invariants of both state machines hold after every action.

use proptest::prelude::*;

use keyflow_core::{PreviewCommand, PreviewState, TimerKind};

use super::*;

// ---------------------------------------------------------------------------
// Action enum: every host-facing operation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum Action {
    Down(&'static str),
    Move(f32),
    Up,
    Cancel,
    Space,
    Delete,
    Enter,
    Shift,
    Select(usize),
    Undo,
    Wait(u64),
}

// ---------------------------------------------------------------------------
// Strategy: weighted random Action generation
// ---------------------------------------------------------------------------

fn arb_label() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["c", "a", "t", "f", "i", "s", "h", "e", "1", "."])
}

fn arb_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        20 => arb_label().prop_map(Action::Down),
        8 => (-50.0f32..400.0).prop_map(Action::Move),
        15 => Just(Action::Up),
        2 => Just(Action::Cancel),
        10 => Just(Action::Space),
        4 => Just(Action::Delete),
        2 => Just(Action::Enter),
        2 => Just(Action::Shift),
        6 => (0usize..5).prop_map(Action::Select),
        3 => Just(Action::Undo),
        12 => prop::sample::select(vec![10u64, 100, 200, 249, 250, 300, 1000]).prop_map(Action::Wait),
    ]
}

// ---------------------------------------------------------------------------
// Execute an Action against the session
// ---------------------------------------------------------------------------

/// The key a `Down` landed on, so `Move`/`Up` can refer to it.
struct Driver {
    session: TestSession,
    last_key: KeyId,
}

fn execute_action(driver: &mut Driver, action: &Action) -> Vec<SessionResponse> {
    let s = &mut driver.session;
    match action {
        Action::Down(label) => {
            let key = key_id(s, label);
            driver.last_key = key;
            vec![s.handle(SessionEvent::down(key, bounds_of(key)))]
        }
        Action::Move(x) => vec![s.handle(SessionEvent::moved(driver.last_key, *x))],
        Action::Up => vec![s.handle(SessionEvent::up(driver.last_key))],
        Action::Cancel => vec![s.handle(SessionEvent::cancel(driver.last_key))],
        Action::Space => vec![s.handle(SessionEvent::Space)],
        Action::Delete => vec![s.handle(SessionEvent::Delete)],
        Action::Enter => vec![s.handle(SessionEvent::Enter)],
        Action::Shift => vec![s.handle(SessionEvent::ToggleShift)],
        Action::Select(i) => vec![s.handle(SessionEvent::SelectCandidate(*i))],
        Action::Undo => vec![s.handle(SessionEvent::UndoJoin)],
        Action::Wait(n) => s.advance(ms(*n)),
    }
}

// ---------------------------------------------------------------------------
// Invariant checks, run after every action
// ---------------------------------------------------------------------------

fn assert_invariants(s: &TestSession, responses: &[SessionResponse], action: &Action, was_armed: bool) {
    // 1. At most one timer of each kind, and it is the one the machine expects.
    for kind in [TimerKind::PendingSpace, TimerKind::LongPress] {
        assert!(
            s.scheduler().outstanding_of(kind) <= 1,
            "more than one {kind:?} timer outstanding after {action:?}",
        );
    }
    assert_eq!(
        s.pending().outstanding_timer().is_some(),
        s.scheduler().outstanding_of(TimerKind::PendingSpace) == 1,
        "pending-space slot and scheduler disagree after {action:?}",
    );
    assert_eq!(
        s.pending().is_armed(),
        s.pending().outstanding_timer().is_some(),
        "armed state without a live deadline after {action:?}",
    );
    assert_eq!(
        s.gesture().outstanding_timer().is_some(),
        s.scheduler().outstanding_of(TimerKind::LongPress) == 1,
        "long-press slot and scheduler disagree after {action:?}",
    );

    // 2. No batch is left open.
    assert_eq!(
        s.surface().unwrap().batch_depth(),
        0,
        "batch left open after {action:?}",
    );

    // 3. A window that closed wrote exactly one terminal action, unless a
    //    backspace took the pending space back.
    if was_armed && !s.pending().is_armed() && !matches!(action, Action::Space | Action::Delete) {
        assert!(
            responses.iter().any(|r| r.committed.is_some()),
            "window closed without committing after {action:?}",
        );
    }

    // 4. Waiting writes at most one space per window, and none without one.
    if let Action::Wait(_) = action {
        let spaces = responses
            .iter()
            .filter(|r| r.committed.as_deref() == Some(" "))
            .count();
        assert!(spaces <= usize::from(was_armed), "{spaces} spaces from one wait");
    }

    // 5. Committed text is non-empty when present.
    for resp in responses {
        if let Some(text) = &resp.committed {
            assert!(!text.is_empty(), "empty commit after {action:?}");
        }
    }

    // 6. A visible candidate bar implies an open window.
    if !s.candidates().is_empty() {
        assert!(
            s.pending().is_armed(),
            "candidates shown with no open window after {action:?}",
        );
    }

    // 7. A preview is visible exactly while a finger is down.
    assert_eq!(
        s.gesture().press().is_some(),
        s.preview().state != PreviewState::Hidden,
        "preview and press disagree after {action:?}",
    );

    // 8. Enter always leaves the window closed; Delete never writes.
    if let Action::Enter = action {
        assert!(!s.pending().is_armed(), "window open after {action:?}");
    }
    if let Action::Delete = action {
        assert!(
            responses.iter().all(|r| r.committed.is_none()),
            "delete committed text",
        );
    }
}

/// Once a press shows its option row it never falls back to the single
/// preview before being hidden.
fn assert_preview_monotonic(commands: &[PreviewCommand]) {
    let mut escalated = false;
    for command in commands {
        match command {
            PreviewCommand::ShowMulti { .. } => escalated = true,
            PreviewCommand::HideAll => escalated = false,
            PreviewCommand::ShowSingle { .. } => {
                assert!(!escalated, "single preview shown over an open option row");
            }
            PreviewCommand::UpdateSelection(_) => {
                assert!(escalated, "selection update without an option row");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// proptest entry point
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn session_invariants_hold(actions in prop::collection::vec(arb_action(), 1..120)) {
        let mut driver = Driver {
            session: session("cat|fish"),
            last_key: KeyId::new(1, 0),
        };
        for action in &actions {
            let was_armed = driver.session.pending().is_armed();
            let responses = execute_action(&mut driver, action);
            assert_invariants(&driver.session, &responses, action, was_armed);
        }
        assert_preview_monotonic(&driver.session.preview().commands);
    }

    #[test]
    fn invariants_hold_on_a_narrow_screen(actions in prop::collection::vec(arb_action(), 1..80)) {
        let mut driver = Driver {
            session: session("c|at"),
            last_key: KeyId::new(1, 0),
        };
        driver.session.set_screen_width(320.0);
        for action in &actions {
            let was_armed = driver.session.pending().is_armed();
            let responses = execute_action(&mut driver, action);
            assert_invariants(&driver.session, &responses, action, was_armed);
        }
        assert_preview_monotonic(&driver.session.preview().commands);
    }
}
