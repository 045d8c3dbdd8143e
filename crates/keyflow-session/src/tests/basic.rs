use keyflow_core::layout::default_layout;
use keyflow_core::{PreviewState, TimerId, TimerKind};

use super::*;
use crate::types::UndoChip;

#[test]
fn typing_without_a_document_is_dropped() {
    let mut s = session("|");
    s.detach();
    let resp = tap(&mut s, "a");
    assert!(resp.consumed);
    assert_eq!(resp.committed, None);
    assert!(s.surface().is_none());
}

#[test]
fn typing_appends_at_caret() {
    let mut s = session("|fish");
    type_text(&mut s, "cat");
    assert_eq!(doc(&s), "cat|fish");
    assert_eq!(s.surface().unwrap().commit_log(), ["c", "a", "t"]);
}

#[test]
fn toggle_shift_changes_key_faces() {
    let mut s = session("|");
    let a = key_id(&s, "a");
    assert_eq!(s.key_face(a).unwrap().label, "a");
    assert_eq!(s.key_face(a).unwrap().hint.as_deref(), Some("á"));

    let resp = s.handle(SessionEvent::ToggleShift);
    assert!(resp.consumed);
    assert_eq!(resp.candidates, CandidateAction::Keep);
    assert!(s.shift());
    assert_eq!(s.key_face(a).unwrap().label, "A");
    assert_eq!(s.key_face(a).unwrap().hint.as_deref(), Some("Á"));

    s.handle(SessionEvent::ToggleShift);
    assert!(!s.shift());
}

#[test]
fn select_out_of_range_is_ignored() {
    let mut s = session("cat|");
    s.handle(SessionEvent::Space);
    let resp = s.handle(SessionEvent::SelectCandidate(9));
    assert_eq!(resp.committed, None);
    assert_eq!(resp.candidates, CandidateAction::Keep);
    assert!(s.pending().is_armed());
}

#[test]
fn unknown_timer_is_not_consumed() {
    let mut s = session("cat|");
    s.handle(SessionEvent::Space);
    for kind in [TimerKind::PendingSpace, TimerKind::LongPress] {
        let resp = s.handle(SessionEvent::TimerFired(TimerId {
            kind,
            generation: 99,
        }));
        assert!(!resp.consumed);
    }
    assert_eq!(doc(&s), "cat|");
    assert!(s.pending().is_armed());
}

#[test]
fn detach_hides_an_open_preview() {
    let mut s = session("|");
    down(&mut s, "a");
    s.advance(ms(300));
    assert!(matches!(s.preview().state, PreviewState::Multi { .. }));

    s.detach();
    assert_eq!(s.preview().state, PreviewState::Hidden);
    assert!(s.gesture().press().is_none());
    assert!(s.scheduler().outstanding().is_empty());
}

#[test]
fn attach_drops_the_previous_window() {
    let mut s = session("cat|");
    s.handle(SessionEvent::Space);
    s.attach(MemorySurface::parse("dog|"));
    assert!(!s.pending().is_armed());
    assert!(s.advance(ms(1000)).is_empty());
    assert_eq!(doc(&s), "dog|");
}

#[test]
fn set_layout_switches_variants() {
    let mut s = session("|");
    s.set_layout(default_layout().clone());
    let key = down(&mut s, "е");
    s.advance(ms(300));
    assert_eq!(s.preview().highlighted(), Some("ё"));
    s.handle(SessionEvent::up(key));
    assert_eq!(doc(&s), "ё|");
}

#[test]
fn space_hides_undo_chip_after_join() {
    let mut s = session("cat|fish");
    s.handle(SessionEvent::Space);
    s.handle(SessionEvent::SelectCandidate(0));
    let resp = s.handle(SessionEvent::Space);
    assert_eq!(resp.undo, UndoChip::Hide);
    assert!(s.pending().join_context().is_none());
}

#[test]
fn full_sentence() {
    let mut s = session("|");
    s.handle(SessionEvent::ToggleShift);
    type_text(&mut s, "cat");
    s.handle(SessionEvent::Space);
    s.advance(ms(300));
    type_text(&mut s, "fish");
    s.handle(SessionEvent::Space);
    let idx = candidate_index(&s, CandidateKind::Period);
    s.handle(SessionEvent::SelectCandidate(idx));
    assert_eq!(doc(&s), "Cat fish. |");
}
