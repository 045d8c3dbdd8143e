mod basic;
mod proptest_fsm;

use std::time::Duration;

use keyflow_core::layout::parse_layout_toml;
use keyflow_core::settings::{default_toml, parse_settings_toml, Settings};
use keyflow_core::{
    CandidateKind, KeyBounds, KeyId, KeyboardSpec, ManualScheduler, MemorySurface,
    RecordingPreview,
};

use super::types::{CandidateAction, SessionEvent, SessionResponse};
use super::KeyboardSession;

pub(super) type TestSession = KeyboardSession<MemorySurface, RecordingPreview, ManualScheduler>;

/// A small Latin layout: a symbol row and one letter row.
pub(super) const TEST_LAYOUT: &str = r#"
[[rows]]
keys = [
    { label = "1", long_press = "!" },
    { label = ".", long_press = "?, !" },
]

[[rows]]
keys = [
    { label = "c" },
    { label = "a", long_press = "á, à, â" },
    { label = "t" },
    { label = "f" },
    { label = "i" },
    { label = "s" },
    { label = "h" },
    { label = "e", long_press = "é" },
]
"#;

pub(super) fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

pub(super) fn test_settings() -> Settings {
    parse_settings_toml(default_toml()).unwrap()
}

pub(super) fn test_layout() -> KeyboardSpec {
    parse_layout_toml(TEST_LAYOUT).unwrap()
}

pub(super) fn session_with_layout(layout: KeyboardSpec, doc: &str) -> TestSession {
    let mut session = KeyboardSession::with_settings(
        &test_settings(),
        layout,
        RecordingPreview::new(),
        ManualScheduler::new(),
    );
    session.attach(MemorySurface::parse(doc));
    session
}

/// Session on the Latin test layout editing `doc` (`|` marks the caret).
pub(super) fn session(doc: &str) -> TestSession {
    session_with_layout(test_layout(), doc)
}

/// Keys are 40 wide and 60 tall, laid out on a plain grid.
pub(super) fn bounds_of(key: KeyId) -> KeyBounds {
    KeyBounds::new(key.col as f32 * 40.0, key.row as f32 * 60.0, 40.0, 60.0)
}

pub(super) fn key_id(session: &TestSession, label: &str) -> KeyId {
    session
        .layout()
        .find(label)
        .unwrap_or_else(|| panic!("no key labelled {label:?}"))
}

pub(super) fn down(session: &mut TestSession, label: &str) -> KeyId {
    let key = key_id(session, label);
    let resp = session.handle(SessionEvent::down(key, bounds_of(key)));
    assert!(resp.consumed);
    key
}

pub(super) fn tap(session: &mut TestSession, label: &str) -> SessionResponse {
    let key = down(session, label);
    session.handle(SessionEvent::up(key))
}

pub(super) fn type_text(session: &mut TestSession, text: &str) {
    for c in text.chars() {
        tap(session, &c.to_string());
    }
}

pub(super) fn doc(session: &TestSession) -> String {
    session.surface().unwrap().marked()
}

pub(super) fn shown_kinds(resp: &SessionResponse) -> Vec<CandidateKind> {
    match &resp.candidates {
        CandidateAction::Show(list) => list.iter().map(|c| c.kind).collect(),
        other => panic!("expected candidates to be shown, got {other:?}"),
    }
}

/// Index of `kind` in the list the session currently displays.
pub(super) fn candidate_index(session: &TestSession, kind: CandidateKind) -> usize {
    session
        .candidates()
        .iter()
        .position(|c| c.kind == kind)
        .unwrap_or_else(|| panic!("{kind:?} not offered"))
}
