use keyflow_cli::commands::replay_ops::format_text;
use keyflow_cli::replay::{replay, ScriptError};
use keyflow_core::layout::{default_layout, parse_layout_toml};
use keyflow_core::CandidateKind;

#[test]
fn join_undo_and_long_press() {
    let script = "\
# join two words, take it back, then add a variant letter
text привет|мир
space
show
pick join
show
undo
show
hold е
show
release
";
    let report = replay(script, default_layout().clone()).unwrap();

    let kinds: Vec<CandidateKind> = report.snapshots[0].candidates.iter().map(|c| c.kind).collect();
    assert_eq!(
        kinds,
        [
            CandidateKind::Join,
            CandidateKind::Period,
            CandidateKind::Comma,
            CandidateKind::Space
        ]
    );
    assert_eq!(report.snapshots[0].document, "привет|мир");
    assert_eq!(report.snapshots[1].document, "приветмир|");
    assert!(report.snapshots[1].undo_visible);
    assert_eq!(report.snapshots[2].document, "привет мир|");
    assert!(!report.snapshots[2].undo_visible);
    assert_eq!(report.snapshots[3].preview.as_deref(), Some("ё"));

    assert_eq!(report.document, "привет мирё|");
    assert_eq!(report.committed, ["приветмир", "привет мир", "ё"]);
}

#[test]
fn space_lands_after_timeout() {
    let script = "text кот|\nspace\nwait 249\nshow\nwait 1\nshow\n";
    let report = replay(script, default_layout().clone()).unwrap();
    assert_eq!(report.snapshots[0].document, "кот|");
    assert_eq!(report.snapshots[0].elapsed_ms, 249);
    assert_eq!(report.snapshots[1].document, "кот |");
    assert!(report.snapshots[1].candidates.is_empty());
}

#[test]
fn shift_applies_to_one_letter() {
    let report = replay("shift\ntype кот\n", default_layout().clone()).unwrap();
    assert_eq!(report.document, "Кот|");
}

#[test]
fn custom_layout() {
    let layout = parse_layout_toml(
        r#"
[[rows]]
keys = [{ label = "a", long_press = "á, à" }, { label = "b" }]
"#,
    )
    .unwrap();
    // The 80-wide screen pulls the option row inside its margins.
    let report = replay("hold a\nmove 200\nrelease\ntap b\n", layout).unwrap();
    assert_eq!(report.document, "àb|");
}

#[test]
fn unknown_key_is_an_error() {
    let err = replay("text |\ntap q\n", default_layout().clone()).unwrap_err();
    assert_eq!(
        err,
        ScriptError::UnknownKey {
            line: 2,
            label: "q".into()
        }
    );
}

#[test]
fn text_output_lists_snapshots() {
    let report = replay("text кот|\nspace\nshow\n", default_layout().clone()).unwrap();
    let text = format_text(&report);
    assert!(text.contains("\"кот|\""));
    assert!(text.contains("[. ]"));
    assert!(text.ends_with("document: \"кот|\"\n"));
}
