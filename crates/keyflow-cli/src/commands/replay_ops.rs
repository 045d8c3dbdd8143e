use std::fs;
use std::process;

use crate::replay::{replay, ReplayReport};

use super::layout_ops::load_layout;

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

pub fn replay_cmd(script: &str, layout: Option<&str>, json: bool) {
    let src = die!(fs::read_to_string(script), "Error reading {script}: {}");
    let report = die!(replay(&src, load_layout(layout)), "Error: {}");

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).expect("JSON serialization failed")
        );
    } else {
        print!("{}", format_text(&report));
    }
}

pub fn format_text(report: &ReplayReport) -> String {
    let mut out = String::new();
    for snap in &report.snapshots {
        out.push_str(&format!(
            "[{:>5}ms] line {}: {:?}",
            snap.elapsed_ms, snap.line, snap.document
        ));
        if !snap.candidates.is_empty() {
            let bar: Vec<String> = snap
                .candidates
                .iter()
                .map(|c| format!("[{}]", c.render_text))
                .collect();
            out.push_str(&format!(" {}", bar.join(" ")));
        }
        if snap.undo_visible {
            out.push_str(" (undo)");
        }
        if let Some(preview) = &snap.preview {
            out.push_str(&format!(" preview={preview:?}"));
        }
        if snap.shift {
            out.push_str(" shift");
        }
        out.push('\n');
    }
    out.push_str(&format!("document: {:?}\n", report.document));
    out
}
