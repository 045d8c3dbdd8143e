use std::fs;
use std::process;

use serde::Serialize;

use keyflow_core::layout::{default_layout, parse_layout_toml};
use keyflow_core::KeyboardSpec;

use super::{display_width, pad};

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

#[derive(Debug, Serialize)]
struct KeyRow {
    row: usize,
    col: usize,
    label: String,
    hint: Option<String>,
    alternates: Vec<String>,
}

/// The layout in `file`, or the built-in one.
pub fn load_layout(file: Option<&str>) -> KeyboardSpec {
    match file {
        Some(path) => {
            let content = die!(fs::read_to_string(path), "Error reading {path}: {}");
            die!(parse_layout_toml(&content), "Error: {}")
        }
        None => default_layout().clone(),
    }
}

/// Print every key as it would be drawn: face label, corner hint and the
/// long-press options in order.
pub fn layout_cmd(file: Option<&str>, shift: bool, json: bool) {
    let layout = load_layout(file);
    let rows: Vec<KeyRow> = layout
        .keys()
        .map(|(id, _)| {
            let face = layout.key_face(id, shift).unwrap_or_default();
            KeyRow {
                row: id.row,
                col: id.col,
                label: face.label,
                hint: face.hint,
                alternates: layout.alternates(id),
            }
        })
        .collect();

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&rows).expect("JSON serialization failed")
        );
        return;
    }

    println!("script: {:?}", layout.script);
    let label_width = rows.iter().map(|k| display_width(&k.label)).max().unwrap_or(0);
    let hint_width = rows
        .iter()
        .map(|k| k.hint.as_deref().map_or(1, display_width))
        .max()
        .unwrap_or(1);
    for k in &rows {
        println!(
            "r{}c{:<2} {}  {}  {}",
            k.row,
            k.col,
            pad(&k.label, label_width),
            pad(k.hint.as_deref().unwrap_or("-"), hint_width),
            k.alternates.join(" ")
        );
    }
}
