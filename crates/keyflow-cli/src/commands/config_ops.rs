use std::fs;
use std::process;

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

pub fn settings_export() {
    print!("{}", keyflow_core::settings::default_toml());
}

pub fn settings_validate(file: &str) {
    let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
    let s = die!(
        keyflow_core::settings::parse_settings_toml(&content),
        "Error: {}"
    );
    println!(
        "OK: pending_space.timeout_ms={}, gesture.long_press_ms={}, popup.option_width={}",
        s.pending_space.timeout_ms, s.gesture.long_press_ms, s.popup.option_width
    );
}

pub fn layout_export() {
    print!("{}", keyflow_core::layout::default_toml());
}

pub fn layout_validate(file: &str) {
    let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
    let layout = die!(
        keyflow_core::layout::parse_layout_toml(&content),
        "Error: {}"
    );
    println!(
        "OK: {} rows, {} keys, script={:?}",
        layout.rows.len(),
        layout.keys().count(),
        layout.script
    );
}
