pub mod candidate_ops;
pub mod config_ops;
pub mod layout_ops;
pub mod replay_ops;

/// Pad `text` with spaces to `width` terminal columns.
pub(crate) fn pad(text: &str, width: usize) -> String {
    let used = unicode_width::UnicodeWidthStr::width(text);
    format!("{text}{}", " ".repeat(width.saturating_sub(used)))
}

pub(crate) fn display_width(text: &str) -> usize {
    unicode_width::UnicodeWidthStr::width(text)
}
