//! In-memory document used by tests and the `kftool` replayer.

use crate::surface::TextSurface;

/// A plain-text document with a caret.
///
/// `observed()` records the document text each time a listener outside a
/// batch could have looked at it, which makes half-applied edits visible in
/// tests. `commit_log()` records every string committed.
#[derive(Debug, Clone, Default)]
pub struct MemorySurface {
    text: Vec<char>,
    caret: usize,
    batch_depth: usize,
    connected: bool,
    observed: Vec<String>,
    commit_log: Vec<String>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::with_text("", 0)
    }

    /// Document `text` with the caret after `caret` characters (clamped).
    pub fn with_text(text: &str, caret: usize) -> Self {
        let text: Vec<char> = text.chars().collect();
        let caret = caret.min(text.len());
        let mut doc = Self {
            text,
            caret,
            batch_depth: 0,
            connected: true,
            observed: Vec::new(),
            commit_log: Vec::new(),
        };
        doc.notify();
        doc
    }

    /// `"cat|fish"` places the caret at the `|`; without a marker the caret
    /// goes to the end.
    pub fn parse(marked: &str) -> Self {
        match marked.find('|') {
            Some(pos) => {
                let caret = marked[..pos].chars().count();
                let text = format!("{}{}", &marked[..pos], &marked[pos + 1..]);
                Self::with_text(&text, caret)
            }
            None => Self::with_text(marked, usize::MAX),
        }
    }

    pub fn text(&self) -> String {
        self.text.iter().collect()
    }

    /// Text with a `|` at the caret, the inverse of [`MemorySurface::parse`].
    pub fn marked(&self) -> String {
        let before: String = self.text[..self.caret].iter().collect();
        let after: String = self.text[self.caret..].iter().collect();
        format!("{before}|{after}")
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    pub fn set_caret(&mut self, caret: usize) {
        self.caret = caret.min(self.text.len());
    }

    pub fn batch_depth(&self) -> usize {
        self.batch_depth
    }

    pub fn observed(&self) -> &[String] {
        &self.observed
    }

    pub fn commit_log(&self) -> &[String] {
        &self.commit_log
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Simulate the host field going away: reads fail, writes are dropped.
    pub fn disconnect(&mut self) {
        self.connected = false;
    }

    pub fn reconnect(&mut self) {
        self.connected = true;
    }

    fn notify(&mut self) {
        if self.batch_depth == 0 {
            let snapshot = self.text();
            if self.observed.last() != Some(&snapshot) {
                self.observed.push(snapshot);
            }
        }
    }
}

impl TextSurface for MemorySurface {
    fn read_before(&self, n: usize) -> Option<String> {
        if !self.connected {
            return None;
        }
        let start = self.caret.saturating_sub(n);
        Some(self.text[start..self.caret].iter().collect())
    }

    fn read_after(&self, n: usize) -> Option<String> {
        if !self.connected {
            return None;
        }
        let end = self.caret.saturating_add(n).min(self.text.len());
        Some(self.text[self.caret..end].iter().collect())
    }

    fn commit(&mut self, text: &str) {
        if !self.connected {
            return;
        }
        let inserted: Vec<char> = text.chars().collect();
        let len = inserted.len();
        self.text.splice(self.caret..self.caret, inserted);
        self.caret += len;
        self.commit_log.push(text.to_string());
        self.notify();
    }

    fn delete_surrounding(&mut self, before: usize, after: usize) {
        if !self.connected {
            return;
        }
        let start = self.caret.saturating_sub(before);
        let end = self.caret.saturating_add(after).min(self.text.len());
        self.text.drain(start..end);
        self.caret = start;
        self.notify();
    }

    fn begin_batch(&mut self) {
        self.batch_depth += 1;
    }

    fn end_batch(&mut self) {
        self.batch_depth = self.batch_depth.saturating_sub(1);
        self.notify();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_places_caret() {
        let doc = MemorySurface::parse("cat|fish");
        assert_eq!(doc.text(), "catfish");
        assert_eq!(doc.caret(), 3);
        assert_eq!(doc.marked(), "cat|fish");

        let doc = MemorySurface::parse("привет");
        assert_eq!(doc.caret(), 6);
    }

    #[test]
    fn reads_are_char_based() {
        let doc = MemorySurface::parse("ёжик| в");
        assert_eq!(doc.read_before(2).as_deref(), Some("ик"));
        assert_eq!(doc.read_before(40).as_deref(), Some("ёжик"));
        assert_eq!(doc.read_after(40).as_deref(), Some(" в"));
    }

    #[test]
    fn commit_and_delete_move_caret() {
        let mut doc = MemorySurface::parse("cat|fish");
        doc.delete_surrounding(3, 4);
        assert_eq!(doc.marked(), "|");
        doc.commit("catfish");
        assert_eq!(doc.marked(), "catfish|");
        doc.delete_surrounding(100, 100);
        assert_eq!(doc.marked(), "|");
    }

    #[test]
    fn disconnected_surface_is_inert() {
        let mut doc = MemorySurface::parse("ab|");
        doc.disconnect();
        assert_eq!(doc.read_before(1), None);
        assert!(!doc.is_live());
        doc.commit("c");
        doc.delete_surrounding(1, 0);
        doc.reconnect();
        assert!(doc.is_live());
        assert_eq!(doc.marked(), "ab|");
        assert!(doc.commit_log().is_empty());
    }
}
