//! Key specs as supplied by the layout collaborator.
//!
//! Layouts are TOML documents: `[[rows]]` tables each holding `keys`, every
//! key a `label` plus an optional comma-separated `long_press` string.

mod alternates;

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

pub use alternates::{derive_alternates, hint_glyph, key_face, Augmentation};

pub const DEFAULT_LAYOUT_TOML: &str = include_str!("default_layout.toml");

#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("row {0} has no keys")]
    EmptyRow(usize),
    #[error("key {col} in row {row} has an empty label")]
    EmptyLabel { row: usize, col: usize },
}

/// Position of a key in its layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct KeyId {
    pub row: usize,
    pub col: usize,
}

impl KeyId {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// A key: its base label and ordered long-press alternates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySpec {
    pub base_label: String,
    pub alternates: Vec<String>,
}

impl KeySpec {
    pub fn new(base_label: impl Into<String>, alternates: Vec<String>) -> Self {
        Self {
            base_label: base_label.into(),
            alternates,
        }
    }

    /// Build from the raw attribute pair of a layout entry.
    pub fn parse(label: &str, long_press: Option<&str>) -> Self {
        Self::new(label, long_press.map(split_alternates).unwrap_or_default())
    }
}

/// Split a raw `"ё, é,,è"` list: trimmed, empties removed.
pub fn split_alternates(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowSpec {
    pub keys: Vec<KeySpec>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Script {
    Cyrillic,
    Latin,
}

/// Rendered face of an idle key.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyFace {
    pub label: String,
    pub hint: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyboardSpec {
    pub rows: Vec<RowSpec>,
    pub script: Script,
}

impl KeyboardSpec {
    /// Rows with the script guessed from their shape: the Cyrillic layout is
    /// the one whose first letter row (after the digits) is wider than ten keys.
    pub fn new(rows: Vec<RowSpec>) -> Self {
        let script = if rows.get(1).is_some_and(|r| r.keys.len() > 10) {
            Script::Cyrillic
        } else {
            Script::Latin
        };
        Self { rows, script }
    }

    pub fn with_script(mut self, script: Script) -> Self {
        self.script = script;
        self
    }

    pub fn augmentation(&self) -> Augmentation {
        Augmentation::for_script(self.script)
    }

    pub fn key(&self, id: KeyId) -> Option<&KeySpec> {
        self.rows.get(id.row)?.keys.get(id.col)
    }

    pub fn keys(&self) -> impl Iterator<Item = (KeyId, &KeySpec)> {
        self.rows.iter().enumerate().flat_map(|(r, row)| {
            row.keys
                .iter()
                .enumerate()
                .map(move |(c, key)| (KeyId::new(r, c), key))
        })
    }

    /// First key whose label matches `label`, ignoring case.
    pub fn find(&self, label: &str) -> Option<KeyId> {
        let label = label.to_lowercase();
        self.keys()
            .find(|(_, key)| key.base_label.to_lowercase() == label)
            .map(|(id, _)| id)
    }

    pub fn alternates(&self, id: KeyId) -> Vec<String> {
        self.key(id)
            .map(|key| derive_alternates(key, &self.augmentation()))
            .unwrap_or_default()
    }

    pub fn key_face(&self, id: KeyId, shift: bool) -> Option<KeyFace> {
        self.key(id)
            .map(|key| key_face(key, &self.augmentation(), shift))
    }
}

#[derive(Deserialize)]
struct RawLayout {
    script: Option<Script>,
    rows: Vec<RawRow>,
}

#[derive(Deserialize)]
struct RawRow {
    keys: Vec<RawKey>,
}

#[derive(Deserialize)]
struct RawKey {
    label: String,
    long_press: Option<String>,
}

pub fn parse_layout_toml(toml_str: &str) -> Result<KeyboardSpec, LayoutError> {
    let raw: RawLayout = toml::from_str(toml_str).map_err(|e| LayoutError::Parse(e.to_string()))?;
    let mut rows = Vec::with_capacity(raw.rows.len());
    for (r, raw_row) in raw.rows.into_iter().enumerate() {
        if raw_row.keys.is_empty() {
            return Err(LayoutError::EmptyRow(r));
        }
        let mut keys = Vec::with_capacity(raw_row.keys.len());
        for (c, raw_key) in raw_row.keys.into_iter().enumerate() {
            if raw_key.label.trim().is_empty() {
                return Err(LayoutError::EmptyLabel { row: r, col: c });
            }
            keys.push(KeySpec::parse(&raw_key.label, raw_key.long_press.as_deref()));
        }
        rows.push(RowSpec { keys });
    }
    let spec = KeyboardSpec::new(rows);
    Ok(match raw.script {
        Some(script) => spec.with_script(script),
        None => spec,
    })
}

/// The embedded default layout.
pub fn default_layout() -> &'static KeyboardSpec {
    static INSTANCE: OnceLock<KeyboardSpec> = OnceLock::new();
    INSTANCE.get_or_init(|| {
        parse_layout_toml(DEFAULT_LAYOUT_TOML).expect("default layout TOML must be valid")
    })
}

pub fn default_toml() -> &'static str {
    DEFAULT_LAYOUT_TOML
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_raw_alternates() {
        assert_eq!(split_alternates(" ё, é,,è "), ["ё", "é", "è"]);
        assert!(split_alternates(" , ").is_empty());
        assert_eq!(KeySpec::parse("a", None).alternates, Vec::<String>::new());
    }

    #[test]
    fn parse_default_layout() {
        let spec = default_layout();
        assert_eq!(spec.script, Script::Cyrillic);
        assert_eq!(spec.rows.len(), 4);
        assert_eq!(spec.rows[0].keys.len(), 10);
        assert_eq!(spec.rows[1].keys.len(), 11);

        let e = spec.find("е").unwrap();
        assert_eq!(spec.alternates(e).first().map(String::as_str), Some("ё"));
        let soft = spec.find("ь").unwrap();
        assert_eq!(spec.alternates(soft).last().map(String::as_str), Some("ъ"));
    }

    #[test]
    fn script_detection_from_row_width() {
        let toml = r#"
[[rows]]
keys = [{ label = "1" }, { label = "2" }]

[[rows]]
keys = [{ label = "q" }, { label = "w" }, { label = "e", long_press = "é, è" }]
"#;
        let spec = parse_layout_toml(toml).unwrap();
        assert_eq!(spec.script, Script::Latin);
        let e = spec.find("E").unwrap();
        assert_eq!(e, KeyId::new(1, 2));
        assert_eq!(spec.alternates(e), ["é", "è"]);
    }

    #[test]
    fn explicit_script_wins() {
        let toml = r#"
script = "cyrillic"

[[rows]]
keys = [{ label = "е" }]
"#;
        let spec = parse_layout_toml(toml).unwrap();
        assert_eq!(spec.script, Script::Cyrillic);
        assert_eq!(spec.alternates(KeyId::new(0, 0)), ["ё"]);
    }

    #[test]
    fn error_empty_row() {
        let toml = "[[rows]]\nkeys = []\n";
        assert!(matches!(
            parse_layout_toml(toml).unwrap_err(),
            LayoutError::EmptyRow(0)
        ));
    }

    #[test]
    fn error_empty_label() {
        let toml = "[[rows]]\nkeys = [{ label = \"a\" }, { label = \" \" }]\n";
        let err = parse_layout_toml(toml).unwrap_err();
        assert!(matches!(err, LayoutError::EmptyLabel { row: 0, col: 1 }));
    }

    #[test]
    fn error_invalid_toml() {
        assert!(matches!(
            parse_layout_toml("rows = 3").unwrap_err(),
            LayoutError::Parse(_)
        ));
    }

    #[test]
    fn key_lookup_out_of_range() {
        let spec = default_layout();
        assert!(spec.key(KeyId::new(9, 0)).is_none());
        assert!(spec.key(KeyId::new(0, 99)).is_none());
        assert!(spec.key_face(KeyId::new(9, 0), false).is_none());
    }
}
