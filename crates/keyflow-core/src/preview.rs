//! Key-press preview capability and a recording implementation.

use crate::geometry::{KeyBounds, OptionRow};
use crate::layout::KeyId;

/// The key a preview is attached to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyAnchor {
    pub key: KeyId,
    pub bounds: KeyBounds,
}

/// Renderer for the press-time bubble above a key. Commands only; the
/// renderer never feeds selection state back.
pub trait PreviewSurface {
    fn show_single(&mut self, anchor: &KeyAnchor, text: &str);
    fn show_multi(&mut self, anchor: &KeyAnchor, row: &OptionRow, selected: usize);
    fn update_selection(&mut self, index: usize);
    fn hide_all(&mut self);
}

#[derive(Debug, Clone, PartialEq)]
pub enum PreviewCommand {
    ShowSingle { key: KeyId, text: String },
    ShowMulti {
        key: KeyId,
        options: Vec<String>,
        selected: usize,
    },
    UpdateSelection(usize),
    HideAll,
}

/// What a [`RecordingPreview`] currently displays.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PreviewState {
    #[default]
    Hidden,
    Single(String),
    Multi { options: Vec<String>, selected: usize },
}

/// Keeps every command and the resulting visible state.
#[derive(Debug, Clone, Default)]
pub struct RecordingPreview {
    pub commands: Vec<PreviewCommand>,
    pub state: PreviewState,
}

impl RecordingPreview {
    pub fn new() -> Self {
        Self::default()
    }

    /// The value under the highlight, i.e. what lifting the finger commits.
    pub fn highlighted(&self) -> Option<&str> {
        match &self.state {
            PreviewState::Hidden => None,
            PreviewState::Single(text) => Some(text),
            PreviewState::Multi { options, selected } => options.get(*selected).map(String::as_str),
        }
    }
}

impl PreviewSurface for RecordingPreview {
    fn show_single(&mut self, anchor: &KeyAnchor, text: &str) {
        self.commands.push(PreviewCommand::ShowSingle {
            key: anchor.key,
            text: text.to_string(),
        });
        self.state = PreviewState::Single(text.to_string());
    }

    fn show_multi(&mut self, anchor: &KeyAnchor, row: &OptionRow, selected: usize) {
        let options: Vec<String> = row.values().map(str::to_string).collect();
        self.commands.push(PreviewCommand::ShowMulti {
            key: anchor.key,
            options: options.clone(),
            selected,
        });
        self.state = PreviewState::Multi { options, selected };
    }

    fn update_selection(&mut self, index: usize) {
        self.commands.push(PreviewCommand::UpdateSelection(index));
        if let PreviewState::Multi { selected, .. } = &mut self.state {
            *selected = index;
        }
    }

    fn hide_all(&mut self) {
        self.commands.push(PreviewCommand::HideAll);
        self.state = PreviewState::Hidden;
    }
}
