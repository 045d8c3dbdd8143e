//! Pending-space candidates and the resolver that derives them from the text
//! around the caret.

use serde::Serialize;
use tracing::{debug, debug_span};

use crate::settings::Settings;
use crate::surface::TextSurface;
use crate::unicode::{char_len, is_letter};

/// The terminal action a candidate performs. Declaration order is display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateKind {
    Join,
    Period,
    Comma,
    Space,
}

impl CandidateKind {
    /// Text committed by the literal kinds. `Join` rewrites existing text instead.
    pub fn literal(self) -> Option<&'static str> {
        match self {
            Self::Join => None,
            Self::Period => Some(". "),
            Self::Comma => Some(", "),
            Self::Space => Some(" "),
        }
    }
}

/// One entry of the candidate bar. `render_text` is presentation only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub kind: CandidateKind,
    pub render_text: String,
}

/// The word fragments on either side of a pending space.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JoinContext {
    pub left: String,
    pub right: String,
}

impl JoinContext {
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
        }
    }

    /// Split the text around the caret into the trailing non-whitespace run
    /// of `before` and the leading non-whitespace run of `after`.
    pub fn from_text(before: &str, after: &str) -> Self {
        let left_start = before
            .char_indices()
            .rev()
            .take_while(|(_, c)| !c.is_whitespace())
            .last()
            .map_or(before.len(), |(i, _)| i);
        let right_end = after
            .char_indices()
            .find(|(_, c)| c.is_whitespace())
            .map_or(after.len(), |(i, _)| i);
        Self::new(&before[left_start..], &after[..right_end])
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty() && self.right.is_empty()
    }

    /// Both fragments present, `left` ending and `right` starting on a letter.
    pub fn is_joinable(&self) -> bool {
        let left_ends = self.left.chars().next_back().is_some_and(is_letter);
        let right_starts = self.right.chars().next().is_some_and(is_letter);
        left_ends && right_starts
    }

    pub fn left_len(&self) -> usize {
        char_len(&self.left)
    }

    pub fn right_len(&self) -> usize {
        char_len(&self.right)
    }

    pub fn joined(&self) -> String {
        format!("{}{}", self.left, self.right)
    }

    pub fn spaced(&self) -> String {
        format!("{} {}", self.left, self.right)
    }
}

/// Produces the ordered candidate list for a pending-space window.
///
/// Pure with respect to the document: it only reads around the caret.
#[derive(Debug, Clone)]
pub struct CandidateResolver {
    window: usize,
    join_prefix: String,
    space_label: String,
}

impl CandidateResolver {
    pub fn new(window: usize) -> Self {
        Self {
            window,
            join_prefix: String::new(),
            space_label: "␣".to_string(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            window: settings.pending_space.context_window,
            join_prefix: settings.labels.join_prefix.clone(),
            space_label: settings.labels.space.clone(),
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Read up to `window` characters on each side and split them into the
    /// adjacent word fragments. `None` when the surface cannot be read.
    pub fn extract<S: TextSurface + ?Sized>(&self, surface: &S) -> Option<JoinContext> {
        let before = surface.read_before(self.window)?;
        let after = surface.read_after(self.window)?;
        Some(JoinContext::from_text(&before, &after))
    }

    /// Candidates for the current caret position: `Join`, `Period`, `Comma`,
    /// `Space`, each only when applicable, always in that order.
    pub fn generate<S: TextSurface + ?Sized>(&self, surface: Option<&S>) -> Vec<Candidate> {
        let _span = debug_span!("generate_candidates").entered();
        let ctx = surface.and_then(|s| self.extract(s));
        let candidates = self.candidates_for(ctx.as_ref());
        debug!(count = candidates.len());
        candidates
    }

    /// The list for an already-extracted context.
    pub fn candidates_for(&self, ctx: Option<&JoinContext>) -> Vec<Candidate> {
        let mut out = Vec::with_capacity(4);
        if let Some(ctx) = ctx.filter(|c| !c.is_empty()) {
            if ctx.is_joinable() {
                out.push(Candidate {
                    kind: CandidateKind::Join,
                    render_text: format!("{}{}", self.join_prefix, ctx.joined()),
                });
            }
            for kind in [CandidateKind::Period, CandidateKind::Comma] {
                out.push(Candidate {
                    kind,
                    render_text: kind.literal().unwrap_or_default().to_string(),
                });
            }
        }
        out.push(Candidate {
            kind: CandidateKind::Space,
            render_text: self.space_label.clone(),
        });
        out
    }
}

impl Default for CandidateResolver {
    fn default() -> Self {
        Self::new(40)
    }
}
