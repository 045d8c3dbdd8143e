use keyflow_core::{Candidate, CandidateKind, KeyBounds, KeyFace, KeyId};
use keyflow_session::{CandidateAction, SessionResponse, UndoChip};

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum KfError {
    #[error("IO error: {msg}")]
    Io { msg: String },
    #[error("invalid data: {msg}")]
    InvalidData { msg: String },
}

// ---------------------------------------------------------------------------
// Records (value types, copied across FFI boundary)
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, uniffi::Record)]
pub struct KfKeyId {
    pub row: u32,
    pub col: u32,
}

#[derive(Clone, Copy, Debug, uniffi::Record)]
pub struct KfKeyBounds {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

/// One cell of the long-press option row, in screen coordinates.
#[derive(Clone, Debug, uniffi::Record)]
pub struct KfOptionCell {
    pub center_x: f32,
    pub value: String,
}

#[derive(Clone, Debug, uniffi::Record)]
pub struct KfCandidate {
    pub kind: KfCandidateKind,
    pub render_text: String,
}

#[derive(Clone, Debug, uniffi::Record)]
pub struct KfKeyFace {
    pub label: String,
    pub hint: Option<String>,
}

/// Response from every session call.
#[derive(Clone, Debug, uniffi::Record)]
pub struct KfResponse {
    pub consumed: bool,
    pub committed: Option<String>,
    pub candidates: KfCandidateAction,
    pub undo: KfUndoChip,
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, uniffi::Enum)]
pub enum KfCandidateKind {
    Join,
    Period,
    Comma,
    Space,
}

#[derive(Clone, Debug, uniffi::Enum)]
pub enum KfCandidateAction {
    Keep,
    Show { candidates: Vec<KfCandidate> },
    Hide,
}

#[derive(Clone, Copy, Debug, uniffi::Enum)]
pub enum KfUndoChip {
    Keep,
    Show,
    Hide,
}

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

impl From<KfKeyId> for KeyId {
    fn from(id: KfKeyId) -> Self {
        KeyId::new(id.row as usize, id.col as usize)
    }
}

impl From<KeyId> for KfKeyId {
    fn from(id: KeyId) -> Self {
        Self {
            row: id.row as u32,
            col: id.col as u32,
        }
    }
}

impl From<KfKeyBounds> for KeyBounds {
    fn from(b: KfKeyBounds) -> Self {
        KeyBounds::new(b.left, b.top, b.width, b.height)
    }
}

impl From<KeyBounds> for KfKeyBounds {
    fn from(b: KeyBounds) -> Self {
        Self {
            left: b.left,
            top: b.top,
            width: b.width,
            height: b.height,
        }
    }
}

impl From<CandidateKind> for KfCandidateKind {
    fn from(kind: CandidateKind) -> Self {
        match kind {
            CandidateKind::Join => Self::Join,
            CandidateKind::Period => Self::Period,
            CandidateKind::Comma => Self::Comma,
            CandidateKind::Space => Self::Space,
        }
    }
}

impl From<Candidate> for KfCandidate {
    fn from(c: Candidate) -> Self {
        Self {
            kind: c.kind.into(),
            render_text: c.render_text,
        }
    }
}

impl From<KeyFace> for KfKeyFace {
    fn from(face: KeyFace) -> Self {
        Self {
            label: face.label,
            hint: face.hint,
        }
    }
}

pub(super) fn convert_response(resp: SessionResponse) -> KfResponse {
    let candidates = match resp.candidates {
        CandidateAction::Keep => KfCandidateAction::Keep,
        CandidateAction::Show(list) => KfCandidateAction::Show {
            candidates: list.into_iter().map(KfCandidate::from).collect(),
        },
        CandidateAction::Hide => KfCandidateAction::Hide,
    };
    let undo = match resp.undo {
        UndoChip::Keep => KfUndoChip::Keep,
        UndoChip::Show => KfUndoChip::Show,
        UndoChip::Hide => KfUndoChip::Hide,
    };
    KfResponse {
        consumed: resp.consumed,
        committed: resp.committed,
        candidates,
        undo,
    }
}
