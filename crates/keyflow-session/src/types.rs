use keyflow_core::{Candidate, KeyBounds, KeyId, TimerId};

/// One sample of the touch stream for a single key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TouchEvent {
    /// Finger landed on the key drawn at `bounds`.
    Down { bounds: KeyBounds },
    /// Finger moved; only the horizontal screen coordinate matters.
    Move { x: f32 },
    Up,
    Cancel,
}

/// Everything the host feeds into a [`crate::KeyboardSession`].
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Touch { key: KeyId, touch: TouchEvent },
    Space,
    Delete,
    Enter,
    ToggleShift,
    /// Index into the candidate list last shown.
    SelectCandidate(usize),
    UndoJoin,
    TimerFired(TimerId),
}

impl SessionEvent {
    pub fn down(key: KeyId, bounds: KeyBounds) -> Self {
        Self::Touch {
            key,
            touch: TouchEvent::Down { bounds },
        }
    }

    pub fn moved(key: KeyId, x: f32) -> Self {
        Self::Touch {
            key,
            touch: TouchEvent::Move { x },
        }
    }

    pub fn up(key: KeyId) -> Self {
        Self::Touch {
            key,
            touch: TouchEvent::Up,
        }
    }

    pub fn cancel(key: KeyId) -> Self {
        Self::Touch {
            key,
            touch: TouchEvent::Cancel,
        }
    }
}

/// What the candidate bar should do.
#[derive(Debug, Clone, PartialEq)]
pub enum CandidateAction {
    /// Leave the bar as-is.
    Keep,
    /// Show or replace the bar with these candidates.
    Show(Vec<Candidate>),
    Hide,
}

/// The "undo join" chip next to the candidate bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndoChip {
    Keep,
    Show,
    Hide,
}

/// Response from [`crate::KeyboardSession::handle`].
#[derive(Debug, Clone, PartialEq)]
pub struct SessionResponse {
    pub consumed: bool,
    /// Text that reached the document during this event, in order.
    pub committed: Option<String>,
    pub candidates: CandidateAction,
    pub undo: UndoChip,
}

impl SessionResponse {
    pub(crate) fn not_consumed() -> Self {
        Self {
            consumed: false,
            committed: None,
            candidates: CandidateAction::Keep,
            undo: UndoChip::Keep,
        }
    }

    pub(crate) fn consumed() -> Self {
        Self {
            consumed: true,
            ..Self::not_consumed()
        }
    }

    pub(crate) fn with_committed(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        if text.is_empty() {
            return self;
        }
        match &mut self.committed {
            Some(existing) => existing.push_str(&text),
            None => self.committed = Some(text),
        }
        self
    }
}
