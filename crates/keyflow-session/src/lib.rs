//! Keyboard session: the pending-space machine and the gesture disambiguator
//! wired to the host's document, preview and timers.
//!
//! `KeyboardSession` owns all engine state and processes each host event,
//! returning a `SessionResponse` that tells the host how to update the
//! candidate bar and the undo chip. Everything runs on the host's UI thread;
//! timers come back in as `SessionEvent::TimerFired`.

pub mod gesture;
pub mod pending_space;
pub(crate) mod types;

mod key_handlers;
mod response;

#[cfg(test)]
mod tests;

use std::time::Duration;

use keyflow_core::layout::default_layout;
use keyflow_core::settings::{settings, Settings};
use keyflow_core::{
    Candidate, KeyFace, KeyId, KeyboardSpec, ManualScheduler, PreviewSurface, Scheduler,
    TextSurface,
};

pub use gesture::{GestureDisambiguator, PressPhase, PressState};
pub use pending_space::{Backspace, Expiry, PendingSpaceMachine, PendingSpaceState};
pub use types::{CandidateAction, SessionEvent, SessionResponse, TouchEvent, UndoChip};

pub struct KeyboardSession<S, P, T> {
    surface: Option<S>,
    preview: P,
    scheduler: T,
    layout: KeyboardSpec,

    pending: PendingSpaceMachine,
    gesture: GestureDisambiguator,

    /// One-shot shift: cleared after the next character is committed.
    shift: bool,
    /// The list the candidate bar currently shows; `SelectCandidate` indexes it.
    candidates: Vec<Candidate>,
}

impl<S, P, T> KeyboardSession<S, P, T>
where
    S: TextSurface,
    P: PreviewSurface,
    T: Scheduler,
{
    /// Session with the process-wide settings and the built-in layout.
    pub fn new(preview: P, scheduler: T) -> Self {
        Self::with_settings(settings(), default_layout().clone(), preview, scheduler)
    }

    pub fn with_settings(
        settings: &Settings,
        layout: KeyboardSpec,
        preview: P,
        scheduler: T,
    ) -> Self {
        let gesture = GestureDisambiguator::from_settings(settings, layout.augmentation());
        Self {
            surface: None,
            preview,
            scheduler,
            layout,
            pending: PendingSpaceMachine::from_settings(settings),
            gesture,
            shift: false,
            candidates: Vec::new(),
        }
    }

    /// Start editing a document. A document still attached is detached first.
    pub fn attach(&mut self, surface: S) {
        if self.surface.is_some() {
            self.detach();
        }
        self.surface = Some(surface);
    }

    /// Stop editing: both timers are cancelled and previews hidden. An open
    /// pending-space window is dropped without writing.
    pub fn detach(&mut self) -> Option<S> {
        self.pending.reset(&mut self.scheduler);
        self.gesture.on_cancel(&mut self.preview, &mut self.scheduler);
        self.candidates.clear();
        self.surface.take()
    }

    pub fn set_layout(&mut self, layout: KeyboardSpec) {
        self.gesture.on_cancel(&mut self.preview, &mut self.scheduler);
        self.gesture.set_augmentation(layout.augmentation());
        self.layout = layout;
    }

    pub fn set_screen_width(&mut self, width: f32) {
        self.gesture.set_screen_width(width);
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.surface.as_mut()
    }

    pub fn preview(&self) -> &P {
        &self.preview
    }

    pub fn scheduler(&self) -> &T {
        &self.scheduler
    }

    pub fn layout(&self) -> &KeyboardSpec {
        &self.layout
    }

    pub fn pending(&self) -> &PendingSpaceMachine {
        &self.pending
    }

    pub fn gesture(&self) -> &GestureDisambiguator {
        &self.gesture
    }

    pub fn shift(&self) -> bool {
        self.shift
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Label and corner hint for drawing `key` under the current shift state.
    pub fn key_face(&self, key: KeyId) -> Option<KeyFace> {
        self.layout.key_face(key, self.shift)
    }
}

impl<S, P> KeyboardSession<S, P, ManualScheduler>
where
    S: TextSurface,
    P: PreviewSurface,
{
    /// Move the virtual clock forward by `by`, delivering every timer that
    /// comes due in deadline order.
    pub fn advance(&mut self, by: Duration) -> Vec<SessionResponse> {
        let target = self.scheduler.elapsed() + by;
        let mut responses = Vec::new();
        while let Some(id) = self.scheduler.step(target) {
            responses.push(self.handle(SessionEvent::TimerFired(id)));
        }
        self.scheduler.settle(target);
        responses
    }
}
