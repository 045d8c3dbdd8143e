use tracing::{debug, debug_span};

use keyflow_core::{
    CandidateKind, KeyAnchor, KeyId, PreviewSurface, ScopedBatch, Scheduler, TextSurface,
    TimerId, TimerKind,
};

use super::pending_space::{Backspace, Expiry};
use super::types::{SessionEvent, SessionResponse, TouchEvent, UndoChip};
use super::KeyboardSession;

impl<S, P, T> KeyboardSession<S, P, T>
where
    S: TextSurface,
    P: PreviewSurface,
    T: Scheduler,
{
    /// Process one host event. Returns how the candidate bar and undo chip
    /// should change and what text reached the document.
    pub fn handle(&mut self, event: SessionEvent) -> SessionResponse {
        let _span = debug_span!("handle", ?event).entered();

        match event {
            SessionEvent::Touch { key, touch } => self.handle_touch(key, touch),
            SessionEvent::Space => self.handle_space(),
            SessionEvent::Delete => self.handle_delete(),
            SessionEvent::Enter => self.handle_enter(),
            SessionEvent::ToggleShift => {
                self.shift = !self.shift;
                debug!(shift = self.shift);
                self.gesture.set_shift(self.shift, &mut self.preview);
                SessionResponse::consumed()
            }
            SessionEvent::SelectCandidate(index) => self.handle_select(index),
            SessionEvent::UndoJoin => self.handle_undo(),
            SessionEvent::TimerFired(id) => self.handle_timer(id),
        }
    }

    fn handle_touch(&mut self, key: KeyId, touch: TouchEvent) -> SessionResponse {
        match touch {
            TouchEvent::Down { bounds } => {
                let Some(spec) = self.layout.key(key) else {
                    debug!(?key, "touch on unknown key");
                    return SessionResponse::not_consumed();
                };
                let anchor = KeyAnchor { key, bounds };
                self.gesture.on_down(
                    spec,
                    anchor,
                    self.shift,
                    &mut self.preview,
                    &mut self.scheduler,
                );
                SessionResponse::consumed()
            }
            TouchEvent::Move { x } => {
                self.gesture.on_move(x, &mut self.preview);
                SessionResponse::consumed()
            }
            TouchEvent::Up => match self.gesture.on_up(&mut self.preview, &mut self.scheduler) {
                Some(output) => self.commit_character(&output),
                None => SessionResponse::not_consumed(),
            },
            TouchEvent::Cancel => {
                self.gesture.on_cancel(&mut self.preview, &mut self.scheduler);
                SessionResponse::consumed()
            }
        }
    }

    /// A key press produced `output`: write it and refresh an open window's
    /// candidates against the moved caret.
    fn commit_character(&mut self, output: &str) -> SessionResponse {
        let mut resp = SessionResponse::consumed();
        self.shift = false;
        let Some(surface) = self.surface.as_mut().filter(|s| s.is_live()) else {
            debug!(%output, "no text surface, character dropped");
            return resp;
        };
        surface.commit(output);
        resp = resp.with_committed(output);

        if self.pending.join_context().is_some() {
            self.pending.forget_join();
            resp.undo = UndoChip::Hide;
        }
        if self.pending.is_armed() {
            let refreshed = self
                .pending
                .on_character_committed(output, self.surface.as_ref());
            resp.candidates = self.show_candidates(refreshed);
        } else if !self.candidates.is_empty() {
            resp.candidates = self.hide_candidates();
        }
        resp
    }

    fn handle_space(&mut self) -> SessionResponse {
        let mut resp = SessionResponse::consumed();
        if self.pending.join_context().is_some() {
            resp.undo = UndoChip::Hide;
        }
        let candidates = self
            .pending
            .on_space_pressed(self.surface.as_ref(), &mut self.scheduler);
        resp.candidates = self.show_candidates(candidates);
        resp
    }

    /// Backspace removes what the user sees: a character typed inside an open
    /// window, else the pending space itself, else the character before the
    /// caret.
    fn handle_delete(&mut self) -> SessionResponse {
        let mut resp = SessionResponse::consumed();
        resp.undo = UndoChip::Hide;
        self.pending.forget_join();

        let Some(surface) = self.surface.as_mut().filter(|s| s.is_live()) else {
            self.pending.reset(&mut self.scheduler);
            resp.candidates = self.hide_candidates();
            return resp;
        };
        match self.pending.on_backspace(&mut *surface, &mut self.scheduler) {
            Backspace::Idle => {
                surface.delete_surrounding(1, 0);
                resp.candidates = self.hide_candidates();
            }
            Backspace::Typed(candidates) => resp.candidates = self.show_candidates(candidates),
            Backspace::Withdrawn => resp.candidates = self.hide_candidates(),
        }
        resp
    }

    /// Enter settles an open window with its space first, in the same batch.
    fn handle_enter(&mut self) -> SessionResponse {
        let mut resp = SessionResponse::consumed();
        resp.candidates = self.hide_candidates();
        resp.undo = UndoChip::Hide;
        self.pending.forget_join();

        let Some(surface) = self.surface.as_mut().filter(|s| s.is_live()) else {
            self.pending.reset(&mut self.scheduler);
            return resp;
        };
        let mut batch = surface.scoped_batch();
        match self.pending.flush(Some(&mut *batch), &mut self.scheduler) {
            Ok(true) => resp = resp.with_committed(" "),
            Ok(false) => {}
            Err(e) => {
                debug!("flush before enter failed: {e}");
                self.pending.reset(&mut self.scheduler);
            }
        }
        batch.send_enter();
        resp.with_committed("\n")
    }

    fn handle_select(&mut self, index: usize) -> SessionResponse {
        let Some(candidate) = self.candidates.get(index).cloned() else {
            debug!(index, "no candidate at index");
            return SessionResponse::consumed();
        };
        let mut resp = SessionResponse::consumed();
        let applied =
            self.pending
                .apply_candidate(&candidate, self.surface.as_mut(), &mut self.scheduler);
        if applied {
            let text = match candidate.kind {
                CandidateKind::Join => self
                    .pending
                    .join_context()
                    .map(|ctx| ctx.joined())
                    .unwrap_or_default(),
                kind => kind.literal().unwrap_or_default().to_string(),
            };
            resp = resp.with_committed(text);
            resp.undo = if candidate.kind == CandidateKind::Join {
                UndoChip::Show
            } else {
                UndoChip::Hide
            };
            resp.candidates = self.hide_candidates();
        } else if !self.pending.is_armed() {
            resp.candidates = self.hide_candidates();
        }
        resp
    }

    fn handle_undo(&mut self) -> SessionResponse {
        let mut resp = SessionResponse::consumed();
        let spaced = self.pending.join_context().map(|ctx| ctx.spaced());
        if self.pending.undo_last_join(self.surface.as_mut()) {
            if let Some(text) = spaced {
                resp = resp.with_committed(text);
            }
        }
        resp.undo = UndoChip::Hide;
        resp
    }

    fn handle_timer(&mut self, id: TimerId) -> SessionResponse {
        match id.kind {
            TimerKind::PendingSpace => match self.pending.on_timer_fired(id, self.surface.as_mut()) {
                Expiry::Stale => SessionResponse::not_consumed(),
                Expiry::Committed => {
                    let mut resp = SessionResponse::consumed().with_committed(" ");
                    resp.candidates = self.hide_candidates();
                    resp
                }
                Expiry::Dropped => {
                    let mut resp = SessionResponse::consumed();
                    resp.candidates = self.hide_candidates();
                    resp
                }
            },
            TimerKind::LongPress => {
                if self.gesture.on_long_press(id, &mut self.preview) {
                    SessionResponse::consumed()
                } else {
                    SessionResponse::not_consumed()
                }
            }
        }
    }
}
