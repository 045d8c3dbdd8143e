//! Deferred space commit.
//!
//! A space press arms a short window instead of committing. Inside the
//! window the user may pick a candidate that joins the flanking words or
//! swaps the space for punctuation; when the window expires a plain space is
//! committed. Exactly one of those reaches the document per window.

use std::time::{Duration, Instant};

use tracing::debug;

use keyflow_core::settings::Settings;
use keyflow_core::{
    Candidate, CandidateKind, CandidateResolver, EditError, JoinContext, ScopedBatch, Scheduler,
    TextSurface, TimerId, TimerKind, TimerSlot,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingSpaceState {
    Idle,
    Armed { deadline: Instant },
}

/// What a pending-space timer firing did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    /// Not the outstanding timer; nothing changed.
    Stale,
    /// The window closed with a literal space.
    Committed,
    /// The window closed but the surface was gone, so nothing was written.
    Dropped,
}

/// What a backspace did to the window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backspace {
    /// No window is open; the caller deletes as usual.
    Idle,
    /// A character typed inside the window was removed. The window stays
    /// open and these are its refreshed candidates.
    Typed(Vec<Candidate>),
    /// Nothing typed since the space press, so the space itself was taken
    /// back and the window closed without writing.
    Withdrawn,
}

pub struct PendingSpaceMachine {
    state: PendingSpaceState,
    join: Option<JoinContext>,
    typed: usize,
    timer: TimerSlot,
    timeout: Duration,
    resolver: CandidateResolver,
}

impl PendingSpaceMachine {
    pub fn new(timeout: Duration, resolver: CandidateResolver) -> Self {
        Self {
            state: PendingSpaceState::Idle,
            join: None,
            typed: 0,
            timer: TimerSlot::new(TimerKind::PendingSpace),
            timeout,
            resolver,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.pending_space.timeout(),
            CandidateResolver::from_settings(settings),
        )
    }

    pub fn state(&self) -> PendingSpaceState {
        self.state
    }

    pub fn is_armed(&self) -> bool {
        matches!(self.state, PendingSpaceState::Armed { .. })
    }

    pub fn join_context(&self) -> Option<&JoinContext> {
        self.join.as_ref()
    }

    pub fn outstanding_timer(&self) -> Option<TimerId> {
        self.timer.outstanding()
    }

    pub fn resolver(&self) -> &CandidateResolver {
        &self.resolver
    }

    /// Arm (or re-arm) the window and return the candidates to display.
    /// Nothing is committed yet.
    pub fn on_space_pressed<S, T>(&mut self, surface: Option<&S>, scheduler: &mut T) -> Vec<Candidate>
    where
        S: TextSurface + ?Sized,
        T: Scheduler + ?Sized,
    {
        let Some(surface) = surface else {
            debug!("space pressed without a text surface");
            return Vec::new();
        };
        self.join = None;
        self.typed = 0;
        let id = self.timer.arm(scheduler, self.timeout);
        let deadline = scheduler.now() + self.timeout;
        self.state = PendingSpaceState::Armed { deadline };
        debug!(?id, "pending space armed");
        self.resolver.generate(Some(surface))
    }

    /// Refresh the candidates after `committed` landed at the caret. The
    /// window's timing is left alone. Empty when no window is open.
    pub fn on_character_committed<S>(&mut self, committed: &str, surface: Option<&S>) -> Vec<Candidate>
    where
        S: TextSurface + ?Sized,
    {
        match surface {
            Some(surface) if self.is_armed() => {
                self.typed += committed.chars().count();
                self.resolver.generate(Some(surface))
            }
            _ => Vec::new(),
        }
    }

    /// Backspace while a window may be open. Characters typed inside the
    /// window go first; once none are left the pending space itself is
    /// withdrawn.
    pub fn on_backspace<S, T>(&mut self, surface: &mut S, scheduler: &mut T) -> Backspace
    where
        S: TextSurface + ?Sized,
        T: Scheduler + ?Sized,
    {
        if !self.is_armed() {
            return Backspace::Idle;
        }
        if self.typed == 0 {
            self.settle(scheduler);
            debug!("pending space withdrawn");
            return Backspace::Withdrawn;
        }
        surface.delete_surrounding(1, 0);
        self.typed -= 1;
        Backspace::Typed(self.resolver.generate(Some(&*surface)))
    }

    /// The deadline fired: commit the literal space if this is still the
    /// outstanding window.
    pub fn on_timer_fired<S>(&mut self, id: TimerId, surface: Option<&mut S>) -> Expiry
    where
        S: TextSurface + ?Sized,
    {
        if !self.timer.claim(id) {
            return Expiry::Stale;
        }
        self.state = PendingSpaceState::Idle;
        self.typed = 0;
        match surface {
            Some(surface) if surface.is_live() => {
                surface.commit(" ");
                debug!("pending space committed on timeout");
                Expiry::Committed
            }
            _ => {
                debug!("pending space expired without a text surface");
                Expiry::Dropped
            }
        }
    }

    /// Close the window with `candidate`. See [`PendingSpaceMachine::apply_candidate`].
    pub fn try_apply_candidate<S, T>(
        &mut self,
        candidate: &Candidate,
        surface: Option<&mut S>,
        scheduler: &mut T,
    ) -> Result<(), EditError>
    where
        S: TextSurface + ?Sized,
        T: Scheduler + ?Sized,
    {
        let surface = surface
            .filter(|s| s.is_live())
            .ok_or(EditError::NoSurface)?;
        if !self.is_armed() {
            return Err(EditError::NotArmed);
        }
        match candidate.kind {
            CandidateKind::Join => {
                let ctx = self
                    .resolver
                    .extract(&*surface)
                    .filter(|ctx| !ctx.is_empty())
                    .ok_or(EditError::NoContext)?;
                {
                    let mut batch = surface.scoped_batch();
                    batch.delete_surrounding(ctx.left_len(), ctx.right_len());
                    batch.commit(&ctx.joined());
                }
                debug!(left = %ctx.left, right = %ctx.right, "joined");
                self.settle(scheduler);
                self.join = Some(ctx);
            }
            kind => {
                let literal = kind.literal().unwrap_or(" ");
                surface.commit(literal);
                debug!(?kind, "pending space replaced");
                self.settle(scheduler);
                self.join = None;
            }
        }
        Ok(())
    }

    /// Apply a candidate chosen from the bar. Returns whether the document
    /// changed; a failure leaves the document and the window untouched.
    pub fn apply_candidate<S, T>(
        &mut self,
        candidate: &Candidate,
        surface: Option<&mut S>,
        scheduler: &mut T,
    ) -> bool
    where
        S: TextSurface + ?Sized,
        T: Scheduler + ?Sized,
    {
        match self.try_apply_candidate(candidate, surface, scheduler) {
            Ok(()) => true,
            Err(e) => {
                debug!(kind = ?candidate.kind, "candidate dropped: {e}");
                false
            }
        }
    }

    /// Close an open window with its plain-space fallback. `Ok(false)` when
    /// there was no window.
    pub fn flush<S, T>(&mut self, surface: Option<&mut S>, scheduler: &mut T) -> Result<bool, EditError>
    where
        S: TextSurface + ?Sized,
        T: Scheduler + ?Sized,
    {
        if !self.is_armed() {
            return Ok(false);
        }
        let space = Candidate {
            kind: CandidateKind::Space,
            render_text: String::new(),
        };
        self.try_apply_candidate(&space, surface, scheduler)
            .map(|()| true)
    }

    /// Put the last join back as two words. The caret must still sit right
    /// after the joined word; otherwise the undo is dropped untouched. The
    /// join is forgotten either way.
    pub fn try_undo_last_join<S>(&mut self, surface: Option<&mut S>) -> Result<(), EditError>
    where
        S: TextSurface + ?Sized,
    {
        let surface = surface.ok_or(EditError::NoSurface)?;
        let ctx = self.join.take().ok_or(EditError::NothingToUndo)?;
        let joined = ctx.joined();
        let len = ctx.left_len() + ctx.right_len();
        let before = surface.read_before(len).ok_or(EditError::NoSurface)?;
        if before != joined {
            return Err(EditError::StaleCaret);
        }
        let mut batch = surface.scoped_batch();
        batch.delete_surrounding(len, 0);
        batch.commit(&ctx.spaced());
        debug!(left = %ctx.left, right = %ctx.right, "join undone");
        Ok(())
    }

    pub fn undo_last_join<S>(&mut self, surface: Option<&mut S>) -> bool
    where
        S: TextSurface + ?Sized,
    {
        match self.try_undo_last_join(surface) {
            Ok(()) => true,
            Err(e) => {
                debug!("undo dropped: {e}");
                false
            }
        }
    }

    /// Drop the undo record, e.g. after the user edited past the join.
    pub fn forget_join(&mut self) {
        self.join = None;
    }

    /// Close the window without writing anything and forget the join.
    /// Used when the host document goes away.
    pub fn reset<T: Scheduler + ?Sized>(&mut self, scheduler: &mut T) {
        self.settle(scheduler);
        self.join = None;
    }

    fn settle<T: Scheduler + ?Sized>(&mut self, scheduler: &mut T) {
        self.timer.disarm(scheduler);
        self.state = PendingSpaceState::Idle;
        self.typed = 0;
    }
}
