use keyflow_core::{Candidate, PreviewSurface, Scheduler, TextSurface};

use super::types::CandidateAction;
use super::KeyboardSession;

impl<S, P, T> KeyboardSession<S, P, T>
where
    S: TextSurface,
    P: PreviewSurface,
    T: Scheduler,
{
    /// Remember `candidates` as the displayed list. An empty list hides the bar.
    pub(super) fn show_candidates(&mut self, candidates: Vec<Candidate>) -> CandidateAction {
        if candidates.is_empty() {
            return self.hide_candidates();
        }
        self.candidates = candidates.clone();
        CandidateAction::Show(candidates)
    }

    pub(super) fn hide_candidates(&mut self) -> CandidateAction {
        self.candidates.clear();
        CandidateAction::Hide
    }
}
