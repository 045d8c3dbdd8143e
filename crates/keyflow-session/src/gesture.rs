//! Press-duration disambiguation for a single key.
//!
//! A touch starts as a short press showing the key's own character. If it is
//! held past the long-press delay and the key has alternates, it escalates to
//! an option row and horizontal motion picks among them. Lifting commits
//! whatever the preview shows at that moment.

use std::time::Duration;

use tracing::debug;

use keyflow_core::geometry::{OptionRow, PopupGeometry};
use keyflow_core::layout::derive_alternates;
use keyflow_core::settings::Settings;
use keyflow_core::unicode::output_case;
use keyflow_core::{
    Augmentation, KeyAnchor, KeySpec, PreviewSurface, Scheduler, TimerId, TimerKind, TimerSlot,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressPhase {
    HeldShort,
    HeldLong,
}

#[derive(Debug, Clone, PartialEq)]
enum Phase {
    HeldShort,
    HeldLong { row: OptionRow, selected: usize },
}

/// State of the finger currently on a key.
#[derive(Debug, Clone, PartialEq)]
pub struct PressState {
    key: KeySpec,
    anchor: KeyAnchor,
    shift: bool,
    phase: Phase,
}

impl PressState {
    pub fn key(&self) -> &KeySpec {
        &self.key
    }

    pub fn anchor(&self) -> &KeyAnchor {
        &self.anchor
    }

    pub fn phase(&self) -> PressPhase {
        match self.phase {
            Phase::HeldShort => PressPhase::HeldShort,
            Phase::HeldLong { .. } => PressPhase::HeldLong,
        }
    }

    pub fn options(&self) -> Option<&OptionRow> {
        match &self.phase {
            Phase::HeldShort => None,
            Phase::HeldLong { row, .. } => Some(row),
        }
    }

    pub fn selected_index(&self) -> Option<usize> {
        match self.phase {
            Phase::HeldShort => None,
            Phase::HeldLong { selected, .. } => Some(selected),
        }
    }

    /// What lifting the finger now would commit.
    pub fn current_output(&self) -> String {
        match &self.phase {
            Phase::HeldShort => output_case(&self.key.base_label, self.shift),
            Phase::HeldLong { row, selected } => row.get(*selected).unwrap_or_default().to_string(),
        }
    }
}

pub struct GestureDisambiguator {
    press: Option<PressState>,
    timer: TimerSlot,
    long_press: Duration,
    popup: PopupGeometry,
    augmentation: Augmentation,
}

impl GestureDisambiguator {
    pub fn new(long_press: Duration, popup: PopupGeometry, augmentation: Augmentation) -> Self {
        Self {
            press: None,
            timer: TimerSlot::new(TimerKind::LongPress),
            long_press,
            popup,
            augmentation,
        }
    }

    pub fn from_settings(settings: &Settings, augmentation: Augmentation) -> Self {
        Self::new(
            settings.gesture.long_press(),
            settings.popup.geometry(),
            augmentation,
        )
    }

    pub fn press(&self) -> Option<&PressState> {
        self.press.as_ref()
    }

    pub fn outstanding_timer(&self) -> Option<TimerId> {
        self.timer.outstanding()
    }

    pub fn set_augmentation(&mut self, augmentation: Augmentation) {
        self.augmentation = augmentation;
    }

    pub fn set_screen_width(&mut self, width: f32) {
        self.popup.screen_width = width;
    }

    /// Finger down on `key`: show its character and start the long-press timer.
    /// A press still in flight is cancelled first.
    pub fn on_down<P, T>(
        &mut self,
        key: &KeySpec,
        anchor: KeyAnchor,
        shift: bool,
        preview: &mut P,
        scheduler: &mut T,
    ) where
        P: PreviewSurface + ?Sized,
        T: Scheduler + ?Sized,
    {
        if self.press.is_some() {
            debug!("new press replaces an unfinished one");
            self.on_cancel(preview, scheduler);
        }
        let press = PressState {
            key: key.clone(),
            anchor,
            shift,
            phase: Phase::HeldShort,
        };
        preview.show_single(&anchor, &press.current_output());
        let id = self.timer.arm(scheduler, self.long_press);
        debug!(label = %key.base_label, ?id, "press started");
        self.press = Some(press);
    }

    /// The long-press delay elapsed. Escalates to the option row when the key
    /// has alternates; returns whether it did.
    pub fn on_long_press<P>(&mut self, id: TimerId, preview: &mut P) -> bool
    where
        P: PreviewSurface + ?Sized,
    {
        if !self.timer.claim(id) {
            return false;
        }
        let Some(press) = self.press.as_mut() else {
            return false;
        };
        if !matches!(press.phase, Phase::HeldShort) {
            return false;
        }
        let options = cased_alternates(&press.key, &self.augmentation, press.shift);
        if options.is_empty() {
            debug!(label = %press.key.base_label, "no alternates, staying on short press");
            return false;
        }
        let row = OptionRow::layout(press.anchor.bounds, options, &self.popup);
        preview.show_multi(&press.anchor, &row, 0);
        debug!(count = row.len(), "press escalated");
        press.phase = Phase::HeldLong { row, selected: 0 };
        true
    }

    /// Shift changed while a finger may be down. The live preview is redrawn
    /// in the new case so lifting commits what is shown.
    pub fn set_shift<P>(&mut self, shift: bool, preview: &mut P)
    where
        P: PreviewSurface + ?Sized,
    {
        let Some(press) = self.press.as_mut() else {
            return;
        };
        if press.shift == shift {
            return;
        }
        press.shift = shift;
        match &mut press.phase {
            Phase::HeldShort => {
                let output = output_case(&press.key.base_label, shift);
                preview.show_single(&press.anchor, &output);
            }
            Phase::HeldLong { row, selected } => {
                let options = cased_alternates(&press.key, &self.augmentation, shift);
                *row = OptionRow::layout(press.anchor.bounds, options, &self.popup);
                preview.show_multi(&press.anchor, row, *selected);
            }
        }
        debug!(shift, "live press re-cased");
    }

    /// Finger moved to screen `x`. Only an escalated press reacts. Returns the
    /// selected index.
    pub fn on_move<P>(&mut self, x: f32, preview: &mut P) -> Option<usize>
    where
        P: PreviewSurface + ?Sized,
    {
        let press = self.press.as_mut()?;
        let Phase::HeldLong { row, selected } = &mut press.phase else {
            return None;
        };
        let index = row.select(x)?;
        if index != *selected {
            *selected = index;
            preview.update_selection(index);
        }
        Some(index)
    }

    /// Finger lifted: the previewed value is the output.
    pub fn on_up<P, T>(&mut self, preview: &mut P, scheduler: &mut T) -> Option<String>
    where
        P: PreviewSurface + ?Sized,
        T: Scheduler + ?Sized,
    {
        let press = self.press.take()?;
        self.timer.disarm(scheduler);
        preview.hide_all();
        let output = press.current_output();
        debug!(%output, phase = ?press.phase(), "press committed");
        Some(output)
    }

    /// Touch cancelled: nothing is committed.
    pub fn on_cancel<P, T>(&mut self, preview: &mut P, scheduler: &mut T)
    where
        P: PreviewSurface + ?Sized,
        T: Scheduler + ?Sized,
    {
        self.timer.disarm(scheduler);
        if self.press.take().is_some() {
            preview.hide_all();
            debug!("press cancelled");
        }
    }
}

fn cased_alternates(key: &KeySpec, augmentation: &Augmentation, shift: bool) -> Vec<String> {
    derive_alternates(key, augmentation)
        .iter()
        .map(|o| output_case(o, shift))
        .collect()
}
