//! Host capabilities implemented on the foreign side, and the adapters that
//! present them to the engine.
//!
//! Counts and indices cross the boundary as `u32`; timer ids as their packed
//! `u64` form.

use std::sync::Arc;
use std::time::{Duration, Instant};

use keyflow_core::{
    KeyAnchor, OptionRow, PreviewSurface, Scheduler, TextSurface, TimerId,
};

use super::types::{KfKeyBounds, KfKeyId, KfOptionCell};

/// The document being edited (an input connection).
#[uniffi::export(with_foreign)]
pub trait KfTextSurface: Send + Sync {
    /// Up to `n` characters before the caret, or `None` when unavailable.
    fn read_before(&self, n: u32) -> Option<String>;
    fn read_after(&self, n: u32) -> Option<String>;
    fn commit(&self, text: String);
    fn delete_surrounding(&self, before: u32, after: u32);
    fn begin_batch(&self);
    fn end_batch(&self);
    fn send_enter(&self);
}

/// The press-time bubble above a key.
#[uniffi::export(with_foreign)]
pub trait KfPreviewSurface: Send + Sync {
    fn show_single(&self, key: KfKeyId, bounds: KfKeyBounds, text: String);
    fn show_multi(
        &self,
        key: KfKeyId,
        bounds: KfKeyBounds,
        left: f32,
        width: f32,
        options: Vec<KfOptionCell>,
        selected: u32,
    );
    fn update_selection(&self, index: u32);
    fn hide_all(&self);
}

/// One-shot timers on the host's UI loop. A fired timer must be delivered
/// back through `KfSession::timer_fired` from a later turn of the loop,
/// never from inside `schedule`.
#[uniffi::export(with_foreign)]
pub trait KfTimerHost: Send + Sync {
    fn schedule(&self, timer: u64, delay_ms: u64);
    fn cancel(&self, timer: u64);
}

fn to_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

pub(super) struct ForeignSurface(pub(super) Arc<dyn KfTextSurface>);

impl TextSurface for ForeignSurface {
    fn read_before(&self, n: usize) -> Option<String> {
        self.0.read_before(to_u32(n))
    }

    fn read_after(&self, n: usize) -> Option<String> {
        self.0.read_after(to_u32(n))
    }

    fn commit(&mut self, text: &str) {
        self.0.commit(text.to_string());
    }

    fn delete_surrounding(&mut self, before: usize, after: usize) {
        self.0.delete_surrounding(to_u32(before), to_u32(after));
    }

    fn begin_batch(&mut self) {
        self.0.begin_batch();
    }

    fn end_batch(&mut self) {
        self.0.end_batch();
    }

    fn send_enter(&mut self) {
        self.0.send_enter();
    }
}

pub(super) struct ForeignPreview(pub(super) Arc<dyn KfPreviewSurface>);

impl PreviewSurface for ForeignPreview {
    fn show_single(&mut self, anchor: &KeyAnchor, text: &str) {
        self.0
            .show_single(anchor.key.into(), anchor.bounds.into(), text.to_string());
    }

    fn show_multi(&mut self, anchor: &KeyAnchor, row: &OptionRow, selected: usize) {
        let options = row
            .cells
            .iter()
            .map(|c| KfOptionCell {
                center_x: c.center_x,
                value: c.value.clone(),
            })
            .collect();
        self.0.show_multi(
            anchor.key.into(),
            anchor.bounds.into(),
            row.left,
            row.width,
            options,
            to_u32(selected),
        );
    }

    fn update_selection(&mut self, index: usize) {
        self.0.update_selection(to_u32(index));
    }

    fn hide_all(&mut self) {
        self.0.hide_all();
    }
}

pub(super) struct ForeignScheduler(pub(super) Arc<dyn KfTimerHost>);

impl Scheduler for ForeignScheduler {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn schedule(&mut self, id: TimerId, delay: Duration) {
        let delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self.0.schedule(id.to_bits(), delay_ms);
    }

    fn cancel(&mut self, id: TimerId) {
        self.0.cancel(id.to_bits());
    }
}
