//! The edited document as seen from the keyboard.
//!
//! All offsets are caret-relative counts of `char`s; the engine never sees
//! absolute document positions.

use std::ops::{Deref, DerefMut};

/// Host document capability.
///
/// Reads return `None` when the host cannot answer (the field went away
/// between events). Writes on a disconnected host are expected to be ignored
/// by the implementation.
pub trait TextSurface {
    /// Up to `n` characters immediately before the caret.
    fn read_before(&self, n: usize) -> Option<String>;
    /// Up to `n` characters immediately after the caret.
    fn read_after(&self, n: usize) -> Option<String>;
    /// Insert `text` at the caret and move the caret past it.
    fn commit(&mut self, text: &str);
    /// Delete `before` characters before and `after` characters after the caret.
    fn delete_surrounding(&mut self, before: usize, after: usize);
    fn begin_batch(&mut self);
    fn end_batch(&mut self);

    fn send_enter(&mut self) {
        self.commit("\n");
    }

    /// Whether the host still answers. A write made while this is false is
    /// assumed lost.
    fn is_live(&self) -> bool {
        self.read_before(0).is_some()
    }
}

/// Batch-edit scope: the host observes every edit made through the guard as
/// one change. The batch is closed when the guard drops, on every exit path.
pub struct BatchEdit<'a, S: TextSurface + ?Sized> {
    surface: &'a mut S,
}

impl<'a, S: TextSurface + ?Sized> BatchEdit<'a, S> {
    pub fn begin(surface: &'a mut S) -> Self {
        surface.begin_batch();
        Self { surface }
    }
}

impl<S: TextSurface + ?Sized> Deref for BatchEdit<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.surface
    }
}

impl<S: TextSurface + ?Sized> DerefMut for BatchEdit<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.surface
    }
}

impl<S: TextSurface + ?Sized> Drop for BatchEdit<'_, S> {
    fn drop(&mut self) {
        self.surface.end_batch();
    }
}

/// `surface.scoped_batch()` for any surface, including trait objects.
pub trait ScopedBatch: TextSurface {
    fn scoped_batch(&mut self) -> BatchEdit<'_, Self>;
}

impl<S: TextSurface + ?Sized> ScopedBatch for S {
    fn scoped_batch(&mut self) -> BatchEdit<'_, Self> {
        BatchEdit::begin(self)
    }
}
