//! Building blocks for the keyflow input-method engine.
//!
//! Everything here is free of engine state: the host capabilities
//! (`TextSurface`, `PreviewSurface`, `Scheduler`), the candidate resolver,
//! casing and geometry rules, key specs and settings. The state machines that
//! drive them live in `keyflow-session`.

pub mod candidate;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod memory;
pub mod preview;
pub mod settings;
pub mod surface;
pub mod timer;
pub mod unicode;

pub use candidate::{Candidate, CandidateKind, CandidateResolver, JoinContext};
pub use error::EditError;
pub use geometry::{nearest, KeyBounds, OptionCell, OptionRow, PopupGeometry};
pub use layout::{Augmentation, KeyFace, KeyId, KeySpec, KeyboardSpec, RowSpec, Script};
pub use memory::MemorySurface;
pub use preview::{KeyAnchor, PreviewCommand, PreviewState, PreviewSurface, RecordingPreview};
pub use surface::{BatchEdit, ScopedBatch, TextSurface};
pub use timer::{ManualScheduler, Scheduler, TimerId, TimerKind, TimerSlot};
