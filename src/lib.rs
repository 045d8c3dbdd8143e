//! keyflow engine: pending-space candidates and long-press disambiguation
//! for an on-screen keyboard, exported to the host app through UniFFI.

uniffi::setup_scaffolding!();

pub mod api;
mod trace_init;

pub use keyflow_core::{layout, settings};
