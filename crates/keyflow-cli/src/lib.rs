//! Diagnostics for the keyflow engine: script replay, candidate inspection
//! and layout/settings validation.

pub mod commands;
pub mod replay;
