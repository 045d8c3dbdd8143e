//! UniFFI export layer: bindings for the keyboard host app.
//!
//! Each public type here maps to a generated foreign class, record, enum or
//! callback trait.

mod host;
mod session;
mod types;

pub use host::{KfPreviewSurface, KfTextSurface, KfTimerHost};
pub use session::KfSession;
pub use types::{
    KfCandidate, KfCandidateAction, KfCandidateKind, KfError, KfKeyBounds, KfKeyFace, KfKeyId,
    KfOptionCell, KfResponse, KfUndoChip,
};

use std::path::Path;

// ---------------------------------------------------------------------------
// Top-level functions
// ---------------------------------------------------------------------------

#[uniffi::export]
fn engine_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[uniffi::export]
fn settings_load_config(path: String) -> Result<(), KfError> {
    let content = std::fs::read_to_string(&path).map_err(|e| KfError::Io {
        msg: format!("{path}: {e}"),
    })?;
    keyflow_core::settings::init_custom(content)
        .map_err(|e| KfError::InvalidData { msg: e.to_string() })?;
    Ok(())
}

#[uniffi::export]
fn settings_default_config() -> String {
    keyflow_core::settings::DEFAULT_SETTINGS_TOML.to_string()
}

#[uniffi::export]
fn layout_default_config() -> String {
    keyflow_core::layout::default_toml().to_string()
}

/// Validate a layout without building a session.
#[uniffi::export]
fn layout_validate(toml: String) -> Result<u32, KfError> {
    let layout = keyflow_core::layout::parse_layout_toml(&toml)
        .map_err(|e| KfError::InvalidData { msg: e.to_string() })?;
    Ok(layout.keys().count() as u32)
}

#[uniffi::export]
fn trace_init(log_dir: String) {
    crate::trace_init::init_tracing(Path::new(&log_dir));
}
