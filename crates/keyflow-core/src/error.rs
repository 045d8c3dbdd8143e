/// Why an editing operation left the document untouched.
///
/// None of these are faults: they are the expected "nothing happened"
/// outcomes of a key press that no longer applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("no text surface is attached")]
    NoSurface,
    #[error("no text next to the caret")]
    NoContext,
    #[error("no join to undo")]
    NothingToUndo,
    #[error("text before the caret no longer matches the joined word")]
    StaleCaret,
    #[error("no pending space to settle")]
    NotArmed,
}
