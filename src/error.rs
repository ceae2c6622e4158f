use thiserror::Error;

/// Failures surfaced to the user. Every variant renders as one line and
/// none of them ends the session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BrowserError {
    /// The provider could not fetch or build the document.
    #[error("Error loading page: {0}")]
    LoadFailure(String),

    /// Walking a valid document failed.
    #[error("Error rendering page: {0}")]
    RenderFailure(String),

    /// The selected index is not in the current registry.
    #[error("No element with index {0}")]
    UnknownIndex(i64),

    /// The selected element cannot be acted on (images).
    #[error("Element [{0}] is not interactive")]
    NotInteractive(usize),

    /// The provider rejected or failed an action.
    #[error("Error interacting with element: {0}")]
    ActionFailure(String),

    /// An input was selected without a value to write.
    #[error("Input [{index}] needs a value")]
    ValueRequired { index: usize, input_type: String },
}
