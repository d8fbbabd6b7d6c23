use thiserror::Error;

pub type Result<T> = std::result::Result<T, ModeError>;

/// Unified error type for the video-mode core.
///
/// Every variant is fatal to the run that produced it: a half-applied,
/// invalid display mode is worse than aborting, so nothing here is retried
/// or partially applied.
#[derive(Debug, Error)]
pub enum ModeError {
    /// Scan-rate derivation rejected the geometry/timing (zero total scan
    /// period on either axis, or a zero pixel clock).
    #[error("bad video mode `{}`", name.as_deref().unwrap_or("<current>"))]
    InvalidMode { name: Option<String> },

    #[error("duplicate mode name `{0}`")]
    DuplicateModeName(String),

    #[error("unknown video mode `{0}`")]
    UnknownModeName(String),

    /// A margin shift would have pushed the named margin below zero.
    #[error("the {0} margin cannot be negative")]
    NegativeMargin(&'static str),

    #[error("invalid direction `{0}`")]
    InvalidDirection(String),

    /// A boolean-like field value was not one of the recognized tokens
    /// (`true`/`false`, `high`/`low`, `1`/`0`).
    #[error("invalid value `{0}`")]
    InvalidBooleanLiteral(String),
}
