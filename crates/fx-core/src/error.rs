use thiserror::Error;

/// Failures that cross a module boundary.
///
/// Degenerate numeric input is never an error: the math helpers clamp it.
/// Calls made after a surface or instance was released are silent no-ops.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FxError {
    /// The host had no measurable extent, or the backend context could not be created.
    #[error("surface unavailable: {0}")]
    SurfaceUnavailable(String),
    /// A backend call failed while drawing a frame.
    #[error("backend error: {0}")]
    Backend(String),
    /// Configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl FxError {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        FxError::SurfaceUnavailable(reason.into())
    }

    pub fn backend(reason: impl Into<String>) -> Self {
        FxError::Backend(reason.into())
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, FxError::SurfaceUnavailable(_))
    }
}

pub type FxResult<T> = Result<T, FxError>;
