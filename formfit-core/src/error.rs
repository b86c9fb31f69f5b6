use thiserror::Error;

use crate::models::SessionPhase;

/// Contract violations in the geometry primitives
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("Vector length mismatch: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },
}

/// Illegal session lifecycle transitions
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error("Session has not been started")]
    NotStarted,
    #[error("Session is already active")]
    AlreadyActive,
    #[error("Session already finished")]
    AlreadyFinished,
}

impl SessionError {
    /// Error for attempting to start from the given phase
    pub fn for_start(phase: SessionPhase) -> Option<Self> {
        match phase {
            SessionPhase::Idle => None,
            SessionPhase::Active => Some(SessionError::AlreadyActive),
            SessionPhase::Finished => Some(SessionError::AlreadyFinished),
        }
    }
}
