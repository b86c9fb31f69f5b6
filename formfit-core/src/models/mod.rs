pub mod exercise;
pub mod form;
pub mod keypoint;
pub mod motion;
pub mod session;

pub use exercise::ExerciseType;
pub use form::{FormClassification, FormQuality};
pub use keypoint::{Keypoint, KeypointId, PoseSnapshot};
pub use motion::{
    InertialSample, MotionClassification, MotionErrorType, PatternLabel, PatternType,
    ReferencePattern,
};
pub use session::{
    Achievement, ClassificationEvent, CorrectiveFeedback, SessionPhase, SessionState,
    SessionSummary,
};
