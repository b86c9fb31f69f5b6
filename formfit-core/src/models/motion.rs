//! Inertial sample and motion classification models

use serde::{Deserialize, Serialize};

use super::exercise::ExerciseType;

/// One wearable tick: 3-axis accelerometer and gyroscope readings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InertialSample {
    pub acceleration: [f32; 3],
    pub gyroscope: [f32; 3],
    /// Capture timestamp in milliseconds
    #[serde(default)]
    pub timestamp_ms: u64,
}

impl InertialSample {
    pub fn new(acceleration: [f32; 3], gyroscope: [f32; 3]) -> Self {
        Self {
            acceleration,
            gyroscope,
            timestamp_ms: 0,
        }
    }
}

/// Label attached to a stored reference pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternLabel {
    Correct,
    Incorrect,
}

/// A labeled inertial sample owned by the pattern library
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferencePattern {
    pub exercise_type: ExerciseType,
    pub label: PatternLabel,
    /// Movement phase this sample represents (e.g. "descent")
    pub phase: String,
    pub sample: InertialSample,
}

/// Outcome of matching a live sample against the library
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternType {
    Correct,
    Incorrect,
    Unknown,
}

impl std::fmt::Display for PatternType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PatternType::Correct => write!(f, "correct"),
            PatternType::Incorrect => write!(f, "incorrect"),
            PatternType::Unknown => write!(f, "unknown"),
        }
    }
}

impl From<PatternLabel> for PatternType {
    fn from(label: PatternLabel) -> Self {
        match label {
            PatternLabel::Correct => PatternType::Correct,
            PatternLabel::Incorrect => PatternType::Incorrect,
        }
    }
}

/// Specific motion fault
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MotionErrorType {
    None,
    TooFast,
    TooSlow,
    WrongAngle,
    IncompleteRange,
}

impl std::fmt::Display for MotionErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MotionErrorType::None => write!(f, "none"),
            MotionErrorType::TooFast => write!(f, "too-fast"),
            MotionErrorType::TooSlow => write!(f, "too-slow"),
            MotionErrorType::WrongAngle => write!(f, "wrong-angle"),
            MotionErrorType::IncompleteRange => write!(f, "incomplete-range"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionClassification {
    pub exercise_type: ExerciseType,
    pub pattern_type: PatternType,
    pub error_type: MotionErrorType,
    /// Best similarity against the library (0-1)
    pub similarity_score: f32,
    /// Phase of the winning reference pattern, if any
    pub matched_phase: Option<String>,
}

impl MotionClassification {
    /// Result for an exercise the library has no patterns for
    pub fn unknown(exercise_type: ExerciseType) -> Self {
        Self {
            exercise_type,
            pattern_type: PatternType::Unknown,
            error_type: MotionErrorType::None,
            similarity_score: 0.0,
            matched_phase: None,
        }
    }

    pub fn is_correct(&self) -> bool {
        self.pattern_type == PatternType::Correct
    }

    pub fn is_incorrect(&self) -> bool {
        self.pattern_type == PatternType::Incorrect
    }
}
