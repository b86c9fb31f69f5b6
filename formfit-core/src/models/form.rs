use serde::{Deserialize, Serialize};

use super::exercise::ExerciseType;

/// Form quality classes, most specific fault first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormQuality {
    Correct,
    ErrorDepth,
    ErrorKneeAlignment,
    ErrorBackPosture,
    ErrorGeneral,
    Unknown,
}

impl std::fmt::Display for FormQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormQuality::Correct => write!(f, "correct"),
            FormQuality::ErrorDepth => write!(f, "error-depth"),
            FormQuality::ErrorKneeAlignment => write!(f, "error-knee-alignment"),
            FormQuality::ErrorBackPosture => write!(f, "error-back-posture"),
            FormQuality::ErrorGeneral => write!(f, "error-general"),
            FormQuality::Unknown => write!(f, "unknown"),
        }
    }
}

/// Result of evaluating one pose snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormClassification {
    pub exercise_type: ExerciseType,
    pub quality: FormQuality,
    /// Classification confidence (0-1)
    pub confidence: f32,
    pub feedback_message: String,
}

impl FormClassification {
    pub fn is_correct(&self) -> bool {
        self.quality == FormQuality::Correct
    }

    /// A definite fault; `Unknown` is neither correct nor incorrect
    pub fn is_incorrect(&self) -> bool {
        !matches!(self.quality, FormQuality::Correct | FormQuality::Unknown)
    }
}
