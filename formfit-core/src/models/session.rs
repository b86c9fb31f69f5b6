//! Exercise session models
//!
//! `SessionState` is the running view the UI polls during a workout;
//! `SessionSummary` is the frozen record handed to persistence once the
//! session finishes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::exercise::ExerciseType;
use super::form::FormClassification;
use super::motion::MotionClassification;

/// Session lifecycle; transitions are strictly Idle -> Active -> Finished
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    Idle,
    Active,
    Finished,
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionPhase::Idle => write!(f, "idle"),
            SessionPhase::Active => write!(f, "active"),
            SessionPhase::Finished => write!(f, "finished"),
        }
    }
}

/// Running state of an active session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub session_id: Uuid,
    pub exercise_type: ExerciseType,
    /// Blended accuracy percentage (0-100)
    pub smoothed_accuracy: f32,
    pub repetition_count: u32,
    pub calorie_estimate: f32,
    pub elapsed_seconds: f64,
    pub last_feedback: Option<String>,
    pub started_at: DateTime<Utc>,
}

/// Achievements a finished session qualifies for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Achievement {
    /// Finished with sustained high form accuracy
    PerfectForm,
}

impl Achievement {
    pub fn title(&self) -> &'static str {
        match self {
            Achievement::PerfectForm => "Perfect Form",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Achievement::PerfectForm => "Completed an exercise with 95%+ form accuracy",
        }
    }
}

/// Final snapshot of a finished session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub exercise_type: ExerciseType,
    pub final_accuracy: f32,
    pub repetition_count: u32,
    pub elapsed_seconds: f64,
    pub estimated_calories: f32,
    pub average_heart_rate: Option<f32>,
    pub peak_heart_rate: Option<f32>,
    pub achievements: Vec<Achievement>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Trigger for haptic/visual correction alerts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectiveFeedback {
    pub message: String,
    pub smoothed_accuracy: f32,
}

/// Either classifier's output, as folded into a session
#[derive(Debug, Clone, PartialEq)]
pub enum ClassificationEvent {
    Form(FormClassification),
    Motion(MotionClassification),
}

impl ClassificationEvent {
    /// Confidence in 0-1 used for accuracy smoothing
    pub fn confidence(&self) -> f32 {
        match self {
            ClassificationEvent::Form(form) => form.confidence,
            ClassificationEvent::Motion(motion) => motion.similarity_score,
        }
    }

    pub fn is_incorrect(&self) -> bool {
        match self {
            ClassificationEvent::Form(form) => form.is_incorrect(),
            ClassificationEvent::Motion(motion) => motion.is_incorrect(),
        }
    }
}

impl From<FormClassification> for ClassificationEvent {
    fn from(value: FormClassification) -> Self {
        ClassificationEvent::Form(value)
    }
}

impl From<MotionClassification> for ClassificationEvent {
    fn from(value: MotionClassification) -> Self {
        ClassificationEvent::Motion(value)
    }
}
