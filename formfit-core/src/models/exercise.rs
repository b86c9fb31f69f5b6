use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Exercise types supported by the analyzers
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ExerciseType {
    Squat,
    PushUp,
    Lunge,
    Plank,
    Other(String),
}

impl ExerciseType {
    /// Exercises with built-in rules and reference patterns
    pub fn known() -> [ExerciseType; 4] {
        [
            ExerciseType::Squat,
            ExerciseType::PushUp,
            ExerciseType::Lunge,
            ExerciseType::Plank,
        ]
    }

    /// Rough energy cost of one completed repetition (kcal)
    pub fn calories_per_rep(&self) -> f32 {
        match self {
            ExerciseType::Squat => 0.32,
            ExerciseType::PushUp => 0.29,
            ExerciseType::Lunge => 0.30,
            ExerciseType::Plank => 0.0,
            ExerciseType::Other(_) => 0.25,
        }
    }

    /// Baseline energy cost of time under tension (kcal per minute)
    pub fn calories_per_minute(&self) -> f32 {
        match self {
            ExerciseType::Squat => 5.0,
            ExerciseType::PushUp => 7.0,
            ExerciseType::Lunge => 5.5,
            ExerciseType::Plank => 4.0,
            ExerciseType::Other(_) => 4.5,
        }
    }
}

impl std::fmt::Display for ExerciseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExerciseType::Squat => write!(f, "squat"),
            ExerciseType::PushUp => write!(f, "push-up"),
            ExerciseType::Lunge => write!(f, "lunge"),
            ExerciseType::Plank => write!(f, "plank"),
            ExerciseType::Other(s) => write!(f, "{}", s),
        }
    }
}

impl FromStr for ExerciseType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Ok(match normalized.as_str() {
            "squat" => ExerciseType::Squat,
            "push-up" | "pushup" | "push_up" => ExerciseType::PushUp,
            "lunge" => ExerciseType::Lunge,
            "plank" => ExerciseType::Plank,
            _ => ExerciseType::Other(s.trim().to_string()),
        })
    }
}

impl From<String> for ExerciseType {
    fn from(value: String) -> Self {
        match value.parse() {
            Ok(exercise) => exercise,
            Err(never) => match never {},
        }
    }
}

impl From<ExerciseType> for String {
    fn from(value: ExerciseType) -> Self {
        value.to_string()
    }
}
