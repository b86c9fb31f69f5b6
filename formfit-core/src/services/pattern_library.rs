//! Pattern Library
//!
//! Owns the canonical inertial reference patterns for each exercise. The
//! table is seeded once at construction and never mutated afterwards, so a
//! library can be shared freely across threads behind an `Arc`.

use std::collections::HashMap;

use crate::models::{ExerciseType, InertialSample, PatternLabel, ReferencePattern};

/// Built-in reference table: (exercise, phase, acceleration, gyroscope)
const BUILT_IN_PATTERNS: &[(ExerciseKey, &str, [f32; 3], [f32; 3])] = &[
    // Squat: standing, moving down, momentary pause at the bottom
    (ExerciseKey::Squat, "start", [0.0, 0.0, 9.8], [0.0, 0.0, 0.0]),
    (ExerciseKey::Squat, "descent", [0.0, -2.0, 9.5], [0.5, 0.0, 0.0]),
    (ExerciseKey::Squat, "bottom", [0.0, 0.0, 9.8], [0.0, 0.0, 0.0]),
    // Lunge: step forward, lower, drive back up
    (ExerciseKey::Lunge, "start", [0.0, 0.0, 9.8], [0.0, 0.0, 0.0]),
    (ExerciseKey::Lunge, "descent", [0.8, -1.5, 9.6], [0.3, 0.2, 0.0]),
    (ExerciseKey::Lunge, "bottom", [0.0, 0.0, 9.8], [0.0, 0.1, 0.0]),
    // Push-up: wrist-worn, body horizontal
    (ExerciseKey::PushUp, "top", [0.0, 9.8, 0.0], [0.0, 0.0, 0.0]),
    (ExerciseKey::PushUp, "descent", [0.0, 8.2, -1.2], [0.4, 0.0, 0.0]),
    (ExerciseKey::PushUp, "bottom", [0.0, 9.8, 0.0], [0.0, 0.0, 0.0]),
    // Plank: static hold
    (ExerciseKey::Plank, "hold", [0.0, 9.8, 0.0], [0.0, 0.0, 0.0]),
];

#[derive(Debug, Clone, Copy)]
enum ExerciseKey {
    Squat,
    Lunge,
    PushUp,
    Plank,
}

impl From<ExerciseKey> for ExerciseType {
    fn from(key: ExerciseKey) -> Self {
        match key {
            ExerciseKey::Squat => ExerciseType::Squat,
            ExerciseKey::Lunge => ExerciseType::Lunge,
            ExerciseKey::PushUp => ExerciseType::PushUp,
            ExerciseKey::Plank => ExerciseType::Plank,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PatternLibrary {
    patterns: HashMap<ExerciseType, Vec<ReferencePattern>>,
}

impl PatternLibrary {
    /// Create a library seeded from the built-in table
    pub fn new() -> Self {
        let mut patterns: HashMap<ExerciseType, Vec<ReferencePattern>> = HashMap::new();

        for (key, phase, acceleration, gyroscope) in BUILT_IN_PATTERNS {
            let exercise_type = ExerciseType::from(*key);
            patterns
                .entry(exercise_type.clone())
                .or_default()
                .push(ReferencePattern {
                    exercise_type,
                    label: PatternLabel::Correct,
                    phase: phase.to_string(),
                    sample: InertialSample::new(*acceleration, *gyroscope),
                });
        }

        tracing::debug!(
            "Pattern library initialized with {} exercise types",
            patterns.len()
        );

        Self { patterns }
    }

    /// Reference patterns for an exercise, in table order; empty when unknown
    pub fn reference_patterns(&self, exercise_type: &ExerciseType) -> &[ReferencePattern] {
        self.patterns
            .get(exercise_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Exercises that have at least one reference pattern
    pub fn exercise_types(&self) -> Vec<ExerciseType> {
        ExerciseType::known()
            .into_iter()
            .filter(|exercise| self.patterns.contains_key(exercise))
            .collect()
    }
}

impl Default for PatternLibrary {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_squat_patterns_in_table_order() {
        let library = PatternLibrary::new();
        let phases: Vec<&str> = library
            .reference_patterns(&ExerciseType::Squat)
            .iter()
            .map(|p| p.phase.as_str())
            .collect();
        assert_eq!(phases, vec!["start", "descent", "bottom"]);
    }

    #[test]
    fn test_all_builtin_patterns_are_correct() {
        let library = PatternLibrary::new();
        for exercise in library.exercise_types() {
            for pattern in library.reference_patterns(&exercise) {
                assert_eq!(pattern.label, PatternLabel::Correct);
                assert_eq!(pattern.exercise_type, exercise);
            }
        }
    }

    #[test]
    fn test_unknown_exercise_is_empty() {
        let library = PatternLibrary::new();
        let patterns = library.reference_patterns(&ExerciseType::Other("burpee".to_string()));
        assert!(patterns.is_empty());
    }

    #[test]
    fn test_every_known_exercise_has_patterns() {
        let library = PatternLibrary::new();
        assert_eq!(library.exercise_types().len(), ExerciseType::known().len());
    }
}
