//! Motion Pattern Matcher
//!
//! Matches a live wearable sample against the reference patterns for the
//! current exercise:
//! - combined accel+gyro distance mapped to a similarity score
//! - best match wins, ties keep the earlier pattern in library order
//! - below the similarity threshold, an exercise-specific error is derived
//!   from the componentwise difference to the winning pattern

use std::sync::Arc;

use crate::config::MotionThresholds;
use crate::models::{
    ExerciseType, InertialSample, MotionClassification, MotionErrorType, PatternType,
    ReferencePattern,
};
use crate::services::geometry::{distance3, similarity};
use crate::services::pattern_library::PatternLibrary;

/// Axis mapping used for error determination and rep counting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotionAxes {
    /// Accelerometer axis that tracks the up/down movement
    pub vertical: usize,
    /// Gyroscope axis that tracks unwanted rotation
    pub rotation: usize,
}

/// Vertical axis for exercises without a dedicated mapping
pub const DEFAULT_VERTICAL_AXIS: usize = 1;

impl MotionAxes {
    pub fn for_exercise(exercise_type: &ExerciseType) -> Option<Self> {
        match exercise_type {
            ExerciseType::Squat => Some(Self { vertical: 1, rotation: 0 }),
            ExerciseType::Lunge => Some(Self { vertical: 1, rotation: 1 }),
            // prone: gravity sits on Y, the body travels along Z
            ExerciseType::PushUp => Some(Self { vertical: 2, rotation: 0 }),
            ExerciseType::Plank => Some(Self { vertical: 2, rotation: 2 }),
            ExerciseType::Other(_) => None,
        }
    }
}

pub struct MotionMatcher {
    library: Arc<PatternLibrary>,
    thresholds: MotionThresholds,
}

impl MotionMatcher {
    pub fn new(library: Arc<PatternLibrary>) -> Self {
        Self::with_thresholds(library, MotionThresholds::default())
    }

    pub fn with_thresholds(library: Arc<PatternLibrary>, thresholds: MotionThresholds) -> Self {
        Self {
            library,
            thresholds,
        }
    }

    pub fn library(&self) -> &PatternLibrary {
        &self.library
    }

    /// Classify one inertial sample for the given exercise
    pub fn classify(
        &self,
        sample: &InertialSample,
        exercise_type: &ExerciseType,
    ) -> MotionClassification {
        let patterns = self.library.reference_patterns(exercise_type);

        let Some((best, best_similarity)) = self.best_match(sample, patterns) else {
            tracing::debug!("No reference patterns for exercise type: {}", exercise_type);
            return MotionClassification::unknown(exercise_type.clone());
        };

        let (pattern_type, error_type) = if best_similarity >= self.thresholds.similarity_threshold
        {
            (PatternType::from(best.label), MotionErrorType::None)
        } else {
            (
                PatternType::Incorrect,
                self.determine_error_type(sample, best, exercise_type),
            )
        };

        tracing::debug!(
            "Motion pattern for {} matched '{}' with similarity {:.3}: {:?} / {}",
            exercise_type,
            best.phase,
            best_similarity,
            pattern_type,
            error_type
        );

        MotionClassification {
            exercise_type: exercise_type.clone(),
            pattern_type,
            error_type,
            similarity_score: best_similarity,
            matched_phase: Some(best.phase.clone()),
        }
    }

    /// Combined similarity between a live sample and a reference sample
    pub fn pattern_similarity(&self, sample: &InertialSample, reference: &InertialSample) -> f32 {
        let distance = distance3(&sample.acceleration, &reference.acceleration)
            + distance3(&sample.gyroscope, &reference.gyroscope);
        let score = similarity(distance, self.thresholds.max_combined_distance);

        if score.is_nan() {
            0.0
        } else {
            score
        }
    }

    fn best_match<'a>(
        &self,
        sample: &InertialSample,
        patterns: &'a [ReferencePattern],
    ) -> Option<(&'a ReferencePattern, f32)> {
        let mut best: Option<(&ReferencePattern, f32)> = None;

        for pattern in patterns {
            let score = self.pattern_similarity(sample, &pattern.sample);
            match best {
                // strict comparison keeps the first pattern on ties
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((pattern, score)),
            }
        }

        best
    }

    fn determine_error_type(
        &self,
        sample: &InertialSample,
        reference: &ReferencePattern,
        exercise_type: &ExerciseType,
    ) -> MotionErrorType {
        let Some(axes) = MotionAxes::for_exercise(exercise_type) else {
            return MotionErrorType::IncompleteRange;
        };

        let mut error_type = MotionErrorType::IncompleteRange;

        let live_vertical = sample.acceleration[axes.vertical];
        let reference_vertical = reference.sample.acceleration[axes.vertical];
        if (live_vertical - reference_vertical).abs() > self.thresholds.vertical_acceleration_band {
            error_type = if live_vertical < reference_vertical {
                MotionErrorType::TooFast
            } else {
                MotionErrorType::TooSlow
            };
        }

        // rotation faults override speed faults
        let rotation_diff =
            (sample.gyroscope[axes.rotation] - reference.sample.gyroscope[axes.rotation]).abs();
        if rotation_diff > self.thresholds.rotation_band {
            error_type = MotionErrorType::WrongAngle;
        }

        error_type
    }
}
