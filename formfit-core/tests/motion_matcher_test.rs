//! Integration tests for MotionMatcher
//!
//! Tests cover:
//! - Exact matches against every built-in reference pattern
//! - Exercise-specific error determination below the similarity threshold
//! - Unknown exercises and degenerate samples
//! - Sharing one matcher across threads
use std::sync::Arc;
use std::thread;

use assert_matches::assert_matches;
use formfit_core::config::MotionThresholds;
use formfit_core::models::{ExerciseType, InertialSample, MotionErrorType, PatternType};
use formfit_core::services::{MotionMatcher, PatternLibrary};
use pretty_assertions::assert_eq;

fn matcher() -> MotionMatcher {
    MotionMatcher::new(Arc::new(PatternLibrary::new()))
}

#[test]
fn test_every_reference_pattern_matches_itself() {
    let matcher = matcher();

    for exercise in matcher.library().exercise_types() {
        for pattern in matcher.library().reference_patterns(&exercise) {
            let result = matcher.classify(&pattern.sample, &exercise);
            assert_eq!(result.pattern_type, PatternType::Correct);
            assert_eq!(result.error_type, MotionErrorType::None);
            assert_eq!(result.similarity_score, 1.0);
        }
    }
}

#[test]
fn test_unknown_exercise_has_no_patterns() {
    let sample = InertialSample::new([0.0, -2.0, 9.5], [0.5, 0.0, 0.0]);
    let result = matcher().classify(&sample, &ExerciseType::Other("kettlebell".to_string()));

    assert_eq!(result.pattern_type, PatternType::Unknown);
    assert_eq!(result.error_type, MotionErrorType::None);
    assert_eq!(result.similarity_score, 0.0);
}

#[test]
fn test_dropping_too_fast() {
    let sample = InertialSample::new([0.0, -20.0, 9.8], [0.0, 0.0, 0.0]);
    let result = matcher().classify(&sample, &ExerciseType::Squat);

    assert_eq!(result.pattern_type, PatternType::Incorrect);
    assert_eq!(result.error_type, MotionErrorType::TooFast);
    assert_matches!(result.matched_phase.as_deref(), Some("descent"));
    assert!(result.similarity_score < 0.7);
}

#[test]
fn test_rising_too_slow() {
    let sample = InertialSample::new([0.0, 16.0, 9.8], [0.0, 0.0, 0.0]);
    let result = matcher().classify(&sample, &ExerciseType::Squat);

    assert_eq!(result.pattern_type, PatternType::Incorrect);
    assert_eq!(result.error_type, MotionErrorType::TooSlow);
    assert_matches!(result.matched_phase.as_deref(), Some("start"));
}

#[test]
fn test_rotation_overrides_speed_fault() {
    let sample = InertialSample::new([0.0, -16.0, 9.8], [6.0, 0.0, 0.0]);
    let result = matcher().classify(&sample, &ExerciseType::Squat);

    assert_eq!(result.pattern_type, PatternType::Incorrect);
    assert_eq!(result.error_type, MotionErrorType::WrongAngle);
}

#[test]
fn test_push_up_speed_faults_read_the_z_axis() {
    let plunging = InertialSample::new([0.0, 9.8, -16.0], [0.0, 0.0, 0.0]);
    let result = matcher().classify(&plunging, &ExerciseType::PushUp);
    assert_eq!(result.pattern_type, PatternType::Incorrect);
    assert_eq!(result.error_type, MotionErrorType::TooFast);
    assert_matches!(result.matched_phase.as_deref(), Some("descent"));

    let dragging = InertialSample::new([0.0, 9.8, 16.0], [0.0, 0.0, 0.0]);
    let result = matcher().classify(&dragging, &ExerciseType::PushUp);
    assert_eq!(result.pattern_type, PatternType::Incorrect);
    assert_eq!(result.error_type, MotionErrorType::TooSlow);
    assert_matches!(result.matched_phase.as_deref(), Some("top"));
}

#[test]
fn test_unmapped_axis_deviation_is_incomplete_range() {
    let sample = InertialSample::new([16.0, 0.0, 9.8], [0.0, 0.0, 0.0]);
    let result = matcher().classify(&sample, &ExerciseType::Squat);

    assert_eq!(result.pattern_type, PatternType::Incorrect);
    assert_eq!(result.error_type, MotionErrorType::IncompleteRange);
}

#[test]
fn test_similarity_threshold_is_configurable() {
    let thresholds = MotionThresholds {
        similarity_threshold: 0.5,
        ..MotionThresholds::default()
    };
    let matcher = MotionMatcher::with_thresholds(Arc::new(PatternLibrary::new()), thresholds);
    let sample = InertialSample::new([0.0, 16.0, 9.8], [0.0, 0.0, 0.0]);

    let result = matcher.classify(&sample, &ExerciseType::Squat);
    assert_eq!(result.pattern_type, PatternType::Correct);
    assert_eq!(result.error_type, MotionErrorType::None);
}

#[test]
fn test_far_away_sample_clamps_to_zero() {
    let sample = InertialSample::new([100.0, 100.0, 100.0], [50.0, 50.0, 50.0]);
    let result = matcher().classify(&sample, &ExerciseType::Plank);

    assert_eq!(result.similarity_score, 0.0);
    assert_eq!(result.pattern_type, PatternType::Incorrect);
}

#[test]
fn test_matcher_shared_across_threads() {
    let matcher = Arc::new(matcher());

    let handles: Vec<_> = ExerciseType::known()
        .into_iter()
        .map(|exercise| {
            let matcher = Arc::clone(&matcher);
            thread::spawn(move || {
                let patterns = matcher.library().reference_patterns(&exercise);
                patterns
                    .iter()
                    .map(|pattern| matcher.classify(&pattern.sample, &exercise).similarity_score)
                    .fold(f32::INFINITY, f32::min)
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), 1.0);
    }
}
