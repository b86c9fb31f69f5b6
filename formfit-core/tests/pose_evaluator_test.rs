//! Integration tests for PoseEvaluator
//!
//! Tests cover:
//! - Squat rule decisions, most specific fault first
//! - Required-keypoint precondition
//! - Lunge, push-up and plank rule sets
//! - Exercises without a rule set
use formfit_core::config::PoseThresholds;
use formfit_core::models::{ExerciseType, FormQuality, Keypoint, KeypointId, PoseSnapshot};
use formfit_core::services::PoseEvaluator;
use pretty_assertions::assert_eq;

fn kp(x: f32, y: f32) -> Keypoint {
    Keypoint::new(x, y, 0.9)
}

/// Bottom of a squat seen from the side: exact 90 degree knees and hips,
/// right side offset horizontally by 0.125.
fn squat_bottom() -> PoseSnapshot {
    PoseSnapshot::new(0)
        .with_keypoint(KeypointId::LeftShoulder, kp(0.5, 0.25))
        .with_keypoint(KeypointId::LeftHip, kp(0.5, 0.5))
        .with_keypoint(KeypointId::LeftKnee, kp(0.75, 0.5))
        .with_keypoint(KeypointId::LeftAnkle, kp(0.75, 0.75))
        .with_keypoint(KeypointId::RightShoulder, kp(0.625, 0.25))
        .with_keypoint(KeypointId::RightHip, kp(0.625, 0.5))
        .with_keypoint(KeypointId::RightKnee, kp(0.875, 0.5))
        .with_keypoint(KeypointId::RightAnkle, kp(0.875, 0.75))
}

fn squat_standing() -> PoseSnapshot {
    PoseSnapshot::new(0)
        .with_keypoint(KeypointId::LeftShoulder, kp(0.5, 0.25))
        .with_keypoint(KeypointId::LeftHip, kp(0.5, 0.5))
        .with_keypoint(KeypointId::LeftKnee, kp(0.5, 0.75))
        .with_keypoint(KeypointId::LeftAnkle, kp(0.5, 1.0))
        .with_keypoint(KeypointId::RightShoulder, kp(0.625, 0.25))
        .with_keypoint(KeypointId::RightHip, kp(0.625, 0.5))
        .with_keypoint(KeypointId::RightKnee, kp(0.625, 0.75))
        .with_keypoint(KeypointId::RightAnkle, kp(0.625, 1.0))
}

/// Horizontal body with elbows bent to 90 degrees
fn push_up_bottom() -> PoseSnapshot {
    PoseSnapshot::new(0)
        .with_keypoint(KeypointId::LeftShoulder, kp(0.25, 0.5))
        .with_keypoint(KeypointId::LeftElbow, kp(0.25, 0.625))
        .with_keypoint(KeypointId::LeftWrist, kp(0.125, 0.625))
        .with_keypoint(KeypointId::LeftHip, kp(0.5, 0.5))
        .with_keypoint(KeypointId::LeftAnkle, kp(0.75, 0.5))
        .with_keypoint(KeypointId::RightShoulder, kp(0.25, 0.5))
        .with_keypoint(KeypointId::RightElbow, kp(0.25, 0.625))
        .with_keypoint(KeypointId::RightWrist, kp(0.125, 0.625))
        .with_keypoint(KeypointId::RightHip, kp(0.5, 0.5))
        .with_keypoint(KeypointId::RightAnkle, kp(0.75, 0.5))
}

/// Left leg forward at 90 degrees with the knee over the ankle
fn lunge_bottom() -> PoseSnapshot {
    PoseSnapshot::new(0)
        .with_keypoint(KeypointId::LeftShoulder, kp(0.5, 0.25))
        .with_keypoint(KeypointId::RightShoulder, kp(0.5, 0.25))
        .with_keypoint(KeypointId::LeftHip, kp(0.5, 0.5))
        .with_keypoint(KeypointId::RightHip, kp(0.5, 0.5))
        .with_keypoint(KeypointId::LeftKnee, kp(0.75, 0.5))
        .with_keypoint(KeypointId::LeftAnkle, kp(0.75, 0.75))
        .with_keypoint(KeypointId::RightKnee, kp(0.375, 0.75))
        .with_keypoint(KeypointId::RightAnkle, kp(0.125, 0.75))
}

#[test]
fn test_squat_right_angles_are_correct() {
    let result = PoseEvaluator::new().evaluate(&squat_bottom(), &ExerciseType::Squat);

    assert_eq!(result.quality, FormQuality::Correct);
    assert_eq!(result.confidence, 0.9);
    assert_eq!(result.exercise_type, ExerciseType::Squat);
}

#[test]
fn test_squat_standing_is_depth_error() {
    let result = PoseEvaluator::new().evaluate(&squat_standing(), &ExerciseType::Squat);

    assert_eq!(result.quality, FormQuality::ErrorDepth);
    assert_eq!(result.confidence, 0.8);
    assert_eq!(result.feedback_message, "Try to go deeper in your squat.");
}

#[test]
fn test_squat_knees_caving_in() {
    let pose = squat_bottom().with_keypoint(KeypointId::RightKnee, kp(0.78, 0.5));
    let result = PoseEvaluator::new().evaluate(&pose, &ExerciseType::Squat);

    assert_eq!(result.quality, FormQuality::ErrorKneeAlignment);
    assert_eq!(result.feedback_message, "Keep your knees in line with your toes.");
}

#[test]
fn test_squat_chest_collapsed_forward() {
    let pose = squat_bottom()
        .with_keypoint(KeypointId::LeftShoulder, kp(0.75, 0.375))
        .with_keypoint(KeypointId::RightShoulder, kp(0.875, 0.375));
    let result = PoseEvaluator::new().evaluate(&pose, &ExerciseType::Squat);

    assert_eq!(result.quality, FormQuality::ErrorBackPosture);
    assert_eq!(result.confidence, 0.8);
}

#[test]
fn test_depth_fault_reported_before_back_fault() {
    // standing upright fails depth and the hip band at once
    let result = PoseEvaluator::new().evaluate(&squat_standing(), &ExerciseType::Squat);
    assert_eq!(result.quality, FormQuality::ErrorDepth);
}

#[test]
fn test_missing_keypoint_is_unknown() {
    let pose: PoseSnapshot = squat_bottom()
        .keypoints
        .into_iter()
        .filter(|(id, _)| *id != KeypointId::LeftAnkle)
        .collect();
    let result = PoseEvaluator::new().evaluate(&pose, &ExerciseType::Squat);

    assert_eq!(result.quality, FormQuality::Unknown);
    assert_eq!(result.confidence, 0.3);
}

#[test]
fn test_low_confidence_keypoint_is_treated_as_missing() {
    let pose =
        squat_bottom().with_keypoint(KeypointId::RightHip, Keypoint::new(0.625, 0.5, 0.4));
    let result = PoseEvaluator::new().evaluate(&pose, &ExerciseType::Squat);

    assert_eq!(result.quality, FormQuality::Unknown);
    assert_eq!(result.confidence, 0.3);
}

#[test]
fn test_missing_keypoint_wins_over_present_values() {
    // a deep-enough pose still reports unknown when a shoulder is gone
    let pose: PoseSnapshot = squat_standing()
        .keypoints
        .into_iter()
        .filter(|(id, _)| *id != KeypointId::RightShoulder)
        .collect();
    let result = PoseEvaluator::new().evaluate(&pose, &ExerciseType::Squat);
    assert_eq!(result.quality, FormQuality::Unknown);
}

#[test]
fn test_custom_thresholds() {
    let thresholds = PoseThresholds {
        max_knee_depth_angle: 80.0,
        ..PoseThresholds::default()
    };
    let result =
        PoseEvaluator::with_thresholds(thresholds).evaluate(&squat_bottom(), &ExerciseType::Squat);
    assert_eq!(result.quality, FormQuality::ErrorDepth);
}

#[test]
fn test_exercise_without_rules() {
    let result = PoseEvaluator::new()
        .evaluate(&squat_bottom(), &ExerciseType::Other("deadlift".to_string()));

    assert_eq!(result.quality, FormQuality::Unknown);
    assert_eq!(result.confidence, 0.5);
}

#[test]
fn test_lunge_correct() {
    let result = PoseEvaluator::new().evaluate(&lunge_bottom(), &ExerciseType::Lunge);
    assert_eq!(result.quality, FormQuality::Correct);
}

#[test]
fn test_lunge_knee_past_toes() {
    let pose = lunge_bottom().with_keypoint(KeypointId::LeftKnee, kp(0.875, 0.5));
    let result = PoseEvaluator::new().evaluate(&pose, &ExerciseType::Lunge);
    assert_eq!(result.quality, FormQuality::ErrorKneeAlignment);
    assert_eq!(
        result.feedback_message,
        "Keep your front knee aligned with your ankle."
    );
}

#[test]
fn test_lunge_torso_leaning() {
    let pose = lunge_bottom()
        .with_keypoint(KeypointId::LeftShoulder, kp(0.75, 0.25))
        .with_keypoint(KeypointId::RightShoulder, kp(0.75, 0.25));
    let result = PoseEvaluator::new().evaluate(&pose, &ExerciseType::Lunge);
    assert_eq!(result.quality, FormQuality::ErrorBackPosture);
}

#[test]
fn test_push_up_correct() {
    let result = PoseEvaluator::new().evaluate(&push_up_bottom(), &ExerciseType::PushUp);
    assert_eq!(result.quality, FormQuality::Correct);
}

#[test]
fn test_push_up_sagging_hips() {
    let pose = push_up_bottom()
        .with_keypoint(KeypointId::LeftHip, kp(0.5, 0.75))
        .with_keypoint(KeypointId::RightHip, kp(0.5, 0.75));
    let result = PoseEvaluator::new().evaluate(&pose, &ExerciseType::PushUp);

    assert_eq!(result.quality, FormQuality::ErrorBackPosture);
    assert_eq!(
        result.feedback_message,
        "Keep your body in a straight line from shoulders to ankles."
    );
}

#[test]
fn test_push_up_needs_wrists() {
    let pose: PoseSnapshot = push_up_bottom()
        .keypoints
        .into_iter()
        .filter(|(id, _)| *id != KeypointId::LeftWrist)
        .collect();
    let result = PoseEvaluator::new().evaluate(&pose, &ExerciseType::PushUp);
    assert_eq!(result.quality, FormQuality::Unknown);
}

#[test]
fn test_plank_straight_line() {
    // plank rules only read the shoulder-hip-ankle line
    let pose: PoseSnapshot = push_up_bottom()
        .keypoints
        .into_iter()
        .filter(|(id, _)| {
            !matches!(
                id,
                KeypointId::LeftWrist
                    | KeypointId::RightWrist
                    | KeypointId::LeftElbow
                    | KeypointId::RightElbow
            )
        })
        .collect();
    let result = PoseEvaluator::new().evaluate(&pose, &ExerciseType::Plank);
    assert_eq!(result.quality, FormQuality::Correct);
}

#[test]
fn test_evaluate_deserialized_snapshot() {
    let json = r#"{
        "timestamp_ms": 40,
        "keypoints": {
            "left_shoulder": {"x": 0.5, "y": 0.25, "confidence": 0.9},
            "left_hip": {"x": 0.5, "y": 0.5, "confidence": 0.9},
            "left_knee": {"x": 0.75, "y": 0.5, "confidence": 0.9},
            "left_ankle": {"x": 0.75, "y": 0.75, "confidence": 0.9},
            "right_shoulder": {"x": 0.625, "y": 0.25, "confidence": 0.9},
            "right_hip": {"x": 0.625, "y": 0.5, "confidence": 0.9},
            "right_knee": {"x": 0.875, "y": 0.5, "confidence": 0.9},
            "right_ankle": {"x": 0.875, "y": 0.75, "confidence": 0.9}
        }
    }"#;
    let pose: PoseSnapshot = serde_json::from_str(json).unwrap();
    let result = PoseEvaluator::new().evaluate(&pose, &ExerciseType::Squat);
    assert_eq!(result.quality, FormQuality::Correct);
}
