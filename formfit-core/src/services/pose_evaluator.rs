//! Pose Form Evaluator
//!
//! This service turns one pose snapshot into a form classification:
//! - Required-keypoint precondition per exercise
//! - Joint angle calculations (knee, hip, elbow, body line, torso lean)
//! - Rule thresholds per exercise, evaluated most specific fault first
//! - Feedback message lookup
//!
//! Evaluation is a pure function of the snapshot; the evaluator holds only
//! its thresholds and can be shared across threads.

use crate::config::PoseThresholds;
use crate::models::{ExerciseType, FormClassification, FormQuality, Keypoint, KeypointId, PoseSnapshot};
use crate::services::feedback::form_feedback;
use crate::services::geometry::{angle, lean_from_vertical};

/// Confidence reported when all rule checks pass
pub const CORRECT_CONFIDENCE: f32 = 0.9;
/// Confidence reported for a specific fault
pub const SPECIFIC_ERROR_CONFIDENCE: f32 = 0.8;
/// Confidence reported when the checks were inconclusive
pub const GENERAL_ERROR_CONFIDENCE: f32 = 0.6;
/// Confidence reported when the exercise has no rule set
pub const NO_RULES_CONFIDENCE: f32 = 0.5;
/// Confidence reported when required keypoints are absent
pub const MISSING_KEYPOINTS_CONFIDENCE: f32 = 0.3;

const LOWER_BODY_KEYPOINTS: &[KeypointId] = &[
    KeypointId::LeftShoulder,
    KeypointId::RightShoulder,
    KeypointId::LeftHip,
    KeypointId::RightHip,
    KeypointId::LeftKnee,
    KeypointId::RightKnee,
    KeypointId::LeftAnkle,
    KeypointId::RightAnkle,
];

const PUSH_UP_KEYPOINTS: &[KeypointId] = &[
    KeypointId::LeftShoulder,
    KeypointId::RightShoulder,
    KeypointId::LeftElbow,
    KeypointId::RightElbow,
    KeypointId::LeftWrist,
    KeypointId::RightWrist,
    KeypointId::LeftHip,
    KeypointId::RightHip,
    KeypointId::LeftAnkle,
    KeypointId::RightAnkle,
];

const PLANK_KEYPOINTS: &[KeypointId] = &[
    KeypointId::LeftShoulder,
    KeypointId::RightShoulder,
    KeypointId::LeftHip,
    KeypointId::RightHip,
    KeypointId::LeftAnkle,
    KeypointId::RightAnkle,
];

/// Keypoints an exercise's rules need; `None` when there is no rule set
pub fn required_keypoints(exercise_type: &ExerciseType) -> Option<&'static [KeypointId]> {
    match exercise_type {
        ExerciseType::Squat | ExerciseType::Lunge => Some(LOWER_BODY_KEYPOINTS),
        ExerciseType::PushUp => Some(PUSH_UP_KEYPOINTS),
        ExerciseType::Plank => Some(PLANK_KEYPOINTS),
        ExerciseType::Other(_) => None,
    }
}

/// Outcome of one exercise's rule checks
#[derive(Debug, Clone, Copy, PartialEq)]
struct RuleChecks {
    good_depth: bool,
    knee_alignment: bool,
    back_straight: bool,
    /// False when any measured angle was not a finite number
    conclusive: bool,
}

impl RuleChecks {
    fn new(angles: &[f32], good_depth: bool, knee_alignment: bool, back_straight: bool) -> Self {
        Self {
            good_depth,
            knee_alignment,
            back_straight,
            conclusive: angles.iter().all(|a| a.is_finite()),
        }
    }

    fn classify(&self) -> (FormQuality, f32) {
        if !self.conclusive {
            return (FormQuality::ErrorGeneral, GENERAL_ERROR_CONFIDENCE);
        }

        match (self.good_depth, self.knee_alignment, self.back_straight) {
            (true, true, true) => (FormQuality::Correct, CORRECT_CONFIDENCE),
            (false, _, _) => (FormQuality::ErrorDepth, SPECIFIC_ERROR_CONFIDENCE),
            (_, false, _) => (FormQuality::ErrorKneeAlignment, SPECIFIC_ERROR_CONFIDENCE),
            (_, _, false) => (FormQuality::ErrorBackPosture, SPECIFIC_ERROR_CONFIDENCE),
        }
    }
}

/// Both sides of a bilateral joint chain
struct Sides<'a> {
    left: [&'a Keypoint; 3],
    right: [&'a Keypoint; 3],
}

pub struct PoseEvaluator {
    thresholds: PoseThresholds,
}

impl PoseEvaluator {
    /// Create an evaluator with default thresholds
    pub fn new() -> Self {
        Self::with_thresholds(PoseThresholds::default())
    }

    pub fn with_thresholds(thresholds: PoseThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &PoseThresholds {
        &self.thresholds
    }

    /// Classify the form shown in one snapshot
    pub fn evaluate(&self, pose: &PoseSnapshot, exercise_type: &ExerciseType) -> FormClassification {
        let Some(required) = required_keypoints(exercise_type) else {
            tracing::debug!("No form rules for exercise type: {}", exercise_type);
            return self.classification(exercise_type, FormQuality::Unknown, NO_RULES_CONFIDENCE);
        };

        let missing = pose.missing_keypoints(required, self.thresholds.min_keypoint_confidence);
        if !missing.is_empty() {
            tracing::debug!("Missing key landmarks for form analysis: {:?}", missing);
            return self.missing_keypoints(exercise_type);
        }

        let checks = match exercise_type {
            ExerciseType::Squat => self.squat_checks(pose),
            ExerciseType::Lunge => self.lunge_checks(pose),
            ExerciseType::PushUp => self.push_up_checks(pose),
            ExerciseType::Plank => self.plank_checks(pose),
            ExerciseType::Other(_) => None,
        };

        let Some(checks) = checks else {
            return self.missing_keypoints(exercise_type);
        };

        let (quality, confidence) = checks.classify();
        tracing::debug!(
            "Form for {}: {} (confidence {:.2}, checks {:?})",
            exercise_type,
            quality,
            confidence,
            checks
        );

        self.classification(exercise_type, quality, confidence)
    }

    fn classification(
        &self,
        exercise_type: &ExerciseType,
        quality: FormQuality,
        confidence: f32,
    ) -> FormClassification {
        FormClassification {
            exercise_type: exercise_type.clone(),
            quality,
            confidence,
            feedback_message: form_feedback(quality, exercise_type).to_string(),
        }
    }

    fn missing_keypoints(&self, exercise_type: &ExerciseType) -> FormClassification {
        self.classification(exercise_type, FormQuality::Unknown, MISSING_KEYPOINTS_CONFIDENCE)
    }

    fn point<'a>(&self, pose: &'a PoseSnapshot, id: KeypointId) -> Option<&'a Keypoint> {
        pose.visible(id, self.thresholds.min_keypoint_confidence)
    }

    fn sides<'a>(
        &self,
        pose: &'a PoseSnapshot,
        left: [KeypointId; 3],
        right: [KeypointId; 3],
    ) -> Option<Sides<'a>> {
        Some(Sides {
            left: [
                self.point(pose, left[0])?,
                self.point(pose, left[1])?,
                self.point(pose, left[2])?,
            ],
            right: [
                self.point(pose, right[0])?,
                self.point(pose, right[1])?,
                self.point(pose, right[2])?,
            ],
        })
    }

    /// Average of the left and right angles at the middle landmark
    fn average_angle(&self, sides: &Sides) -> f32 {
        let [la, lb, lc] = sides.left;
        let [ra, rb, rc] = sides.right;
        (angle(la, lb, lc) + angle(ra, rb, rc)) / 2.0
    }

    fn squat_checks(&self, pose: &PoseSnapshot) -> Option<RuleChecks> {
        let legs = self.sides(
            pose,
            [KeypointId::LeftHip, KeypointId::LeftKnee, KeypointId::LeftAnkle],
            [KeypointId::RightHip, KeypointId::RightKnee, KeypointId::RightAnkle],
        )?;
        let trunk = self.sides(
            pose,
            [KeypointId::LeftShoulder, KeypointId::LeftHip, KeypointId::LeftKnee],
            [KeypointId::RightShoulder, KeypointId::RightHip, KeypointId::RightKnee],
        )?;

        let knee_angle = self.average_angle(&legs);
        let hip_angle = self.average_angle(&trunk);

        let good_depth = knee_angle <= self.thresholds.max_knee_depth_angle;
        let back_straight =
            hip_angle >= self.thresholds.min_hip_angle && hip_angle <= self.thresholds.max_hip_angle;

        // knees caving inward bring them closer together than the ankles
        let knee_width = (legs.left[1].x - legs.right[1].x).abs();
        let ankle_width = (legs.left[2].x - legs.right[2].x).abs();
        let knee_alignment = knee_width >= ankle_width * self.thresholds.min_knee_width_ratio;

        Some(RuleChecks::new(
            &[knee_angle, hip_angle],
            good_depth,
            knee_alignment,
            back_straight,
        ))
    }

    fn lunge_checks(&self, pose: &PoseSnapshot) -> Option<RuleChecks> {
        let legs = self.sides(
            pose,
            [KeypointId::LeftHip, KeypointId::LeftKnee, KeypointId::LeftAnkle],
            [KeypointId::RightHip, KeypointId::RightKnee, KeypointId::RightAnkle],
        )?;
        let left_shoulder = self.point(pose, KeypointId::LeftShoulder)?;
        let right_shoulder = self.point(pose, KeypointId::RightShoulder)?;

        let [lh, lk, la] = legs.left;
        let [rh, rk, ra] = legs.right;
        let left_knee_angle = angle(lh, lk, la);
        let right_knee_angle = angle(rh, rk, ra);

        // the front leg is the one bent further
        let (front_knee_angle, front_knee, front_ankle) = if left_knee_angle <= right_knee_angle {
            (left_knee_angle, lk, la)
        } else {
            (right_knee_angle, rk, ra)
        };

        let good_depth = front_knee_angle <= self.thresholds.max_knee_depth_angle;
        let knee_alignment =
            (front_knee.x - front_ankle.x).abs() <= self.thresholds.max_knee_over_ankle;

        let torso_lean = lean_from_vertical(
            &midpoint(left_shoulder, right_shoulder),
            &midpoint(lh, rh),
        );
        let back_straight = torso_lean <= self.thresholds.max_torso_lean_angle;

        Some(RuleChecks::new(
            &[left_knee_angle, right_knee_angle, torso_lean],
            good_depth,
            knee_alignment,
            back_straight,
        ))
    }

    fn push_up_checks(&self, pose: &PoseSnapshot) -> Option<RuleChecks> {
        let arms = self.sides(
            pose,
            [KeypointId::LeftShoulder, KeypointId::LeftElbow, KeypointId::LeftWrist],
            [KeypointId::RightShoulder, KeypointId::RightElbow, KeypointId::RightWrist],
        )?;
        let body = self.body_line(pose)?;

        let elbow_angle = self.average_angle(&arms);
        let body_angle = self.average_angle(&body);

        Some(RuleChecks::new(
            &[elbow_angle, body_angle],
            elbow_angle <= self.thresholds.max_elbow_depth_angle,
            true,
            body_angle >= self.thresholds.min_body_line_angle,
        ))
    }

    fn plank_checks(&self, pose: &PoseSnapshot) -> Option<RuleChecks> {
        let body = self.body_line(pose)?;
        let body_angle = self.average_angle(&body);

        Some(RuleChecks::new(
            &[body_angle],
            true,
            true,
            body_angle >= self.thresholds.min_body_line_angle,
        ))
    }

    /// Shoulder-hip-ankle chains on both sides
    fn body_line<'a>(&self, pose: &'a PoseSnapshot) -> Option<Sides<'a>> {
        self.sides(
            pose,
            [KeypointId::LeftShoulder, KeypointId::LeftHip, KeypointId::LeftAnkle],
            [KeypointId::RightShoulder, KeypointId::RightHip, KeypointId::RightAnkle],
        )
    }
}

impl Default for PoseEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

fn midpoint(a: &Keypoint, b: &Keypoint) -> Keypoint {
    Keypoint::new(
        (a.x + b.x) / 2.0,
        (a.y + b.y) / 2.0,
        a.confidence.min(b.confidence),
    )
}
