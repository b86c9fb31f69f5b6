//! Tunable thresholds for the analyzers
//!
//! Every constant here is an empirically tuned value, not physical law, so all
//! of them can be overridden from a config file or the environment.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FormFitConfig {
    #[serde(default)]
    pub pose: PoseThresholds,

    #[serde(default)]
    pub motion: MotionThresholds,

    #[serde(default)]
    pub session: SessionThresholds,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseThresholds {
    /// Keypoints below this confidence are treated as absent
    #[serde(default = "default_min_keypoint_confidence")]
    pub min_keypoint_confidence: f32,

    /// Squat/lunge knee angle at or below this counts as deep enough
    #[serde(default = "default_max_knee_depth_angle")]
    pub max_knee_depth_angle: f32,

    #[serde(default = "default_min_hip_angle")]
    pub min_hip_angle: f32,

    #[serde(default = "default_max_hip_angle")]
    pub max_hip_angle: f32,

    /// Minimum knee separation relative to ankle separation
    #[serde(default = "default_min_knee_width_ratio")]
    pub min_knee_width_ratio: f32,

    /// Lunge front knee horizontal tolerance over the ankle
    #[serde(default = "default_max_knee_over_ankle")]
    pub max_knee_over_ankle: f32,

    #[serde(default = "default_max_torso_lean_angle")]
    pub max_torso_lean_angle: f32,

    #[serde(default = "default_max_elbow_depth_angle")]
    pub max_elbow_depth_angle: f32,

    /// Shoulder-hip-ankle angle at or above this counts as a straight body line
    #[serde(default = "default_min_body_line_angle")]
    pub min_body_line_angle: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionThresholds {
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f32,

    /// Normalizer for combined accel+gyro distance
    #[serde(default = "default_max_combined_distance")]
    pub max_combined_distance: f32,

    #[serde(default = "default_vertical_acceleration_band")]
    pub vertical_acceleration_band: f32,

    #[serde(default = "default_rotation_band")]
    pub rotation_band: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionThresholds {
    #[serde(default = "default_accuracy_seed")]
    pub accuracy_seed: f32,

    /// Corrective feedback fires below this smoothed accuracy
    #[serde(default = "default_accuracy_alert")]
    pub accuracy_alert: f32,

    #[serde(default = "default_rep_descend_threshold")]
    pub rep_descend_threshold: f32,

    #[serde(default = "default_rep_ascend_threshold")]
    pub rep_ascend_threshold: f32,

    #[serde(default = "default_perfect_form_accuracy")]
    pub perfect_form_accuracy: f32,
}

// Default value functions
fn default_min_keypoint_confidence() -> f32 {
    0.5
}

fn default_max_knee_depth_angle() -> f32 {
    110.0
}

fn default_min_hip_angle() -> f32 {
    45.0
}

fn default_max_hip_angle() -> f32 {
    90.0
}

fn default_min_knee_width_ratio() -> f32 {
    0.8
}

fn default_max_knee_over_ankle() -> f32 {
    0.1
}

fn default_max_torso_lean_angle() -> f32 {
    30.0
}

fn default_max_elbow_depth_angle() -> f32 {
    100.0
}

fn default_min_body_line_angle() -> f32 {
    160.0
}

fn default_similarity_threshold() -> f32 {
    0.7
}

fn default_max_combined_distance() -> f32 {
    // six axes, each bounded to +-20
    (6.0f32 * 20.0 * 20.0).sqrt()
}

fn default_vertical_acceleration_band() -> f32 {
    3.0
}

fn default_rotation_band() -> f32 {
    1.0
}

fn default_accuracy_seed() -> f32 {
    95.0
}

fn default_accuracy_alert() -> f32 {
    85.0
}

fn default_rep_descend_threshold() -> f32 {
    -1.0
}

fn default_rep_ascend_threshold() -> f32 {
    1.0
}

fn default_perfect_form_accuracy() -> f32 {
    95.0
}

impl Default for PoseThresholds {
    fn default() -> Self {
        Self {
            min_keypoint_confidence: default_min_keypoint_confidence(),
            max_knee_depth_angle: default_max_knee_depth_angle(),
            min_hip_angle: default_min_hip_angle(),
            max_hip_angle: default_max_hip_angle(),
            min_knee_width_ratio: default_min_knee_width_ratio(),
            max_knee_over_ankle: default_max_knee_over_ankle(),
            max_torso_lean_angle: default_max_torso_lean_angle(),
            max_elbow_depth_angle: default_max_elbow_depth_angle(),
            min_body_line_angle: default_min_body_line_angle(),
        }
    }
}

impl Default for MotionThresholds {
    fn default() -> Self {
        Self {
            similarity_threshold: default_similarity_threshold(),
            max_combined_distance: default_max_combined_distance(),
            vertical_acceleration_band: default_vertical_acceleration_band(),
            rotation_band: default_rotation_band(),
        }
    }
}

impl Default for SessionThresholds {
    fn default() -> Self {
        Self {
            accuracy_seed: default_accuracy_seed(),
            accuracy_alert: default_accuracy_alert(),
            rep_descend_threshold: default_rep_descend_threshold(),
            rep_ascend_threshold: default_rep_ascend_threshold(),
            perfect_form_accuracy: default_perfect_form_accuracy(),
        }
    }
}

impl FormFitConfig {
    /// Defaults overridden by any `FORMFIT_*` environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Override individual thresholds from `FORMFIT_*` environment variables.
    /// Unparsable values are logged and ignored.
    pub fn apply_env_overrides(&mut self) {
        let config = self;
        override_from_env(
            "FORMFIT_MIN_KEYPOINT_CONFIDENCE",
            &mut config.pose.min_keypoint_confidence,
        );
        override_from_env(
            "FORMFIT_MAX_KNEE_DEPTH_ANGLE",
            &mut config.pose.max_knee_depth_angle,
        );
        override_from_env("FORMFIT_MIN_HIP_ANGLE", &mut config.pose.min_hip_angle);
        override_from_env("FORMFIT_MAX_HIP_ANGLE", &mut config.pose.max_hip_angle);
        override_from_env(
            "FORMFIT_MIN_KNEE_WIDTH_RATIO",
            &mut config.pose.min_knee_width_ratio,
        );
        override_from_env(
            "FORMFIT_MAX_KNEE_OVER_ANKLE",
            &mut config.pose.max_knee_over_ankle,
        );
        override_from_env(
            "FORMFIT_MAX_TORSO_LEAN_ANGLE",
            &mut config.pose.max_torso_lean_angle,
        );
        override_from_env(
            "FORMFIT_MAX_ELBOW_DEPTH_ANGLE",
            &mut config.pose.max_elbow_depth_angle,
        );
        override_from_env(
            "FORMFIT_MIN_BODY_LINE_ANGLE",
            &mut config.pose.min_body_line_angle,
        );
        override_from_env(
            "FORMFIT_SIMILARITY_THRESHOLD",
            &mut config.motion.similarity_threshold,
        );
        override_from_env(
            "FORMFIT_MAX_COMBINED_DISTANCE",
            &mut config.motion.max_combined_distance,
        );
        override_from_env(
            "FORMFIT_VERTICAL_ACCELERATION_BAND",
            &mut config.motion.vertical_acceleration_band,
        );
        override_from_env("FORMFIT_ROTATION_BAND", &mut config.motion.rotation_band);
        override_from_env("FORMFIT_ACCURACY_SEED", &mut config.session.accuracy_seed);
        override_from_env("FORMFIT_ACCURACY_ALERT", &mut config.session.accuracy_alert);
        override_from_env(
            "FORMFIT_REP_DESCEND_THRESHOLD",
            &mut config.session.rep_descend_threshold,
        );
        override_from_env(
            "FORMFIT_REP_ASCEND_THRESHOLD",
            &mut config.session.rep_ascend_threshold,
        );
        override_from_env(
            "FORMFIT_PERFECT_FORM_ACCURACY",
            &mut config.session.perfect_form_accuracy,
        );
    }

    /// Reject threshold combinations the analyzers cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.motion.max_combined_distance <= 0.0 {
            anyhow::bail!("max_combined_distance must be positive");
        }
        if !(0.0..=1.0).contains(&self.motion.similarity_threshold) {
            anyhow::bail!("similarity_threshold must be within 0-1");
        }
        if self.pose.min_hip_angle > self.pose.max_hip_angle {
            anyhow::bail!("min_hip_angle must not exceed max_hip_angle");
        }
        if self.session.rep_descend_threshold >= self.session.rep_ascend_threshold {
            anyhow::bail!("rep_descend_threshold must be below rep_ascend_threshold");
        }
        Ok(())
    }
}

fn override_from_env<T: FromStr + Copy>(key: &str, target: &mut T) {
    if let Ok(raw) = env::var(key) {
        match raw.parse() {
            Ok(value) => *target = value,
            Err(_) => tracing::warn!("Ignoring unparsable {}={:?}, keeping default", key, raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_default_config() {
        let config = FormFitConfig::default();
        assert_eq!(config.pose.min_keypoint_confidence, 0.5);
        assert_eq!(config.pose.max_knee_depth_angle, 110.0);
        assert_eq!(config.motion.similarity_threshold, 0.7);
        assert!((config.motion.max_combined_distance - 48.98979).abs() < 1e-3);
        assert_eq!(config.session.accuracy_seed, 95.0);
        assert_eq!(config.session.accuracy_alert, 85.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: FormFitConfig =
            serde_json::from_str(r#"{ "motion": { "similarity_threshold": 0.8 } }"#).unwrap();
        assert_eq!(config.motion.similarity_threshold, 0.8);
        assert_eq!(config.motion.rotation_band, 1.0);
        assert_eq!(config.session, SessionThresholds::default());
    }

    #[test]
    fn test_validate_rejects_inverted_rep_thresholds() {
        let mut config = FormFitConfig::default();
        config.session.rep_descend_threshold = 2.0;
        assert!(config.validate().is_err());
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        env::set_var("FORMFIT_SIMILARITY_THRESHOLD", "0.65");
        env::set_var("FORMFIT_ACCURACY_ALERT", "not-a-number");

        let config = FormFitConfig::from_env().unwrap();

        env::remove_var("FORMFIT_SIMILARITY_THRESHOLD");
        env::remove_var("FORMFIT_ACCURACY_ALERT");

        assert_eq!(config.motion.similarity_threshold, 0.65);
        assert_eq!(config.session.accuracy_alert, 85.0);
    }

    #[test]
    #[serial]
    fn test_from_env_overrides_pose_rule_thresholds() {
        env::set_var("FORMFIT_MAX_TORSO_LEAN_ANGLE", "35");
        env::set_var("FORMFIT_MIN_BODY_LINE_ANGLE", "150.5");

        let config = FormFitConfig::from_env().unwrap();

        env::remove_var("FORMFIT_MAX_TORSO_LEAN_ANGLE");
        env::remove_var("FORMFIT_MIN_BODY_LINE_ANGLE");

        assert_eq!(config.pose.max_torso_lean_angle, 35.0);
        assert_eq!(config.pose.min_body_line_angle, 150.5);
        assert_eq!(config.pose.max_knee_over_ankle, default_max_knee_over_ankle());
    }

    #[test]
    #[serial]
    fn test_from_env_without_overrides() {
        let config = FormFitConfig::from_env().unwrap();
        assert_eq!(config, FormFitConfig::default());
    }
}
