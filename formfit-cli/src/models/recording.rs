use anyhow::{Context, Result};
use formfit_core::models::{ExerciseType, InertialSample, PoseSnapshot};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A captured workout: whatever the camera and wearable produced, frame by frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recording {
    pub exercise_type: ExerciseType,
    #[serde(default)]
    pub frames: Vec<Frame>,
}

/// One tick of captured input; every source is optional
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Frame {
    pub timestamp_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pose: Option<PoseSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inertial: Option<InertialSample>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heart_rate: Option<f32>,
}

impl Recording {
    /// Load a recording from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read recording {}", path.display()))?;

        let recording: Recording = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse recording {}", path.display()))?;

        tracing::debug!(
            "Loaded {} recording with {} frames",
            recording.exercise_type,
            recording.frames.len()
        );

        Ok(recording)
    }
}
