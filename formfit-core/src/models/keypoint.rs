//! Keypoint models for pose snapshots
//!
//! Keypoints arrive already extracted by an external pose detector, in
//! normalized image coordinates. A snapshot only lives for one evaluation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single detected landmark
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    /// X coordinate (normalized 0-1)
    pub x: f32,
    /// Y coordinate (normalized 0-1, growing downwards)
    pub y: f32,
    /// Detection confidence (0-1)
    pub confidence: f32,
}

impl Keypoint {
    /// Create a new keypoint
    pub fn new(x: f32, y: f32, confidence: f32) -> Self {
        Self { x, y, confidence }
    }

    /// Check if keypoint has sufficient confidence to be used
    pub fn is_valid(&self, min_confidence: f32) -> bool {
        self.confidence >= min_confidence
    }
}

/// COCO landmark identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeypointId {
    Nose,
    LeftEye,
    RightEye,
    LeftEar,
    RightEar,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

impl KeypointId {
    /// Get keypoint name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Nose => "nose",
            Self::LeftEye => "left_eye",
            Self::RightEye => "right_eye",
            Self::LeftEar => "left_ear",
            Self::RightEar => "right_ear",
            Self::LeftShoulder => "left_shoulder",
            Self::RightShoulder => "right_shoulder",
            Self::LeftElbow => "left_elbow",
            Self::RightElbow => "right_elbow",
            Self::LeftWrist => "left_wrist",
            Self::RightWrist => "right_wrist",
            Self::LeftHip => "left_hip",
            Self::RightHip => "right_hip",
            Self::LeftKnee => "left_knee",
            Self::RightKnee => "right_knee",
            Self::LeftAnkle => "left_ankle",
            Self::RightAnkle => "right_ankle",
        }
    }
}

impl std::fmt::Display for KeypointId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Keypoints detected in one camera frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoseSnapshot {
    /// Frame timestamp in milliseconds
    #[serde(default)]
    pub timestamp_ms: u64,
    /// Detected keypoints; landmarks the detector missed are simply absent
    pub keypoints: BTreeMap<KeypointId, Keypoint>,
}

impl PoseSnapshot {
    /// Create an empty snapshot
    pub fn new(timestamp_ms: u64) -> Self {
        Self {
            timestamp_ms,
            keypoints: BTreeMap::new(),
        }
    }

    /// Builder-style insert
    pub fn with_keypoint(mut self, id: KeypointId, keypoint: Keypoint) -> Self {
        self.keypoints.insert(id, keypoint);
        self
    }

    /// Raw lookup, regardless of confidence
    pub fn get(&self, id: KeypointId) -> Option<&Keypoint> {
        self.keypoints.get(&id)
    }

    /// Lookup that treats sub-threshold keypoints as absent
    pub fn visible(&self, id: KeypointId, min_confidence: f32) -> Option<&Keypoint> {
        self.get(id).filter(|kp| kp.is_valid(min_confidence))
    }

    /// Required keypoints that are missing or below the threshold
    pub fn missing_keypoints(&self, ids: &[KeypointId], min_confidence: f32) -> Vec<KeypointId> {
        ids.iter()
            .copied()
            .filter(|id| self.visible(*id, min_confidence).is_none())
            .collect()
    }
}

impl FromIterator<(KeypointId, Keypoint)> for PoseSnapshot {
    fn from_iter<T: IntoIterator<Item = (KeypointId, Keypoint)>>(iter: T) -> Self {
        Self {
            timestamp_ms: 0,
            keypoints: iter.into_iter().collect(),
        }
    }
}
