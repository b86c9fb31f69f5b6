//! Geometry primitives shared by the pose evaluator and motion matcher

use crate::error::GeometryError;
use crate::models::Keypoint;

/// Angle at vertex `b` formed by rays b->a and b->c, in degrees within [0, 180]
///
/// Uses the difference of the two rays' polar angles, folded so that the
/// smaller of the two possible angles is returned regardless of winding.
pub fn angle(a: &Keypoint, b: &Keypoint, c: &Keypoint) -> f32 {
    let ray_c = (c.y - b.y).atan2(c.x - b.x);
    let ray_a = (a.y - b.y).atan2(a.x - b.x);

    let degrees = (ray_c - ray_a).to_degrees().abs();
    if degrees > 180.0 {
        // opposite rays straddling the atan2 branch cut can round past 360
        (360.0 - degrees).max(0.0)
    } else {
        degrees
    }
}

/// Angle between the ray b->a and straight up from `b`, in degrees
pub fn lean_from_vertical(a: &Keypoint, b: &Keypoint) -> f32 {
    // image y grows downwards
    let above = Keypoint::new(b.x, b.y - 1.0, b.confidence);
    angle(a, b, &above)
}

/// L2 distance between two equal-length vectors
pub fn euclidean_distance(v1: &[f32], v2: &[f32]) -> Result<f32, GeometryError> {
    if v1.len() != v2.len() {
        return Err(GeometryError::LengthMismatch {
            left: v1.len(),
            right: v2.len(),
        });
    }
    Ok(l2(v1, v2))
}

/// L2 distance between two 3-axis readings
pub fn distance3(v1: &[f32; 3], v2: &[f32; 3]) -> f32 {
    l2(v1, v2)
}

fn l2(v1: &[f32], v2: &[f32]) -> f32 {
    v1.iter()
        .zip(v2)
        .map(|(a, b)| (a - b).powi(2))
        .sum::<f32>()
        .sqrt()
}

/// Map a distance to a similarity in [0, 1]
pub fn similarity(distance: f32, max_distance: f32) -> f32 {
    (1.0 - distance / max_distance).clamp(0.0, 1.0)
}
