//! Repetition counting from vertical acceleration
//!
//! A two-state hysteresis counter: an excursion below the descend threshold
//! arms it, the next excursion above the ascend threshold completes one
//! repetition and disarms it. Staying inside either excursion never counts
//! twice.

use crate::models::InertialSample;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RepPhase {
    Ready,
    Descending,
}

#[derive(Debug, Clone)]
pub struct RepCounter {
    descend_threshold: f32,
    ascend_threshold: f32,
    phase: RepPhase,
    count: u32,
}

impl RepCounter {
    pub fn new(descend_threshold: f32, ascend_threshold: f32) -> Self {
        Self {
            descend_threshold,
            ascend_threshold,
            phase: RepPhase::Ready,
            count: 0,
        }
    }

    /// Feed one vertical acceleration reading; true when a rep completes
    pub fn update(&mut self, vertical_acceleration: f32) -> bool {
        match self.phase {
            RepPhase::Ready if vertical_acceleration < self.descend_threshold => {
                self.phase = RepPhase::Descending;
                false
            }
            RepPhase::Descending if vertical_acceleration > self.ascend_threshold => {
                self.phase = RepPhase::Ready;
                self.count += 1;
                true
            }
            _ => false,
        }
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    /// Feed a recorded stream through the counter, reading one accelerometer axis
    pub fn count_samples<'a, I>(&mut self, samples: I, axis: usize) -> u32
    where
        I: IntoIterator<Item = &'a InertialSample>,
    {
        for sample in samples {
            if let Some(value) = sample.acceleration.get(axis) {
                self.update(*value);
            }
        }
        self.count
    }
}

impl Default for RepCounter {
    fn default() -> Self {
        Self::new(-1.0, 1.0)
    }
}
