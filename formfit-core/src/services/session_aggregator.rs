//! Session Aggregator
//!
//! Folds classifier output and wearable samples into the running state of
//! one exercise session. The lifecycle is strictly Idle -> Active -> Finished;
//! events delivered outside the Active phase are ignored so that straggling
//! frames cannot corrupt a finished session.
//!
//! One aggregator has one logical owner. Share it behind a mutex if more
//! than one task needs to drive it.

use std::time::Duration;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::config::SessionThresholds;
use crate::error::SessionError;
use crate::models::{
    Achievement, ClassificationEvent, CorrectiveFeedback, ExerciseType, InertialSample,
    SessionPhase, SessionState, SessionSummary,
};
use crate::services::feedback::motion_feedback;
use crate::services::motion_matcher::{MotionAxes, DEFAULT_VERTICAL_AXIS};
use crate::services::rep_counter::RepCounter;

#[derive(Debug, Clone, Default)]
struct HeartRateStats {
    total: f64,
    readings: u32,
    peak: Option<f32>,
}

impl HeartRateStats {
    fn record(&mut self, bpm: f32) {
        self.total += f64::from(bpm);
        self.readings += 1;
        self.peak = Some(self.peak.map_or(bpm, |peak| peak.max(bpm)));
    }

    fn average(&self) -> Option<f32> {
        (self.readings > 0).then(|| (self.total / f64::from(self.readings)) as f32)
    }
}

#[derive(Debug, Clone)]
struct ActiveSession {
    state: SessionState,
    rep_counter: RepCounter,
    vertical_axis: usize,
    elapsed: Duration,
    classifications: u32,
    heart_rate: HeartRateStats,
}

impl ActiveSession {
    fn refresh_calories(&mut self) {
        let exercise = &self.state.exercise_type;
        let minutes = self.elapsed.as_secs_f32() / 60.0;
        self.state.calorie_estimate = self.state.repetition_count as f32
            * exercise.calories_per_rep()
            + minutes * exercise.calories_per_minute();
    }
}

#[derive(Debug, Clone)]
enum Lifecycle {
    Idle,
    Active(Box<ActiveSession>),
    Finished {
        state: SessionState,
        summary: SessionSummary,
    },
}

#[derive(Debug, Clone)]
pub struct SessionAggregator {
    thresholds: SessionThresholds,
    lifecycle: Lifecycle,
}

impl SessionAggregator {
    pub fn new(thresholds: SessionThresholds) -> Self {
        Self {
            thresholds,
            lifecycle: Lifecycle::Idle,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        match self.lifecycle {
            Lifecycle::Idle => SessionPhase::Idle,
            Lifecycle::Active(_) => SessionPhase::Active,
            Lifecycle::Finished { .. } => SessionPhase::Finished,
        }
    }

    /// Current running state; after finish this is the frozen final state
    pub fn state(&self) -> Option<&SessionState> {
        match &self.lifecycle {
            Lifecycle::Idle => None,
            Lifecycle::Active(session) => Some(&session.state),
            Lifecycle::Finished { state, .. } => Some(state),
        }
    }

    /// Start a session stamped with the current wall-clock time
    pub fn start(&mut self, exercise_type: ExerciseType) -> Result<(), SessionError> {
        self.start_at(exercise_type, Utc::now())
    }

    /// Start a session with an explicit start timestamp
    pub fn start_at(
        &mut self,
        exercise_type: ExerciseType,
        started_at: DateTime<Utc>,
    ) -> Result<(), SessionError> {
        if let Some(err) = SessionError::for_start(self.phase()) {
            return Err(err);
        }

        let vertical_axis = MotionAxes::for_exercise(&exercise_type)
            .map(|axes| axes.vertical)
            .unwrap_or(DEFAULT_VERTICAL_AXIS);

        let state = SessionState {
            session_id: Uuid::new_v4(),
            exercise_type,
            smoothed_accuracy: self.thresholds.accuracy_seed,
            repetition_count: 0,
            calorie_estimate: 0.0,
            elapsed_seconds: 0.0,
            last_feedback: None,
            started_at,
        };

        tracing::info!(
            "Started {} session {}",
            state.exercise_type,
            state.session_id
        );

        self.lifecycle = Lifecycle::Active(Box::new(ActiveSession {
            state,
            rep_counter: RepCounter::new(
                self.thresholds.rep_descend_threshold,
                self.thresholds.rep_ascend_threshold,
            ),
            vertical_axis,
            elapsed: Duration::ZERO,
            classifications: 0,
            heart_rate: HeartRateStats::default(),
        }));

        Ok(())
    }

    /// Blend a form or motion classification into the smoothed accuracy.
    /// Returns a corrective alert when an incorrect event drags accuracy
    /// below the alert threshold.
    pub fn on_classification(
        &mut self,
        event: impl Into<ClassificationEvent>,
    ) -> Option<CorrectiveFeedback> {
        let Lifecycle::Active(session) = &mut self.lifecycle else {
            return None;
        };

        let event = event.into();
        let confidence = event.confidence();
        if !confidence.is_finite() {
            tracing::warn!("Ignoring classification with non-finite confidence");
            return None;
        }

        session.classifications += 1;
        let state = &mut session.state;
        state.smoothed_accuracy = (state.smoothed_accuracy + confidence * 100.0) / 2.0;

        let message = match &event {
            ClassificationEvent::Form(form) => form.feedback_message.clone(),
            ClassificationEvent::Motion(motion) => motion_feedback(motion).to_string(),
        };
        state.last_feedback = Some(message.clone());

        if event.is_incorrect() && state.smoothed_accuracy < self.thresholds.accuracy_alert {
            tracing::debug!(
                "Corrective feedback at accuracy {:.1}: {}",
                state.smoothed_accuracy,
                message
            );
            return Some(CorrectiveFeedback {
                message,
                smoothed_accuracy: state.smoothed_accuracy,
            });
        }

        None
    }

    /// Feed one wearable sample to the rep detector; returns the new count
    /// when the sample completes a repetition
    pub fn on_inertial_sample(&mut self, sample: &InertialSample) -> Option<u32> {
        let Lifecycle::Active(session) = &mut self.lifecycle else {
            return None;
        };

        let vertical = *sample.acceleration.get(session.vertical_axis)?;
        if !session.rep_counter.update(vertical) {
            return None;
        }

        session.state.repetition_count = session.rep_counter.count();
        session.refresh_calories();

        tracing::debug!(
            "Repetition {} completed in session {}",
            session.state.repetition_count,
            session.state.session_id
        );

        Some(session.state.repetition_count)
    }

    pub fn on_heart_rate(&mut self, bpm: f32) {
        let Lifecycle::Active(session) = &mut self.lifecycle else {
            return;
        };

        if !bpm.is_finite() || bpm <= 0.0 {
            tracing::warn!("Ignoring invalid heart rate reading: {}", bpm);
            return;
        }

        session.heart_rate.record(bpm);
    }

    /// Advance the session timer by time measured by the host
    pub fn advance(&mut self, elapsed: Duration) {
        let Lifecycle::Active(session) = &mut self.lifecycle else {
            return;
        };

        session.elapsed += elapsed;
        session.state.elapsed_seconds = session.elapsed.as_secs_f64();
        session.refresh_calories();
    }

    /// Finish the session and return its summary. Finishing again returns
    /// the same summary.
    pub fn finish(&mut self) -> Result<SessionSummary, SessionError> {
        let session = match std::mem::replace(&mut self.lifecycle, Lifecycle::Idle) {
            Lifecycle::Idle => return Err(SessionError::NotStarted),
            Lifecycle::Finished { state, summary } => {
                self.lifecycle = Lifecycle::Finished {
                    state,
                    summary: summary.clone(),
                };
                return Ok(summary);
            }
            Lifecycle::Active(session) => session,
        };

        let summary = self.summarize(&session);

        tracing::info!(
            "Finished {} session {}: {} reps, accuracy {:.1}%, {:.1} kcal",
            summary.exercise_type,
            summary.session_id,
            summary.repetition_count,
            summary.final_accuracy,
            summary.estimated_calories
        );

        self.lifecycle = Lifecycle::Finished {
            state: session.state,
            summary: summary.clone(),
        };

        Ok(summary)
    }

    fn summarize(&self, session: &ActiveSession) -> SessionSummary {
        let state = &session.state;

        let mut achievements = Vec::new();
        if session.classifications > 0
            && state.smoothed_accuracy >= self.thresholds.perfect_form_accuracy
        {
            achievements.push(Achievement::PerfectForm);
        }

        let finished_at = chrono::Duration::from_std(session.elapsed)
            .ok()
            .and_then(|elapsed| state.started_at.checked_add_signed(elapsed))
            .unwrap_or(state.started_at);

        SessionSummary {
            session_id: state.session_id,
            exercise_type: state.exercise_type.clone(),
            final_accuracy: state.smoothed_accuracy,
            repetition_count: state.repetition_count,
            elapsed_seconds: state.elapsed_seconds,
            estimated_calories: state.calorie_estimate,
            average_heart_rate: session.heart_rate.average(),
            peak_heart_rate: session.heart_rate.peak,
            achievements,
            started_at: state.started_at,
            finished_at,
        }
    }
}

impl Default for SessionAggregator {
    fn default() -> Self {
        Self::new(SessionThresholds::default())
    }
}
