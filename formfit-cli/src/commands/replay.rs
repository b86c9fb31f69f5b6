use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use formfit_core::models::{ExerciseType, SessionSummary};
use formfit_core::services::{MotionMatcher, PatternLibrary, PoseEvaluator, SessionAggregator};
use formfit_core::FormFitConfig;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::models::Recording;

#[derive(Args)]
pub struct ReplayCommand {
    /// Recorded session (JSON)
    recording: PathBuf,

    /// Override the exercise type stored in the recording
    #[arg(short, long)]
    exercise: Option<String>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

/// What a frame produced, for the event log
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReplayEvent {
    Form {
        timestamp_ms: u64,
        quality: String,
        confidence: f32,
        message: String,
    },
    Motion {
        timestamp_ms: u64,
        pattern: String,
        error: String,
        similarity: f32,
    },
    Alert {
        timestamp_ms: u64,
        message: String,
        smoothed_accuracy: f32,
    },
    Repetition {
        timestamp_ms: u64,
        count: u32,
    },
}

impl ReplayEvent {
    fn is_frame_detail(&self) -> bool {
        matches!(self, ReplayEvent::Form { .. } | ReplayEvent::Motion { .. })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub exercise_type: ExerciseType,
    pub frames: usize,
    /// Pose results per form quality
    pub form_results: BTreeMap<String, u32>,
    /// Motion results per error type
    pub motion_results: BTreeMap<String, u32>,
    pub events: Vec<ReplayEvent>,
    pub summary: SessionSummary,
}

impl ReplayReport {
    pub fn alerts(&self) -> impl Iterator<Item = &ReplayEvent> {
        self.events
            .iter()
            .filter(|event| matches!(event, ReplayEvent::Alert { .. }))
    }
}

/// Run every frame of a recording through the analyzers and a fresh session
pub fn replay(
    recording: &Recording,
    exercise_type: &ExerciseType,
    thresholds: &FormFitConfig,
) -> Result<ReplayReport> {
    let evaluator = PoseEvaluator::with_thresholds(thresholds.pose.clone());
    let matcher = MotionMatcher::with_thresholds(
        Arc::new(PatternLibrary::new()),
        thresholds.motion.clone(),
    );
    let mut session = SessionAggregator::new(thresholds.session.clone());
    session
        .start(exercise_type.clone())
        .context("Failed to start replay session")?;

    let mut form_results = BTreeMap::new();
    let mut motion_results = BTreeMap::new();
    let mut events = Vec::new();
    let mut previous_ms: Option<u64> = None;

    for frame in &recording.frames {
        let ts = frame.timestamp_ms;
        if let Some(previous) = previous_ms {
            session.advance(Duration::from_millis(ts.saturating_sub(previous)));
        }
        previous_ms = Some(ts);

        if let Some(bpm) = frame.heart_rate {
            session.on_heart_rate(bpm);
        }

        if let Some(pose) = &frame.pose {
            let form = evaluator.evaluate(pose, exercise_type);
            *form_results.entry(form.quality.to_string()).or_insert(0) += 1;
            events.push(ReplayEvent::Form {
                timestamp_ms: ts,
                quality: form.quality.to_string(),
                confidence: form.confidence,
                message: form.feedback_message.clone(),
            });

            if let Some(alert) = session.on_classification(form) {
                events.push(ReplayEvent::Alert {
                    timestamp_ms: ts,
                    message: alert.message,
                    smoothed_accuracy: alert.smoothed_accuracy,
                });
            }
        }

        if let Some(sample) = &frame.inertial {
            let motion = matcher.classify(sample, exercise_type);
            *motion_results.entry(motion.error_type.to_string()).or_insert(0) += 1;
            events.push(ReplayEvent::Motion {
                timestamp_ms: ts,
                pattern: motion.pattern_type.to_string(),
                error: motion.error_type.to_string(),
                similarity: motion.similarity_score,
            });

            if let Some(alert) = session.on_classification(motion) {
                events.push(ReplayEvent::Alert {
                    timestamp_ms: ts,
                    message: alert.message,
                    smoothed_accuracy: alert.smoothed_accuracy,
                });
            }

            if let Some(count) = session.on_inertial_sample(sample) {
                events.push(ReplayEvent::Repetition {
                    timestamp_ms: ts,
                    count,
                });
            }
        }
    }

    let summary = session.finish().context("Failed to finish replay session")?;

    Ok(ReplayReport {
        exercise_type: exercise_type.clone(),
        frames: recording.frames.len(),
        form_results,
        motion_results,
        events,
        summary,
    })
}

impl ReplayCommand {
    pub fn execute(self, config: &Config) -> Result<()> {
        let recording = Recording::load(&self.recording)?;
        let exercise_type = match &self.exercise {
            Some(name) => ExerciseType::from(name.clone()),
            None => recording.exercise_type.clone(),
        };

        let report = replay(&recording, &exercise_type, &config.thresholds)?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            print_report(&report, config.output.show_frames);
        }

        Ok(())
    }
}

fn print_report(report: &ReplayReport, show_frames: bool) {
    println!(
        "{} {} session ({} frames)",
        "Replaying".bold(),
        report.exercise_type.to_string().cyan(),
        report.frames
    );
    println!();

    for event in &report.events {
        if event.is_frame_detail() && !show_frames {
            continue;
        }
        print_event(event);
    }

    let summary = &report.summary;
    println!();
    println!("{}", "Summary".bold());
    println!("  {} {}", "Repetitions:".dimmed(), summary.repetition_count);

    let accuracy = format!("{:.1}%", summary.final_accuracy);
    let accuracy = if summary.final_accuracy >= 85.0 {
        accuracy.green()
    } else {
        accuracy.yellow()
    };
    println!("  {} {}", "Accuracy:".dimmed(), accuracy);
    println!("  {} {:.1} s", "Elapsed:".dimmed(), summary.elapsed_seconds);
    println!("  {} {:.1} kcal", "Calories:".dimmed(), summary.estimated_calories);

    if let (Some(average), Some(peak)) = (summary.average_heart_rate, summary.peak_heart_rate) {
        println!(
            "  {} {:.0} bpm avg, {:.0} bpm peak",
            "Heart rate:".dimmed(),
            average,
            peak
        );
    }

    if !report.form_results.is_empty() {
        println!("  {} {}", "Form:".dimmed(), format_counts(&report.form_results));
    }
    if !report.motion_results.is_empty() {
        println!("  {} {}", "Motion:".dimmed(), format_counts(&report.motion_results));
    }

    for achievement in &summary.achievements {
        println!(
            "  {} {} - {}",
            "Achievement:".dimmed(),
            achievement.title().green().bold(),
            achievement.description()
        );
    }
}

fn print_event(event: &ReplayEvent) {
    match event {
        ReplayEvent::Form {
            timestamp_ms,
            quality,
            confidence,
            message,
        } => println!(
            "  [{:>6} ms] form   {} ({:.2}) {}",
            timestamp_ms,
            quality,
            confidence,
            message.dimmed()
        ),
        ReplayEvent::Motion {
            timestamp_ms,
            pattern,
            error,
            similarity,
        } => println!(
            "  [{:>6} ms] motion {} / {} ({:.2})",
            timestamp_ms, pattern, error, similarity
        ),
        ReplayEvent::Alert {
            timestamp_ms,
            message,
            smoothed_accuracy,
        } => println!(
            "  [{:>6} ms] {} {} (accuracy {:.1}%)",
            timestamp_ms,
            "[ALERT]".red().bold(),
            message,
            smoothed_accuracy
        ),
        ReplayEvent::Repetition {
            timestamp_ms,
            count,
        } => println!(
            "  [{:>6} ms] {} {}",
            timestamp_ms,
            "[REP]".green().bold(),
            count
        ),
    }
}

fn format_counts(counts: &BTreeMap<String, u32>) -> String {
    counts
        .iter()
        .map(|(name, count)| format!("{} x{}", name, count))
        .collect::<Vec<_>>()
        .join(", ")
}
