//! Corrective message selection
//!
//! Deterministic lookup from a classification and exercise to a short cue.

use crate::models::{ExerciseType, FormQuality, MotionClassification, MotionErrorType, PatternType};

pub fn form_feedback(quality: FormQuality, exercise_type: &ExerciseType) -> &'static str {
    match quality {
        FormQuality::Correct => "Good form! Keep it up.",
        FormQuality::ErrorDepth => match exercise_type {
            ExerciseType::Squat => "Try to go deeper in your squat.",
            ExerciseType::PushUp => "Lower your chest closer to the ground.",
            ExerciseType::Lunge => "Lower your back knee closer to the ground.",
            _ => "Increase your range of motion.",
        },
        FormQuality::ErrorKneeAlignment => match exercise_type {
            ExerciseType::Squat => "Keep your knees in line with your toes.",
            ExerciseType::Lunge => "Keep your front knee aligned with your ankle.",
            _ => "Check your knee alignment.",
        },
        FormQuality::ErrorBackPosture => match exercise_type {
            ExerciseType::PushUp | ExerciseType::Plank => {
                "Keep your body in a straight line from shoulders to ankles."
            }
            _ => "Keep your back straight throughout the movement.",
        },
        FormQuality::ErrorGeneral => "Focus on maintaining proper form.",
        FormQuality::Unknown => "Continue the exercise.",
    }
}

pub fn motion_feedback(classification: &MotionClassification) -> &'static str {
    match classification.pattern_type {
        PatternType::Correct => return "Good form",
        PatternType::Unknown => return "Continue the exercise.",
        PatternType::Incorrect => {}
    }

    match classification.error_type {
        MotionErrorType::TooFast => "Slow down your movement",
        MotionErrorType::TooSlow => "Try to maintain a steady pace",
        MotionErrorType::WrongAngle => match classification.exercise_type {
            ExerciseType::Squat => "Keep your back straight and knees aligned",
            ExerciseType::PushUp => "Lower your body in a straight line",
            _ => "Check your form alignment",
        },
        MotionErrorType::IncompleteRange => match classification.exercise_type {
            ExerciseType::Squat => "Go deeper in your squat",
            ExerciseType::PushUp => "Lower your chest closer to the ground",
            _ => "Complete the full range of motion",
        },
        MotionErrorType::None => "Maintain proper form",
    }
}
