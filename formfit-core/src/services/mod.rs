// Analyzers and session state

pub mod feedback;
pub mod geometry;
pub mod motion_matcher;
pub mod pattern_library;
pub mod pose_evaluator;
pub mod rep_counter;
pub mod session_aggregator;

pub use motion_matcher::{MotionAxes, MotionMatcher};
pub use pattern_library::PatternLibrary;
pub use pose_evaluator::PoseEvaluator;
pub use rep_counter::RepCounter;
pub use session_aggregator::SessionAggregator;
