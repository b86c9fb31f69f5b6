// Library exports for the FormFit exercise feedback core

pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use config::FormFitConfig;
pub use error::{GeometryError, SessionError};
pub use models::*;
pub use services::{
    MotionMatcher, PatternLibrary, PoseEvaluator, RepCounter, SessionAggregator,
};
