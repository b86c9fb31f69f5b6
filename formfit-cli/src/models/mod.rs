pub mod recording;

pub use recording::{Frame, Recording};
