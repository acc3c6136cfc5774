pub mod generator;
pub mod palette;
pub mod streamer;

pub use generator::{build_generator, GenerationError, VideoGenerator};
pub use streamer::{ProgressStreamer, StageDelay, STAGES};
