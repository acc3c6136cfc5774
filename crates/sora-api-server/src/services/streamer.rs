use futures::stream::Stream;
use rand::Rng;
use sora_proto::ProgressEvent;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::GenerationConfig;
use crate::services::generator::VideoGenerator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stage {
    pub progress: u8,
    pub message: &'static str,
}

pub const STAGES: [Stage; 7] = [
    Stage { progress: 10, message: "Analyzing prompt..." },
    Stage { progress: 25, message: "Generating scene layout..." },
    Stage { progress: 40, message: "Creating visual elements..." },
    Stage { progress: 55, message: "Applying motion dynamics..." },
    Stage { progress: 70, message: "Rendering frames..." },
    Stage { progress: 85, message: "Adding transitions..." },
    Stage { progress: 95, message: "Finalizing video..." },
];

/// Pause after each stage, uniform in `[min, max)`. Equal bounds give a
/// fixed pause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageDelay {
    min_ms: u64,
    max_ms: u64,
}

impl StageDelay {
    pub fn new(min_ms: u64, max_ms: u64) -> Self {
        Self {
            min_ms: min_ms.min(max_ms),
            max_ms: max_ms.max(min_ms),
        }
    }

    pub fn fixed(ms: u64) -> Self {
        Self::new(ms, ms)
    }

    pub fn sample(&self) -> Duration {
        if self.min_ms == self.max_ms {
            return Duration::from_millis(self.min_ms);
        }
        Duration::from_millis(rand::rng().random_range(self.min_ms..self.max_ms))
    }
}

impl From<&GenerationConfig> for StageDelay {
    fn from(config: &GenerationConfig) -> Self {
        StageDelay::new(config.min_delay_ms, config.max_delay_ms)
    }
}

/// Scripted progress for one request: seven stages, then exactly one
/// terminal event from the generator's outcome.
pub struct ProgressStreamer {
    generator: Arc<dyn VideoGenerator>,
    delay: StageDelay,
}

impl ProgressStreamer {
    pub fn new(generator: Arc<dyn VideoGenerator>, delay: StageDelay) -> Self {
        Self { generator, delay }
    }

    pub fn generator_name(&self) -> &'static str {
        self.generator.name()
    }

    pub fn stream(&self, prompt: String) -> impl Stream<Item = ProgressEvent> + Send + 'static {
        let generator = self.generator.clone();
        let delay = self.delay;

        async_stream::stream! {
            for stage in STAGES.iter() {
                debug!("Stage {}%: {}", stage.progress, stage.message);
                yield ProgressEvent::stage(stage.progress, stage.message);

                tokio::time::sleep(delay.sample()).await;
            }

            match generator.generate(&prompt).await {
                Ok(video_url) => {
                    info!("Generation completed via {}: {}", generator.name(), video_url);
                    yield ProgressEvent::completed(video_url);
                }
                Err(e) => {
                    warn!("Generation failed via {}: {}", generator.name(), e);
                    yield ProgressEvent::failed();
                }
            }
        }
    }
}
