use std::sync::Arc;
use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::{GenerationConfig, GeneratorBackend};
use crate::services::palette::ScenePalette;

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Generator unavailable: {0}")]
    Unavailable(String),

    #[error("Generator backend error: {0}")]
    Backend(String),
}

/// Produces the final artifact for a prompt. Every failure surfaces to the
/// client as the same generic `failed` event.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VideoGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;

    fn name(&self) -> &'static str;
}

/// Always answers with the configured sample video.
pub struct PlaceholderGenerator {
    video_url: String,
}

impl PlaceholderGenerator {
    pub fn new(video_url: String) -> Self {
        Self { video_url }
    }
}

#[async_trait]
impl VideoGenerator for PlaceholderGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        if self.video_url.trim().is_empty() {
            return Err(GenerationError::Unavailable(
                "no placeholder video_url configured".to_string(),
            ));
        }

        let palette = ScenePalette::from_prompt(prompt);
        debug!(
            "Scene palette {:?}: {} -> {}",
            palette,
            palette.color_at(0.0),
            palette.color_at(1.0)
        );

        Ok(self.video_url.clone())
    }

    fn name(&self) -> &'static str {
        "placeholder"
    }
}

pub struct UnavailableGenerator;

#[async_trait]
impl VideoGenerator for UnavailableGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
        Err(GenerationError::Unavailable(
            "generation backend is disabled".to_string(),
        ))
    }

    fn name(&self) -> &'static str {
        "unavailable"
    }
}

pub fn build_generator(config: &GenerationConfig) -> Arc<dyn VideoGenerator> {
    let generator: Arc<dyn VideoGenerator> = match config.backend {
        GeneratorBackend::Placeholder => {
            Arc::new(PlaceholderGenerator::new(config.video_url.clone()))
        }
        GeneratorBackend::Unavailable => Arc::new(UnavailableGenerator),
    };
    info!("Video generator backend: {}", generator.name());
    generator
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_placeholder_ignores_prompt() {
        let gen = PlaceholderGenerator::new("https://cdn/v.mp4".to_string());
        assert_eq!(gen.generate("A serene sunset").await.unwrap(), "https://cdn/v.mp4");
        assert_eq!(gen.generate("").await.unwrap(), "https://cdn/v.mp4");
    }

    #[tokio::test]
    async fn test_placeholder_without_url_fails() {
        let gen = PlaceholderGenerator::new("  ".to_string());
        assert!(matches!(
            gen.generate("x").await,
            Err(GenerationError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_build_generator_follows_backend() {
        let mut config = GenerationConfig::default();
        assert_eq!(build_generator(&config).name(), "placeholder");

        config.backend = GeneratorBackend::Unavailable;
        let gen = build_generator(&config);
        assert_eq!(gen.name(), "unavailable");
        assert!(gen.generate("x").await.is_err());
    }
}
