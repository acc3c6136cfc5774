use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

pub const DEFAULT_VIDEO_URL: &str =
    "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/BigBuckBunny.mp4";

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Settings {
    pub server: ServerConfig,
    pub generation: GenerationConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GeneratorBackend {
    Placeholder,
    Unavailable,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GenerationConfig {
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
    pub backend: GeneratorBackend,
    pub video_url: String,
    pub require_prompt: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: 800,
            max_delay_ms: 1200,
            backend: GeneratorBackend::Placeholder,
            video_url: DEFAULT_VIDEO_URL.to_string(),
            require_prompt: false,
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = Config::builder()
            .add_source(Config::try_from(&Settings::default())?)
            .add_source(File::with_name("config/settings").required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true)
            )
            .build()?;

        let settings: Settings = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        let g = &self.generation;
        if g.min_delay_ms > g.max_delay_ms {
            anyhow::bail!(
                "generation.min_delay_ms ({}) must not exceed generation.max_delay_ms ({})",
                g.min_delay_ms,
                g.max_delay_ms
            );
        }
        Ok(())
    }
}
