use serde::{Deserialize, Serialize};

use crate::ProtoError;

/// Error text carried by every `failed` event, regardless of cause.
pub const FAILURE_MESSAGE: &str = "Failed to generate video";

// ===== REQUEST =====

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenerationRequest {
    #[serde(default)]
    pub prompt: String,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
        }
    }
}

// ===== EVENTS =====

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationStatus {
    Generating,
    Completed,
    Failed,
}

impl GenerationStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Generating => "generating",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

/// One frame of the generation stream. The wire form is tagged by `status`,
/// so each variant carries exactly the fields of its payload shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ProgressEvent {
    Generating {
        progress: u8,
        message: String,
    },
    Completed {
        progress: u8,
        #[serde(rename = "videoUrl")]
        video_url: String,
    },
    Failed {
        progress: u8,
        error: String,
    },
}

impl ProgressEvent {
    pub fn stage(progress: u8, message: impl Into<String>) -> Self {
        Self::Generating {
            progress,
            message: message.into(),
        }
    }

    pub fn completed(video_url: impl Into<String>) -> Self {
        Self::Completed {
            progress: 100,
            video_url: video_url.into(),
        }
    }

    pub fn failed() -> Self {
        Self::Failed {
            progress: 0,
            error: FAILURE_MESSAGE.to_string(),
        }
    }

    pub fn progress(&self) -> u8 {
        match self {
            Self::Generating { progress, .. }
            | Self::Completed { progress, .. }
            | Self::Failed { progress, .. } => *progress,
        }
    }

    pub fn status(&self) -> GenerationStatus {
        match self {
            Self::Generating { .. } => GenerationStatus::Generating,
            Self::Completed { .. } => GenerationStatus::Completed,
            Self::Failed { .. } => GenerationStatus::Failed,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status().is_terminal()
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Generating { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn video_url(&self) -> Option<&str> {
        match self {
            Self::Completed { video_url, .. } => Some(video_url),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed { error, .. } => Some(error),
            _ => None,
        }
    }

    pub fn validate(&self) -> Result<(), ProtoError> {
        let progress = self.progress();
        if progress > 100 {
            return Err(ProtoError::ProgressOutOfRange(progress));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_shapes() {
        let stage = serde_json::to_value(ProgressEvent::stage(10, "Analyzing prompt...")).unwrap();
        assert_eq!(
            stage,
            json!({"status": "generating", "progress": 10, "message": "Analyzing prompt..."})
        );

        let done = serde_json::to_value(ProgressEvent::completed("https://x/v.mp4")).unwrap();
        assert_eq!(
            done,
            json!({"status": "completed", "progress": 100, "videoUrl": "https://x/v.mp4"})
        );

        let failed = serde_json::to_value(ProgressEvent::failed()).unwrap();
        assert_eq!(
            failed,
            json!({"status": "failed", "progress": 0, "error": "Failed to generate video"})
        );
    }

    #[test]
    fn test_unknown_status_rejected() {
        let res = serde_json::from_str::<ProgressEvent>(r#"{"status":"paused","progress":5}"#);
        assert!(res.is_err());
    }

    #[test]
    fn test_missing_prompt_defaults_to_empty() {
        let req: GenerationRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.prompt, "");
    }

    #[test]
    fn test_progress_range() {
        assert!(ProgressEvent::stage(100, "x").validate().is_ok());
        assert!(matches!(
            ProgressEvent::stage(101, "x").validate(),
            Err(ProtoError::ProgressOutOfRange(101))
        ));
    }

    #[test]
    fn test_terminal_states() {
        assert!(!GenerationStatus::Generating.is_terminal());
        assert!(GenerationStatus::Completed.is_terminal());
        assert!(ProgressEvent::failed().is_terminal());
        assert_eq!(ProgressEvent::completed("u").video_url(), Some("u"));
    }
}
