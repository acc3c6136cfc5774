use sora_proto::ProtoError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("invalid server url: {0}")]
    InvalidUrl(String),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed event: {0}")]
    Decode(#[from] ProtoError),

    #[error("stream ended before a terminal event")]
    IncompleteStream,
}

/// Why a submission was refused before any request went out.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitError {
    #[error("prompt is empty")]
    EmptyPrompt,

    #[error("a generation is already in progress")]
    Busy,
}
