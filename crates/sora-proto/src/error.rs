use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProtoError {
    #[error("frame is not valid UTF-8")]
    InvalidUtf8,

    #[error("malformed event payload: {0}")]
    BadPayload(#[from] serde_json::Error),

    #[error("progress {0} is outside 0-100")]
    ProgressOutOfRange(u8),
}
