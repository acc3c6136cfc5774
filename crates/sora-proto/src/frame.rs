use crate::{ProgressEvent, ProtoError};
use bytes::{Buf, BytesMut};

/// Prefix of every data line in the event stream.
pub const DATA_PREFIX: &str = "data: ";

/// Frame one event: `data: <json>\n\n`.
pub fn encode_frame(event: &ProgressEvent) -> Result<String, ProtoError> {
    let json = serde_json::to_string(event)?;
    Ok(format!("{}{}\n\n", DATA_PREFIX, json))
}

/// Parse a single line. Returns `None` for lines that carry no event
/// (blank separators, `:` comments, other SSE fields).
pub fn decode_line(line: &str) -> Option<Result<ProgressEvent, ProtoError>> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let payload = line.strip_prefix(DATA_PREFIX)?;

    let parsed = serde_json::from_str::<ProgressEvent>(payload)
        .map_err(ProtoError::from)
        .and_then(|event| event.validate().map(|_| event));
    Some(parsed)
}

/// Incremental decoder for a chunked event stream.
///
/// Network chunks do not respect line boundaries, so bytes are buffered until
/// a full line is available. UTF-8 is only checked on complete lines, which
/// keeps multi-byte characters split across chunks intact.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    buffer: BytesMut,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk, returning every event completed by it, in order.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<Result<ProgressEvent, ProtoError>> {
        self.buffer.extend_from_slice(chunk);

        let mut out = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line = self.buffer.split_to(pos);
            self.buffer.advance(1); // newline

            match std::str::from_utf8(&line) {
                Ok(text) => {
                    if let Some(event) = decode_line(text) {
                        out.push(event);
                    }
                }
                Err(_) => out.push(Err(ProtoError::InvalidUtf8)),
            }
        }
        out
    }

    /// Flush a trailing line that never got its newline.
    pub fn finish(mut self) -> Option<Result<ProgressEvent, ProtoError>> {
        if self.buffer.is_empty() {
            return None;
        }
        let rest = self.buffer.split();
        match std::str::from_utf8(&rest) {
            Ok(text) => decode_line(text),
            Err(_) => Some(Err(ProtoError::InvalidUtf8)),
        }
    }

    pub fn pending_bytes(&self) -> usize {
        self.buffer.len()
    }
}
