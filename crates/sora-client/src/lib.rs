//! Client side of the generation stream: the HTTP consumer, the in-memory
//! record book, and the session that ties submissions to records.

pub mod client;
pub mod error;
pub mod records;
pub mod session;

pub use client::{Client, ProgressStream};
pub use error::{ClientError, SubmitError};
pub use records::{ApplyOutcome, GenerationRecord, RecordBook, RecordId};
pub use session::{RecordUpdate, Session, Update};

pub use sora_proto::{GenerationStatus, ProgressEvent};

#[cfg(test)]
pub(crate) mod test_support {
    use sora_proto::{encode_frame, ProgressEvent};

    /// The seven reference stages, optionally followed by a terminal event.
    pub fn scripted_body(terminal: Option<ProgressEvent>) -> String {
        let stages = [
            (10, "Analyzing prompt..."),
            (25, "Generating scene layout..."),
            (40, "Creating visual elements..."),
            (55, "Applying motion dynamics..."),
            (70, "Rendering frames..."),
            (85, "Adding transitions..."),
            (95, "Finalizing video..."),
        ];
        let mut body = String::new();
        for (progress, message) in stages {
            body.push_str(&encode_frame(&ProgressEvent::stage(progress, message)).unwrap());
        }
        if let Some(event) = terminal {
            body.push_str(&encode_frame(&event).unwrap());
        }
        body
    }
}
