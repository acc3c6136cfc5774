use crate::error::ClientError;
use bytes::Bytes;
use futures::stream::{Stream, StreamExt};
use reqwest::Url;
use sora_proto::{FrameDecoder, GenerationRequest, ProgressEvent};
use std::pin::Pin;
use tracing::{debug, warn};

pub type ProgressStream = Pin<Box<dyn Stream<Item = Result<ProgressEvent, ClientError>> + Send>>;

const GENERATE_PATH: &str = "/api/generate";

#[derive(Clone, Debug)]
pub struct Client {
    http: reqwest::Client,
    endpoint: Url,
}

impl Client {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let base = Url::parse(base_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        let endpoint = base
            .join(GENERATE_PATH)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        Ok(Self {
            http: reqwest::Client::builder().build()?,
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Open the generation stream for `prompt`.
    ///
    /// The returned stream yields events in send order and ends right after
    /// the first terminal event; anything the server sends after it is
    /// dropped. A body that closes before any terminal event yields
    /// [`ClientError::IncompleteStream`] as its last item.
    pub async fn generate(&self, prompt: &str) -> Result<ProgressStream, ClientError> {
        debug!("POST {} (prompt_len={})", self.endpoint, prompt.len());

        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&GenerationRequest::new(prompt))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status { status, body });
        }

        Ok(Box::pin(decode_events(response.bytes_stream())))
    }
}

/// Turn a raw body into events, stopping after the first terminal one.
pub fn decode_events<S>(body: S) -> impl Stream<Item = Result<ProgressEvent, ClientError>> + Send
where
    S: Stream<Item = Result<Bytes, reqwest::Error>> + Send + 'static,
{
    let mut body = Box::pin(body);

    async_stream::try_stream! {
        let mut decoder = FrameDecoder::new();
        let mut finished = false;

        'read: while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(ClientError::from)?;

            for event in decoder.push(&chunk) {
                let event = event.map_err(ClientError::from)?;
                let terminal = event.is_terminal();
                yield event;

                if terminal {
                    finished = true;
                    break 'read;
                }
            }
        }

        if finished {
            if decoder.pending_bytes() > 0 {
                warn!("Discarding {} bytes after terminal event", decoder.pending_bytes());
            }
        } else {
            if let Some(event) = decoder.finish() {
                let event = event.map_err(ClientError::from)?;
                finished = event.is_terminal();
                yield event;
            }
            if !finished {
                Err::<(), ClientError>(ClientError::IncompleteStream)?;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use crate::test_support::scripted_body;
    use sora_proto::{encode_frame, GenerationStatus};
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn serve(body: String) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
            .mount(&server)
            .await;
        server
    }

    async fn collect(stream: ProgressStream) -> Vec<Result<ProgressEvent, ClientError>> {
        stream.collect().await
    }

    #[tokio::test]
    async fn test_scripted_stream_is_consumed_in_order() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .and(body_json(json!({"prompt": "A serene sunset"})))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                scripted_body(Some(ProgressEvent::completed("https://cdn/v.mp4"))),
                "text/event-stream",
            ))
            .mount(&server)
            .await;

        let client = Client::new(&server.uri()).unwrap();
        let events: Vec<ProgressEvent> = collect(client.generate("A serene sunset").await.unwrap())
            .await
            .into_iter()
            .map(|r| r.unwrap())
            .collect();

        let progress: Vec<u8> = events.iter().map(|e| e.progress()).collect();
        assert_eq!(progress, vec![10, 25, 40, 55, 70, 85, 95, 100]);
        assert_eq!(events[7].status(), GenerationStatus::Completed);
        assert_eq!(events[7].video_url(), Some("https://cdn/v.mp4"));
    }

    #[tokio::test]
    async fn test_nothing_after_terminal_event() {
        let mut body = scripted_body(Some(ProgressEvent::failed()));
        body.push_str(&encode_frame(&ProgressEvent::completed("late")).unwrap());
        let server = serve(body).await;

        let client = Client::new(&server.uri()).unwrap();
        let items = collect(client.generate("x").await.unwrap()).await;

        assert_eq!(items.len(), 8);
        let last = items.last().unwrap().as_ref().unwrap();
        assert_eq!(last.status(), GenerationStatus::Failed);
    }

    #[tokio::test]
    async fn test_missing_terminal_is_an_error() {
        let server = serve(scripted_body(None)).await;

        let client = Client::new(&server.uri()).unwrap();
        let items = collect(client.generate("x").await.unwrap()).await;

        assert_eq!(items.len(), 8);
        assert!(items[..7].iter().all(|r| r.is_ok()));
        assert!(matches!(items[7], Err(ClientError::IncompleteStream)));
    }

    #[tokio::test]
    async fn test_garbage_frame_is_a_decode_error() {
        let server = serve("data: {\"status\":\"exploded\"}\n\n".to_string()).await;

        let client = Client::new(&server.uri()).unwrap();
        let items = collect(client.generate("x").await.unwrap()).await;

        assert_eq!(items.len(), 1);
        assert!(matches!(items[0], Err(ClientError::Decode(_))));
    }

    #[tokio::test]
    async fn test_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad"))
            .mount(&server)
            .await;

        let client = Client::new(&server.uri()).unwrap();
        match client.generate("").await {
            Err(ClientError::Status { status, body }) => {
                assert_eq!(status, 400);
                assert_eq!(body, "bad");
            }
            other => panic!("expected status error, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_decode_events_across_chunk_boundaries() {
        let body = scripted_body(Some(ProgressEvent::completed("https://cdn/v.mp4")));
        let chunks: Vec<Result<Bytes, reqwest::Error>> = body
            .as_bytes()
            .chunks(7)
            .map(|c| Ok(Bytes::copy_from_slice(c)))
            .collect();

        let events: Vec<Result<ProgressEvent, ClientError>> =
            decode_events(futures::stream::iter(chunks)).collect().await;

        assert_eq!(events.len(), 8);
        assert!(events.iter().all(|r| r.is_ok()));
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(Client::new("not a url"), Err(ClientError::InvalidUrl(_))));
        let client = Client::new("http://localhost:3000/ignored").unwrap();
        assert_eq!(client.endpoint().as_str(), "http://localhost:3000/api/generate");
    }
}
