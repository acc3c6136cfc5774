use futures::StreamExt;
use sora_proto::ProgressEvent;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::client::Client;
use crate::error::SubmitError;
use crate::records::{ApplyOutcome, RecordBook, RecordId};

#[derive(Debug, Clone)]
pub enum RecordUpdate {
    Event(ProgressEvent),
    /// Connect, status, read or decode failure. The cause is only logged.
    TransportFailed(String),
}

#[derive(Debug, Clone)]
pub struct Update {
    pub id: RecordId,
    pub update: RecordUpdate,
}

/// Submissions and their records.
///
/// Each submission streams on its own task and sends updates back over a
/// channel. The record book is only touched by [`Session::drain`] and
/// [`Session::next_update`], so the caller's loop is the single writer.
pub struct Session {
    client: Client,
    book: RecordBook,
    tx: mpsc::UnboundedSender<Update>,
    rx: mpsc::UnboundedReceiver<Update>,
}

impl Session {
    pub fn new(client: Client) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            client,
            book: RecordBook::new(),
            tx,
            rx,
        }
    }

    pub fn records(&self) -> &RecordBook {
        &self.book
    }

    /// Derived from the records; there is no separate flag to keep in sync.
    pub fn is_generating(&self) -> bool {
        self.book.is_generating()
    }

    /// Create a record and start streaming. Must be called inside a tokio
    /// runtime.
    pub fn submit(&mut self, prompt: &str) -> Result<RecordId, SubmitError> {
        if prompt.trim().is_empty() {
            return Err(SubmitError::EmptyPrompt);
        }
        if self.is_generating() {
            return Err(SubmitError::Busy);
        }

        let id = self.book.start(prompt);
        info!("Submitted record {}", id);

        tokio::spawn(drive(self.client.clone(), id, prompt.to_string(), self.tx.clone()));
        Ok(id)
    }

    /// Apply every update that has already arrived, without waiting.
    pub fn drain(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(update) = self.rx.try_recv() {
            self.apply(update);
            applied += 1;
        }
        applied
    }

    /// Wait for the next update and apply it.
    pub async fn next_update(&mut self) -> Option<(Update, ApplyOutcome)> {
        let update = self.rx.recv().await?;
        let outcome = self.apply(update.clone());
        Some((update, outcome))
    }

    fn apply(&mut self, update: Update) -> ApplyOutcome {
        match &update.update {
            RecordUpdate::Event(event) => self.book.apply(&update.id, event),
            RecordUpdate::TransportFailed(reason) => {
                warn!("Record {} failed in transport: {}", update.id, reason);
                self.book.mark_failed(&update.id)
            }
        }
    }
}

async fn drive(client: Client, id: RecordId, prompt: String, tx: mpsc::UnboundedSender<Update>) {
    let send = |update: RecordUpdate| {
        // Receiver gone means the session was dropped; nothing left to update.
        let _ = tx.send(Update { id, update });
    };

    let mut stream = match client.generate(&prompt).await {
        Ok(stream) => stream,
        Err(e) => {
            send(RecordUpdate::TransportFailed(e.to_string()));
            return;
        }
    };

    while let Some(item) = stream.next().await {
        match item {
            Ok(event) => send(RecordUpdate::Event(event)),
            Err(e) => {
                send(RecordUpdate::TransportFailed(e.to_string()));
                return;
            }
        }
    }
}
