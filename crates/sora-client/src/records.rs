use chrono::{DateTime, Utc};
use sora_proto::{GenerationStatus, ProgressEvent};
use std::collections::{HashMap, VecDeque};
use tracing::warn;
use uuid::Uuid;

pub type RecordId = Uuid;

/// Client-side state of one submission. Lives only in memory.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRecord {
    pub id: RecordId,
    pub prompt: String,
    pub status: GenerationStatus,
    pub progress: u8,
    pub message: Option<String>,
    pub video_url: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl GenerationRecord {
    fn new(prompt: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            prompt,
            status: GenerationStatus::Generating,
            progress: 0,
            message: None,
            video_url: None,
            timestamp: Utc::now(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Still generating after the update
    Updated,
    /// The update moved the record into a terminal state
    Finished,
    /// The record was already terminal; nothing changed
    IgnoredTerminal,
    UnknownRecord,
}

/// Records keyed by id, most recent first. Records are never removed.
#[derive(Debug, Default)]
pub struct RecordBook {
    records: HashMap<RecordId, GenerationRecord>,
    order: VecDeque<RecordId>,
}

impl RecordBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a `generating` record at 0% and put it in front.
    pub fn start(&mut self, prompt: impl Into<String>) -> RecordId {
        let record = GenerationRecord::new(prompt.into());
        let id = record.id;
        self.records.insert(id, record);
        self.order.push_front(id);
        id
    }

    pub fn apply(&mut self, id: &RecordId, event: &ProgressEvent) -> ApplyOutcome {
        let Some(record) = self.records.get_mut(id) else {
            warn!("Event for unknown record {}", id);
            return ApplyOutcome::UnknownRecord;
        };

        if record.is_terminal() {
            warn!(
                "Ignoring {} event for record {} already {}",
                event.status().as_str(),
                id,
                record.status.as_str()
            );
            return ApplyOutcome::IgnoredTerminal;
        }

        record.progress = event.progress();
        record.status = event.status();
        if let Some(message) = event.message() {
            record.message = Some(message.to_string());
        }
        if let Some(url) = event.video_url() {
            record.video_url = Some(url.to_string());
        }

        if record.is_terminal() {
            ApplyOutcome::Finished
        } else {
            ApplyOutcome::Updated
        }
    }

    /// Transport-level failure: no event to apply, just end the record.
    pub fn mark_failed(&mut self, id: &RecordId) -> ApplyOutcome {
        let Some(record) = self.records.get_mut(id) else {
            return ApplyOutcome::UnknownRecord;
        };
        if record.is_terminal() {
            return ApplyOutcome::IgnoredTerminal;
        }
        record.status = GenerationStatus::Failed;
        ApplyOutcome::Finished
    }

    pub fn get(&self, id: &RecordId) -> Option<&GenerationRecord> {
        self.records.get(id)
    }

    /// Most recent first.
    pub fn iter(&self) -> impl Iterator<Item = &GenerationRecord> {
        self.order.iter().filter_map(|id| self.records.get(id))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn in_flight(&self) -> usize {
        self.records
            .values()
            .filter(|r| r.status == GenerationStatus::Generating)
            .count()
    }

    pub fn is_generating(&self) -> bool {
        self.in_flight() > 0
    }
}
