use crate::error::Result;
use async_trait::async_trait;
use coscientist_model::{Hypothesis, HypothesisId, MatchRecord, MetaReviewRecord, ReferenceLink};
use std::sync::{Mutex, PoisonError};

/// External persistence mirror for session events.
///
/// The engine calls these right after each stage commits, once per record.
/// Implementations must tolerate repeated `link_reference` calls for the
/// same pair.
#[async_trait]
pub trait SessionSink: Send + Sync {
    async fn upsert_hypothesis(&self, hypothesis: &Hypothesis) -> Result<()>;
    async fn append_match(&self, record: &MatchRecord) -> Result<()>;
    async fn append_meta_review(&self, record: &MetaReviewRecord) -> Result<()>;
    async fn link_reference(&self, link: &ReferenceLink) -> Result<()>;
}

/// Sink that drops everything; the default when no mirror is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

#[async_trait]
impl SessionSink for NullSink {
    async fn upsert_hypothesis(&self, _hypothesis: &Hypothesis) -> Result<()> {
        Ok(())
    }

    async fn append_match(&self, _record: &MatchRecord) -> Result<()> {
        Ok(())
    }

    async fn append_meta_review(&self, _record: &MetaReviewRecord) -> Result<()> {
        Ok(())
    }

    async fn link_reference(&self, _link: &ReferenceLink) -> Result<()> {
        Ok(())
    }
}

/// One observed persistence call.
#[derive(Debug, Clone, PartialEq)]
pub enum SinkEvent {
    Hypothesis(HypothesisId),
    Match {
        first: HypothesisId,
        second: HypothesisId,
    },
    MetaReview {
        iteration: u32,
    },
    Reference(ReferenceLink),
}

/// Sink that remembers every call, letting tests pin the persistence
/// contract: what was flushed, and in which order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<SinkEvent>>,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> Vec<SinkEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn push(&self, event: SinkEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

#[async_trait]
impl SessionSink for RecordingSink {
    async fn upsert_hypothesis(&self, hypothesis: &Hypothesis) -> Result<()> {
        self.push(SinkEvent::Hypothesis(hypothesis.id.clone()));
        Ok(())
    }

    async fn append_match(&self, record: &MatchRecord) -> Result<()> {
        self.push(SinkEvent::Match {
            first: record.first.clone(),
            second: record.second.clone(),
        });
        Ok(())
    }

    async fn append_meta_review(&self, record: &MetaReviewRecord) -> Result<()> {
        self.push(SinkEvent::MetaReview {
            iteration: record.iteration,
        });
        Ok(())
    }

    async fn link_reference(&self, link: &ReferenceLink) -> Result<()> {
        self.push(SinkEvent::Reference(link.clone()));
        Ok(())
    }
}
