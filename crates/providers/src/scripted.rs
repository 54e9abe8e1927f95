use crate::error::{ProviderError, Result};
use crate::traits::{Contender, PairwiseJudge, TextGenerator, Verdict};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

enum ScriptedReply {
    Text(String),
    Failure(ProviderError),
}

/// Generator that replays a fixed queue of responses.
///
/// Drives offline runs and the engine tests. A call past the end of the
/// queue fails like a flaky backend would. Observed prompts are kept so
/// tests can assert what was asked.
#[derive(Default)]
pub struct ScriptedGenerator {
    replies: Mutex<VecDeque<ScriptedReply>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let replies = responses
            .into_iter()
            .map(|text| ScriptedReply::Text(text.into()))
            .collect();
        Self {
            replies: Mutex::new(replies),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn push_response(&self, text: impl Into<String>) {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(ScriptedReply::Text(text.into()));
    }

    pub fn push_failure(&self, error: ProviderError) {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(ScriptedReply::Failure(error));
    }

    /// Prompts seen so far, in call order.
    #[must_use]
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str, _temperature: f64) -> Result<String> {
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(prompt.to_string());
        let reply = self
            .replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        match reply {
            Some(ScriptedReply::Text(text)) => Ok(text),
            Some(ScriptedReply::Failure(error)) => Err(error),
            None => Err(ProviderError::Transient(
                "scripted generator ran out of responses".to_string(),
            )),
        }
    }
}

/// Judge that replays a fixed queue of verdicts.
#[derive(Default)]
pub struct ScriptedJudge {
    verdicts: Mutex<VecDeque<Verdict>>,
}

impl ScriptedJudge {
    pub fn new<I>(verdicts: I) -> Self
    where
        I: IntoIterator<Item = Verdict>,
    {
        Self {
            verdicts: Mutex::new(verdicts.into_iter().collect()),
        }
    }
}

#[async_trait]
impl PairwiseJudge for ScriptedJudge {
    async fn judge(
        &self,
        _goal: &str,
        _first: Contender<'_>,
        _second: Contender<'_>,
    ) -> Result<Verdict> {
        let verdict = self
            .verdicts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        verdict.ok_or_else(|| {
            ProviderError::Transient("scripted judge ran out of verdicts".to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripted_generator_replays_in_order_then_fails() {
        let generator = ScriptedGenerator::new(["first", "second"]);

        assert_eq!(generator.generate("a", 0.7).await.expect("first"), "first");
        assert_eq!(generator.generate("b", 0.7).await.expect("second"), "second");
        assert!(generator.generate("c", 0.7).await.is_err());
        assert_eq!(generator.prompts(), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn scripted_failure_is_returned_verbatim() {
        let generator = ScriptedGenerator::default();
        generator.push_failure(ProviderError::Config("no key".to_string()));

        let err = generator.generate("p", 0.5).await.expect_err("failure");
        assert_eq!(err, ProviderError::Config("no key".to_string()));
    }
}
