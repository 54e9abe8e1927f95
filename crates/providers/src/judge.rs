use crate::error::Result;
use crate::traits::{Contender, PairwiseJudge, TextGenerator, Verdict};
use async_trait::async_trait;
use std::sync::Arc;

/// Judge that delegates the comparison to a text collaborator.
///
/// The prompt asks for a bare `1` or `2`. Anything else counts as no
/// decision rather than an error, so a rambling answer cannot abort a
/// tournament.
pub struct LlmJudge {
    generator: Arc<dyn TextGenerator>,
    temperature: f64,
}

impl LlmJudge {
    pub fn new(generator: Arc<dyn TextGenerator>, temperature: f64) -> Self {
        Self {
            generator,
            temperature,
        }
    }

    fn comparison_prompt(goal: &str, first: Contender<'_>, second: Contender<'_>) -> String {
        format!(
            "You are ranking research hypotheses for the goal below.\n\
             Goal: {goal}\n\n\
             Hypothesis 1: {}\n{}\n\n\
             Hypothesis 2: {}\n{}\n\n\
             Which hypothesis is more promising overall, weighing novelty and \
             feasibility? Answer with the single digit 1 or 2 and nothing else.",
            first.title, first.text, second.title, second.text
        )
    }
}

fn parse_choice(raw: &str) -> Option<u8> {
    match raw.trim().trim_end_matches(['.', '!']) {
        "1" => Some(1),
        "2" => Some(2),
        _ => None,
    }
}

#[async_trait]
impl PairwiseJudge for LlmJudge {
    async fn judge(
        &self,
        goal: &str,
        first: Contender<'_>,
        second: Contender<'_>,
    ) -> Result<Verdict> {
        let prompt = Self::comparison_prompt(goal, first, second);
        let answer = self.generator.generate(&prompt, self.temperature).await?;
        let verdict = match parse_choice(&answer) {
            Some(1) => Verdict::Winner(first.id.clone()),
            Some(2) => Verdict::Winner(second.id.clone()),
            _ => {
                log::debug!(
                    "Judge answer '{}' names no winner for {} vs {}",
                    answer.trim(),
                    first.id,
                    second.id
                );
                Verdict::NoDecision
            }
        };
        Ok(verdict)
    }
}
