//! Provider assembly for the two run modes.
//!
//! Online runs talk to OpenRouter for both text and judging. Offline runs
//! replay a scripted demo session sized to the requested cycle count, so a
//! full run exercises every stage without a network or a key.

use coscientist_engine::CycleEngine;
use coscientist_model::{PaperSummary, ResearchGoal};
use coscientist_providers::{
    HashEmbedder, LlmJudge, OpenRouterClient, Result, ScriptedGenerator, StaticResolver,
};
use serde_json::json;
use std::sync::Arc;

/// Engine backed by OpenRouter; fails when `OPENROUTER_API_KEY` is unset.
pub fn openrouter_engine(goal: &ResearchGoal) -> Result<CycleEngine> {
    let client = Arc::new(OpenRouterClient::from_env(goal.llm_model.clone())?);
    let judge = Arc::new(LlmJudge::new(client.clone(), goal.reflection_temperature));
    Ok(CycleEngine::new(
        client,
        judge,
        Arc::new(HashEmbedder::default()),
    ))
}

/// Engine that replays a scripted session covering exactly `cycles` cycles.
///
/// The judge always answers `1`, so the better-ranked contestant of every
/// pair wins and ratings spread out over the run.
pub fn offline_engine(goal: &ResearchGoal, cycles: u32) -> CycleEngine {
    let generator = Arc::new(ScriptedGenerator::new(demo_script(goal, cycles)));
    let verdicts = ScriptedGenerator::new(
        std::iter::repeat("1".to_string()).take(verdict_budget(goal, cycles)),
    );
    let judge = Arc::new(LlmJudge::new(
        Arc::new(verdicts),
        goal.reflection_temperature,
    ));
    CycleEngine::new(generator, judge, Arc::new(HashEmbedder::default()))
        .with_resolver(Arc::new(StaticResolver::new(demo_catalog())))
}

/// Papers the scripted drafts cite, resolvable without a network.
fn demo_catalog() -> Vec<PaperSummary> {
    vec![
        PaperSummary {
            identifier: "2303.11366".to_string(),
            title: "Reflexion: Language Agents with Verbal Reinforcement Learning".to_string(),
            summary: "Agents that improve by reflecting on feedback in natural language."
                .to_string(),
        },
        PaperSummary {
            identifier: "2309.03409".to_string(),
            title: "Large Language Models as Optimizers".to_string(),
            summary: "Using LLMs to propose and refine candidate solutions iteratively."
                .to_string(),
        },
        PaperSummary {
            identifier: "2310.12931".to_string(),
            title: "Eureka: Human-Level Reward Design via Coding Large Language Models"
                .to_string(),
            summary: "Evolutionary search over LLM-written programs guided by scores."
                .to_string(),
        },
    ]
}

/// Replies for every generator call one cycle makes, times `cycles`.
///
/// Call order per cycle: one generation batch, one review per draft, one
/// evolution batch, one review for the offspring, one meta-review.
fn demo_script(goal: &ResearchGoal, cycles: u32) -> Vec<String> {
    let catalog = demo_catalog();
    // Two drafts minimum keeps the evolution stage supplied with parents.
    let drafts = goal.num_hypotheses.max(2);
    let grades = ["HIGH", "MEDIUM", "LOW"];

    let mut replies = Vec::new();
    for cycle in 1..=cycles {
        let batch: Vec<serde_json::Value> = (1..=drafts)
            .map(|slot| {
                let paper = &catalog[(cycle as usize + slot) % catalog.len()];
                json!({
                    "title": format!("Candidate {cycle}.{slot}"),
                    "text": format!(
                        "Direction {slot} for '{}', refined in cycle {cycle}. Builds on \
                         arXiv:{} ({}).",
                        goal.description, paper.identifier, paper.title
                    ),
                })
            })
            .collect();
        replies.push(json!(batch).to_string());

        for slot in 1..=drafts {
            let mut review = json!({
                "novelty_review": grades[slot % grades.len()],
                "feasibility_review": grades[(slot + 1) % grades.len()],
                "comment": format!("Scripted review of candidate {cycle}.{slot}."),
            });
            if slot == 1 {
                review["references"] =
                    json!([catalog[cycle as usize % catalog.len()].identifier]);
            }
            replies.push(review.to_string());
        }

        replies.push(
            json!([{
                "title": format!("Synthesis {cycle}"),
                "text": format!(
                    "Recombines the strongest candidates of cycle {cycle} into one testable \
                     direction for '{}'.",
                    goal.description
                ),
            }])
            .to_string(),
        );
        replies.push(
            json!({
                "novelty_review": "HIGH",
                "feasibility_review": "MEDIUM",
                "comment": format!("Scripted review of synthesis {cycle}."),
            })
            .to_string(),
        );
        replies.push(
            json!({
                "critique": [format!("Cycle {cycle} leans on a narrow evidence base.")],
                "suggested_next_steps": [
                    format!("Widen the literature pool before cycle {}.", cycle + 1)
                ],
            })
            .to_string(),
        );
    }
    replies
}

/// Upper bound on judge calls: two ranking stages per cycle, each judging at
/// most 66 round-robin pairs or one ladder pair per active hypothesis.
fn verdict_budget(goal: &ResearchGoal, cycles: u32) -> usize {
    let population = cycles as usize * (goal.num_hypotheses.max(2) + 1);
    2 * cycles as usize * population.max(66)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn script_length_matches_the_per_cycle_call_count() {
        let goal = ResearchGoal::new("demo");
        // 1 generation + 3 reviews + 1 evolution + 1 review + 1 meta-review.
        assert_eq!(demo_script(&goal, 1).len(), 7);
        assert_eq!(demo_script(&goal, 3).len(), 21);
    }

    #[test]
    fn single_hypothesis_goals_still_script_two_drafts() {
        let mut goal = ResearchGoal::new("demo");
        goal.num_hypotheses = 1;
        let script = demo_script(&goal, 1);
        let batch: Vec<serde_json::Value> =
            serde_json::from_str(&script[0]).expect("generation batch");
        assert_eq!(batch.len(), 2);
    }

    #[test]
    fn first_review_of_a_cycle_cites_the_catalog() {
        let goal = ResearchGoal::new("demo");
        let script = demo_script(&goal, 1);
        let review: serde_json::Value = serde_json::from_str(&script[1]).expect("review");
        let cited = review["references"][0].as_str().expect("identifier");
        assert!(demo_catalog().iter().any(|p| p.identifier == cited));
    }

    #[test]
    fn verdict_budget_covers_a_small_session() {
        let goal = ResearchGoal::new("demo");
        // One cycle of the default goal plays at most 6 + 10 pairs.
        assert!(verdict_budget(&goal, 1) >= 16);
    }
}
