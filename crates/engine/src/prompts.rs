//! Prompt construction for the four text-producing stages.
//!
//! Every prompt ends by pinning the exact JSON shape the stage parser
//! expects, since the parsers are strict about structure even though they
//! tolerate surrounding prose.

use coscientist_model::{Hypothesis, MetaReviewRecord, PopulationStore, ResearchGoal, ReviewGrade};
use coscientist_ranking::ranked;

pub(crate) fn generation(goal: &ResearchGoal, latest_review: Option<&MetaReviewRecord>) -> String {
    let mut prompt = String::from("You are a research scientist proposing new hypotheses.\n\n");
    prompt.push_str(&format!("Research goal: {}\n", goal.description));
    if !goal.constraints.is_empty() {
        prompt.push_str("\nConstraints:\n");
        for (name, value) in &goal.constraints {
            prompt.push_str(&format!("- {name}: {value}\n"));
        }
    }
    if !goal.literature_context.is_empty() {
        prompt.push_str("\nRelevant literature:\n");
        for paper in &goal.literature_context {
            prompt.push_str(&format!(
                "- arXiv:{} {}: {}\n",
                paper.identifier, paper.title, paper.summary
            ));
        }
    }
    if let Some(review) = latest_review {
        if !review.critique.is_empty() {
            prompt.push_str("\nCritique from the previous iteration:\n");
            for line in &review.critique {
                prompt.push_str(&format!("- {line}\n"));
            }
        }
    }
    prompt.push_str(&format!(
        "\nPropose {} distinct hypotheses addressing the goal. Respond with a \
         JSON array where each element is an object with \"title\" and \
         \"text\" fields. Respond with JSON only.\n",
        goal.num_hypotheses
    ));
    prompt
}

pub(crate) fn reflection(goal: &ResearchGoal, hypothesis: &Hypothesis) -> String {
    format!(
        "You are a scientific reviewer.\n\n\
         Research goal: {}\n\n\
         Hypothesis {} ({})\n{}\n\n\
         Review this hypothesis for novelty and feasibility with respect to \
         the goal. Respond with a JSON object with the keys \
         \"novelty_review\" (HIGH, MEDIUM or LOW), \"feasibility_review\" \
         (HIGH, MEDIUM or LOW), \"comment\" (a short assessment) and \
         \"references\" (an array of arXiv identifiers you relied on). \
         Respond with JSON only.\n",
        goal.description, hypothesis.id, hypothesis.title, hypothesis.text
    )
}

pub(crate) fn evolution(goal: &ResearchGoal, parents: &[&Hypothesis]) -> String {
    let mut prompt =
        String::from("You are a research scientist refining a pool of hypotheses.\n\n");
    prompt.push_str(&format!(
        "Research goal: {}\n\nStrongest hypotheses so far:\n",
        goal.description
    ));
    for (index, parent) in parents.iter().enumerate() {
        prompt.push_str(&format!(
            "{}. {} (Elo {:.0})\n{}\n",
            index + 1,
            parent.title,
            parent.elo_score,
            parent.text
        ));
    }
    prompt.push_str(&format!(
        "\nCombine and improve on these ideas to produce {} new hypotheses. \
         Respond with a JSON array where each element is an object with \
         \"title\" and \"text\" fields. Respond with JSON only.\n",
        goal.num_hypotheses
    ));
    prompt
}

pub(crate) fn meta_review(goal: &ResearchGoal, store: &PopulationStore) -> String {
    let mut prompt =
        String::from("You are the lead scientist reviewing one full iteration.\n\n");
    prompt.push_str(&format!(
        "Research goal: {}\n\nCurrent standings:\n",
        goal.description
    ));
    let actives = store.active();
    for hypothesis in ranked(&actives) {
        prompt.push_str(&format!(
            "- {} (Elo {:.0}, novelty {}, feasibility {}): {}\n",
            hypothesis.id,
            hypothesis.elo_score,
            grade_label(hypothesis.novelty),
            grade_label(hypothesis.feasibility),
            hypothesis.title
        ));
        for comment in &hypothesis.review_comments {
            prompt.push_str(&format!("  review: {comment}\n"));
        }
    }
    prompt.push_str(
        "\nCritique the current population and suggest what the next iteration \
         should explore. Respond with a JSON object with the keys \"critique\" \
         (an array of observations) and \"suggested_next_steps\" (an array of \
         directions). Respond with JSON only.\n",
    );
    prompt
}

fn grade_label(grade: Option<ReviewGrade>) -> String {
    grade.map_or_else(|| "unreviewed".to_string(), |g| g.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use coscientist_model::PaperSummary;

    fn goal_with_context() -> ResearchGoal {
        let mut goal = ResearchGoal::new("Why do coral reefs bleach unevenly?");
        goal.constraints
            .insert("focus".to_string(), "measurable drivers".to_string());
        goal.literature_context = vec![PaperSummary {
            identifier: "2301.12345".to_string(),
            title: "Thermal microrefugia".to_string(),
            summary: "Fine-scale temperature variation shields some corals.".to_string(),
        }];
        goal
    }

    #[test]
    fn generation_prompt_carries_goal_constraints_literature_and_critique() {
        let goal = goal_with_context();
        let review = MetaReviewRecord {
            critique: vec!["Too many untestable claims".to_string()],
            suggested_next_steps: vec![],
            iteration: 1,
        };

        let prompt = generation(&goal, Some(&review));

        assert!(prompt.contains("Why do coral reefs bleach unevenly?"));
        assert!(prompt.contains("- focus: measurable drivers"));
        assert!(prompt.contains("arXiv:2301.12345 Thermal microrefugia"));
        assert!(prompt.contains("- Too many untestable claims"));
        assert!(prompt.contains("Propose 3 distinct hypotheses"));
    }

    #[test]
    fn generation_prompt_without_history_skips_the_critique_block() {
        let prompt = generation(&ResearchGoal::new("goal"), None);
        assert!(!prompt.contains("Critique from the previous iteration"));
    }

    #[test]
    fn reflection_prompt_names_the_hypothesis_and_the_expected_keys() {
        let goal = ResearchGoal::new("goal");
        let hypothesis = Hypothesis::new("H1".into(), "Microrefugia", "Some corals sit in cool spots.");

        let prompt = reflection(&goal, &hypothesis);

        assert!(prompt.contains("Hypothesis H1 (Microrefugia)"));
        assert!(prompt.contains("Some corals sit in cool spots."));
        assert!(prompt.contains("\"novelty_review\""));
        assert!(prompt.contains("\"feasibility_review\""));
    }

    #[test]
    fn evolution_prompt_lists_every_parent() {
        let goal = ResearchGoal::new("goal");
        let first = Hypothesis::new("H1".into(), "First idea", "first text");
        let second = Hypothesis::new("H2".into(), "Second idea", "second text");

        let prompt = evolution(&goal, &[&first, &second]);

        assert!(prompt.contains("1. First idea"));
        assert!(prompt.contains("2. Second idea"));
        assert!(prompt.contains("first text"));
        assert!(prompt.contains("produce 3 new hypotheses"));
    }

    #[test]
    fn meta_review_prompt_summarizes_standings_and_reviews() {
        let goal = ResearchGoal::new("goal");
        let mut store = PopulationStore::new();
        let mut hypothesis = Hypothesis::new("H1".into(), "Microrefugia", "text");
        hypothesis.novelty = Some(ReviewGrade::High);
        hypothesis.add_review_comment("Plausible and testable");
        store.insert_new(hypothesis).expect("insert");

        let prompt = meta_review(&goal, &store);

        assert!(prompt.contains("- H1 (Elo 1200, novelty HIGH, feasibility unreviewed)"));
        assert!(prompt.contains("  review: Plausible and testable"));
        assert!(prompt.contains("\"suggested_next_steps\""));
    }
}
