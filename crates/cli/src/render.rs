//! Plain-text rendering of cycle reports and session overviews.

use coscientist_engine::{CycleReport, ResearchOverview, StagePayload, StageReport};
use coscientist_model::ReviewGrade;

pub fn cycle_summary(report: &CycleReport) -> String {
    let mut out = format!("Cycle {}\n", report.iteration);
    for stage in &report.stages {
        out.push_str(&stage_line(stage));
        out.push('\n');
    }
    out
}

pub fn stage_line(report: &StageReport) -> String {
    format!(
        "  {:<18} {:>5} ms  {}",
        report.stage.to_string(),
        report.duration_ms,
        outcome(report)
    )
}

fn outcome(report: &StageReport) -> String {
    if let Some(error) = &report.error {
        return format!("degraded: {error}");
    }
    match &report.payload {
        StagePayload::Empty => "done".to_string(),
        StagePayload::Hypotheses { hypotheses } => format!("{} hypotheses", hypotheses.len()),
        StagePayload::Tournament { matches, standings } => {
            let leader = standings
                .entries
                .first()
                .map_or_else(|| "nobody".to_string(), |entry| entry.id.to_string());
            format!("{} decided matches, {leader} in front", matches.len())
        }
        StagePayload::Proximity { view, .. } => format!(
            "{} nodes, {} edges above threshold",
            view.nodes.len(),
            view.edges.len()
        ),
        StagePayload::MetaReview {
            critique,
            suggested_next_steps,
        } => format!(
            "{} critique points, {} next steps",
            critique.len(),
            suggested_next_steps.len()
        ),
    }
}

pub fn overview_text(overview: &ResearchOverview) -> String {
    let mut out = format!("Research overview after iteration {}\n", overview.iteration);
    if overview.top_hypotheses.is_empty() {
        out.push_str("  no active hypotheses\n");
    }
    for (position, entry) in overview.top_hypotheses.iter().enumerate() {
        out.push_str(&format!(
            "  {}. {} (Elo {:.0}, novelty {}, feasibility {}) {}\n",
            position + 1,
            entry.id,
            entry.elo_score,
            grade_label(entry.novelty),
            grade_label(entry.feasibility),
            entry.title
        ));
    }
    if !overview.latest_critique.is_empty() {
        out.push_str("Critique:\n");
        for line in &overview.latest_critique {
            out.push_str(&format!("  - {line}\n"));
        }
    }
    if !overview.suggested_next_steps.is_empty() {
        out.push_str("Suggested next steps:\n");
        for line in &overview.suggested_next_steps {
            out.push_str(&format!("  - {line}\n"));
        }
    }
    out
}

fn grade_label(grade: Option<ReviewGrade>) -> String {
    grade.map_or_else(|| "unreviewed".to_string(), |grade| grade.to_string())
}
