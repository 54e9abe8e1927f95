use crate::error::{ModelError, Result};
use crate::reference::PaperSummary;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default chat-completions route for collaborator calls.
pub const DEFAULT_LLM_MODEL: &str = "google/gemini-flash-1.5";

/// A research goal plus the tunables that shape one evolution session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchGoal {
    pub description: String,
    pub constraints: BTreeMap<String, String>,
    pub llm_model: String,
    pub num_hypotheses: usize,
    pub generation_temperature: f64,
    pub reflection_temperature: f64,
    pub elo_k_factor: f64,
    pub top_k_hypotheses: usize,
    pub literature_context: Vec<PaperSummary>,
}

impl ResearchGoal {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            constraints: BTreeMap::new(),
            llm_model: DEFAULT_LLM_MODEL.to_string(),
            num_hypotheses: 3,
            generation_temperature: 0.7,
            reflection_temperature: 0.5,
            elo_k_factor: 32.0,
            top_k_hypotheses: 2,
            literature_context: Vec::new(),
        }
    }

    /// Rejects goals no cycle could run against. Checked before any stage starts.
    pub fn validate(&self) -> Result<()> {
        if self.description.trim().is_empty() {
            return Err(ModelError::InvalidGoal(
                "description must not be empty".to_string(),
            ));
        }
        if self.num_hypotheses < 1 {
            return Err(ModelError::InvalidGoal(format!(
                "num_hypotheses must be at least 1, got {}",
                self.num_hypotheses
            )));
        }
        for (name, value) in [
            ("generation_temperature", self.generation_temperature),
            ("reflection_temperature", self.reflection_temperature),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(ModelError::InvalidGoal(format!(
                    "{name} must be within (0.0, 1.0], got {value}"
                )));
            }
        }
        if self.elo_k_factor < 1.0 {
            return Err(ModelError::InvalidGoal(format!(
                "elo_k_factor must be at least 1, got {}",
                self.elo_k_factor
            )));
        }
        if self.top_k_hypotheses < 2 {
            return Err(ModelError::InvalidGoal(format!(
                "top_k_hypotheses must be at least 2, got {}",
                self.top_k_hypotheses
            )));
        }
        Ok(())
    }
}
