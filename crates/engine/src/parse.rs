//! Tolerant decoding of collaborator replies.
//!
//! Models wrap JSON in prose and Markdown fences. Decoding strips the fences
//! and then tries every plausible start position for the expected value, so
//! a reply with chatter before and after the JSON still parses.

use coscientist_providers::ProviderError;
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// One hypothesis candidate as the generator writes it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct HypothesisDraft {
    pub title: String,
    pub text: String,
}

/// Review fields as the reflector writes them. Everything is optional so a
/// sparse review still applies.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub(crate) struct ReflectionNotes {
    #[serde(default)]
    pub novelty_review: Option<String>,
    #[serde(default)]
    pub feasibility_review: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub references: Vec<String>,
}

/// Meta-review fields as the reviewer writes them.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub(crate) struct MetaReviewNotes {
    #[serde(default)]
    pub critique: Vec<String>,
    #[serde(default)]
    pub suggested_next_steps: Vec<String>,
}

/// Decodes the first JSON value of type `T` found in `raw`.
pub(crate) fn json_payload<T: DeserializeOwned>(raw: &str) -> Result<T, ProviderError> {
    let body = strip_fences(raw);
    let mut last_error: Option<serde_json::Error> = None;
    for (index, ch) in body.char_indices() {
        if ch != '{' && ch != '[' {
            continue;
        }
        let mut stream = serde_json::Deserializer::from_str(&body[index..]).into_iter::<T>();
        match stream.next() {
            Some(Ok(value)) => return Ok(value),
            Some(Err(err)) => last_error = Some(err),
            None => {}
        }
    }
    Err(ProviderError::Malformed(match last_error {
        Some(err) => format!("no usable JSON value in response: {err}"),
        None => "no JSON value in response".to_string(),
    }))
}

fn strip_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(open) = trimmed.find("```") else {
        return trimmed;
    };
    let after = &trimmed[open + 3..];
    // Drop the info string on the opening fence line.
    let body = match after.find('\n') {
        Some(newline) => &after[newline + 1..],
        None => after,
    };
    match body.find("```") {
        Some(close) => &body[..close],
        None => body,
    }
}
