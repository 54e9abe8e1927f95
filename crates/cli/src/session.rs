//! Session archive bootstrap for the run command.

use anyhow::{bail, Context, Result};
use coscientist_model::{ResearchGoal, SessionArchive, SessionState};

/// Loads the session at `archive`, or creates one from `goal`.
///
/// An existing session keeps its goal: passing a new one is rejected rather
/// than silently replacing the research direction mid-session.
pub async fn load_or_create(
    archive: &SessionArchive,
    goal: Option<ResearchGoal>,
) -> Result<SessionState> {
    if archive.exists().await {
        if goal.is_some() {
            bail!(
                "session {} already holds a goal; pick a new --session path to start over",
                archive.path().display()
            );
        }
        archive
            .load()
            .await
            .with_context(|| format!("load session {}", archive.path().display()))
    } else {
        match goal {
            Some(goal) => Ok(SessionState::new(goal)),
            None => bail!(
                "no session at {}; a first run needs --goal",
                archive.path().display()
            ),
        }
    }
}
