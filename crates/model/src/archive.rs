use crate::error::Result;
use crate::goal::ResearchGoal;
use crate::store::PopulationStore;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Everything one session needs to resume: the goal and the population.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub goal: ResearchGoal,
    pub store: PopulationStore,
}

impl SessionState {
    #[must_use]
    pub fn new(goal: ResearchGoal) -> Self {
        Self {
            goal,
            store: PopulationStore::new(),
        }
    }
}

/// JSON file holding a [`SessionState`]. Writes go through a temp file and a
/// rename so a crash never leaves a half-written archive behind.
pub struct SessionArchive {
    path: PathBuf,
}

impl SessionArchive {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn exists(&self) -> bool {
        tokio::fs::try_exists(&self.path).await.unwrap_or(false)
    }

    pub async fn save(&self, state: &SessionState) -> Result<()> {
        log::debug!("Saving session to {:?}", self.path);
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let data = serde_json::to_string_pretty(state)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, data).await?;
        if let Err(err) = tokio::fs::rename(&tmp, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(err.into());
        }
        log::info!(
            "Session saved to {:?} ({} hypotheses, iteration {})",
            self.path,
            state.store.len(),
            state.store.iteration()
        );
        Ok(())
    }

    pub async fn load(&self) -> Result<SessionState> {
        log::info!("Loading session from {:?}", self.path);
        let data = tokio::fs::read_to_string(&self.path).await?;
        let mut state: SessionState = serde_json::from_str(&data)?;
        state.store.rebuild_index();
        log::info!("Loaded session with {} hypotheses", state.store.len());
        Ok(state)
    }
}
