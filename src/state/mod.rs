mod scores;
mod store;
mod teams;

pub use store::{StateSnapshot, SNAPSHOT_SCHEMA_VERSION};

use tokio::sync::RwLock;

use crate::config::QuizConfig;
use crate::error::QuizResult;
use crate::media::TrackStore;
use crate::types::QuizState;

/// Shared application state: one quiz session plus its track store.
///
/// Wrapped in an `Arc` by callers; the single `RwLock` matches the
/// single-organizer session model (handlers take the write lock to
/// mutate, the read lock to render).
pub struct AppState {
    pub quiz: RwLock<QuizState>,
    pub tracks: TrackStore,
    pub config: QuizConfig,
}

impl AppState {
    /// Build state with the given config without touching the
    /// filesystem. Used directly by tests; the server goes through
    /// [`AppState::init`].
    pub fn new(config: QuizConfig) -> Self {
        Self {
            quiz: RwLock::new(QuizState::default()),
            tracks: TrackStore::new(config.music_dir.clone()),
            config,
        }
    }

    /// Prepare the storage directories and load the persisted snapshot,
    /// if any.
    pub async fn init(config: QuizConfig) -> QuizResult<Self> {
        let state = Self::new(config);
        state.tracks.init().await?;
        if let Some(dir) = state.config.data_file.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }
        *state.quiz.write().await = store::load(&state.config.data_file).await;
        Ok(state)
    }

    /// Current quiz state, cloned for rendering or persistence.
    pub async fn quiz(&self) -> QuizState {
        self.quiz.read().await.clone()
    }

    /// Wipe the quiz back to its defaults and delete every uploaded
    /// track.
    pub async fn reset(&self) -> QuizResult<QuizState> {
        *self.quiz.write().await = QuizState::default();
        self.tracks.clear().await?;
        Ok(self.quiz().await)
    }

    /// Overwrite the snapshot file with the current state.
    pub async fn persist(&self) -> QuizResult<()> {
        let quiz = self.quiz().await;
        store::save(&self.config.data_file, &quiz).await
    }

    /// Versioned snapshot of the full state, for export/backup.
    pub async fn export_snapshot(&self) -> StateSnapshot {
        StateSnapshot::new(self.quiz().await)
    }

    /// Replace the live state from an imported snapshot. Unlike the
    /// lenient startup load, imports are validated and refused when
    /// invalid.
    pub async fn import_snapshot(&self, snapshot: StateSnapshot) -> QuizResult<QuizState> {
        snapshot.validate()?;
        *self.quiz.write().await = snapshot.quiz;
        Ok(self.quiz().await)
    }
}
