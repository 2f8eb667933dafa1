//! Snapshot persistence for quiz state.
//!
//! The whole state is serialized as one JSON document and rewritten
//! after every mutation (last write wins, no partial updates). Loading
//! is lenient — a missing, unreadable, or invalid snapshot means the
//! session starts fresh — while the HTTP import path validates and
//! refuses bad snapshots instead.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{QuizError, QuizResult};
use crate::types::QuizState;

/// Schema version for snapshot format compatibility
pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

/// The on-disk form of [`QuizState`]: the state plus a version and a
/// timestamp, so old backups stay recognizable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// Schema version for forward compatibility
    pub schema_version: u32,
    /// Snapshot timestamp (ISO8601)
    pub saved_at: String,
    /// The quiz state itself
    pub quiz: QuizState,
}

impl StateSnapshot {
    /// Wrap the given state with the current schema version and
    /// timestamp.
    pub fn new(quiz: QuizState) -> Self {
        Self {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            saved_at: chrono::Utc::now().to_rfc3339(),
            quiz,
        }
    }

    /// Validate a snapshot before importing it.
    pub fn validate(&self) -> QuizResult<()> {
        if self.schema_version > SNAPSHOT_SCHEMA_VERSION {
            return Err(QuizError::BadSnapshot(format!(
                "schema version {} is newer than supported version {}",
                self.schema_version, SNAPSHOT_SCHEMA_VERSION
            )));
        }
        if self.quiz.num_teams < 1 {
            return Err(QuizError::BadSnapshot(
                "num_teams must be at least 1".into(),
            ));
        }
        if self.quiz.num_rounds < 1 {
            return Err(QuizError::BadSnapshot(
                "num_rounds must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Load the persisted state. A missing snapshot is a first run; an
/// unreadable or invalid one is logged and replaced by the defaults
/// rather than refusing to start.
pub async fn load(path: &Path) -> QuizState {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!("no snapshot at {}, starting fresh", path.display());
            return QuizState::default();
        }
        Err(e) => {
            tracing::warn!(
                "could not read snapshot {}: {}, starting fresh",
                path.display(),
                e
            );
            return QuizState::default();
        }
    };

    let snapshot: StateSnapshot = match serde_json::from_slice(&bytes) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            tracing::warn!(
                "snapshot {} did not parse: {}, starting fresh",
                path.display(),
                e
            );
            return QuizState::default();
        }
    };

    if let Err(e) = snapshot.validate() {
        tracing::warn!("{}, starting fresh", e);
        return QuizState::default();
    }

    tracing::info!(
        "loaded snapshot from {} (saved at {})",
        path.display(),
        snapshot.saved_at
    );
    snapshot.quiz
}

/// Overwrite the snapshot file with the given state.
pub async fn save(path: &Path, quiz: &QuizState) -> QuizResult<()> {
    let snapshot = StateSnapshot::new(quiz.clone());
    let json = serde_json::to_string_pretty(&snapshot)?;
    tokio::fs::write(path, json).await?;
    Ok(())
}
