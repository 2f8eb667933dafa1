//! Storage for uploaded music-round tracks.
//!
//! Tracks are plain files in one flat directory. Uploads are written
//! verbatim and silently overwrite same-named files; playback order is
//! derived from the first number embedded in each filename, so
//! organizers can name files `track1.mp3`, `track2.mp3`, … and get them
//! back in round order.

use std::path::{Path, PathBuf};

use crate::error::{QuizError, QuizResult};
use crate::types::Track;

/// Extensions the upload boundary accepts
pub const ALLOWED_EXTENSIONS: &[&str] = &["mp3", "wav"];

/// Sort key for a track filename: the first contiguous digit run,
/// parsed as `u64`. Filenames without a usable number key to `u64::MAX`
/// so they sort after every numbered track.
fn numeric_sort_key(filename: &str) -> u64 {
    let digits: String = filename
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(u64::MAX)
}

/// Directory-backed store for uploaded tracks
#[derive(Debug, Clone)]
pub struct TrackStore {
    dir: PathBuf,
}

impl TrackStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Directory the tracks live in; also served at `/tracks` for
    /// inline playback.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the storage directory if it does not exist yet.
    pub async fn init(&self) -> QuizResult<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    /// Reduce a client-supplied filename to the name a track is stored
    /// under: the final path component, which must carry an allowed
    /// extension. Browsers send bare names; anything path-shaped is cut
    /// down so an upload can never write outside the music directory.
    pub fn stored_name(raw: &str) -> QuizResult<String> {
        let name = Path::new(raw)
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_owned)
            .ok_or(QuizError::EmptyFilename)?;

        let ext = Path::new(&name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
            return Err(QuizError::UnsupportedExtension(ext));
        }

        Ok(name)
    }

    /// Write one uploaded blob, overwriting any same-named track
    /// (no dedup, no collision policy). Returns the stored filename.
    pub async fn save(&self, raw_name: &str, bytes: &[u8]) -> QuizResult<String> {
        let name = Self::stored_name(raw_name)?;
        tokio::fs::write(self.dir.join(&name), bytes).await?;
        tracing::debug!("stored track {} ({} bytes)", name, bytes.len());
        Ok(name)
    }

    /// All stored tracks in playback order: ascending by embedded
    /// number, un-numbered files after them in directory order
    /// (the sort is stable).
    pub async fn list(&self) -> QuizResult<Vec<Track>> {
        let mut tracks = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            if let Ok(filename) = entry.file_name().into_string() {
                tracks.push(Track { filename });
            }
        }
        tracks.sort_by_key(|t| numeric_sort_key(&t.filename));
        Ok(tracks)
    }

    /// Delete every stored track. Part of the quiz reset action.
    pub async fn clear(&self) -> QuizResult<()> {
        let mut entries = tokio::fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_file() {
                tokio::fs::remove_file(entry.path()).await?;
            }
        }
        tracing::info!("cleared music directory {}", self.dir.display());
        Ok(())
    }
}
