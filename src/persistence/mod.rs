//! Leaderboard storage backends
//!
//! - Native: pretty-printed JSON file
//! - Web: LocalStorage under a versioned key
//! - Tests: in-memory
//!
//! Failures are reported to the caller and never reach the simulation.

use std::path::{Path, PathBuf};

#[cfg(target_arch = "wasm32")]
use crate::error::Error;
use crate::error::Result;
use crate::highscores::HighScores;

/// LocalStorage / file stem for the leaderboard
pub const LEADERBOARD_KEY: &str = "road_racer_leaderboard_v1";

/// Somewhere the leaderboard can be loaded from and saved to
pub trait LeaderboardStore {
    fn load(&self) -> Result<HighScores>;
    fn save(&mut self, scores: &HighScores) -> Result<()>;

    /// Load, record one run, save. Returns the rank achieved.
    fn record(&mut self, name: &str, score: u64, timestamp: f64) -> Result<Option<usize>> {
        let mut scores = self.load()?;
        let rank = scores.add_score(name, score, timestamp);
        if rank.is_some() {
            self.save(&scores)?;
        }
        Ok(rank)
    }
}

/// JSON file on disk. A missing file is an empty board.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LeaderboardStore for JsonFileStore {
    fn load(&self) -> Result<HighScores> {
        let json = match std::fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No leaderboard at {}, starting fresh", self.path.display());
                return Ok(HighScores::new());
            }
            Err(e) => return Err(e.into()),
        };
        let mut scores: HighScores = serde_json::from_str(&json)?;
        scores.normalize();
        log::info!("Loaded {} high scores", scores.entries.len());
        Ok(scores)
    }

    fn save(&mut self, scores: &HighScores) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        // Replace atomically via a sibling temp file
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_string_pretty(scores)?)?;
        std::fs::rename(&tmp, &self.path)?;
        log::info!("High scores saved ({} entries)", scores.entries.len());
        Ok(())
    }
}

/// Board held in memory only
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    scores: HighScores,
    /// Number of successful saves
    pub saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LeaderboardStore for MemoryStore {
    fn load(&self) -> Result<HighScores> {
        Ok(self.scores.clone())
    }

    fn save(&mut self, scores: &HighScores) -> Result<()> {
        self.scores = scores.clone();
        self.saves += 1;
        Ok(())
    }
}

/// Browser LocalStorage (WASM only)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Default)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    fn storage() -> Result<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| Error::Storage("LocalStorage is not available".into()))
    }
}

#[cfg(target_arch = "wasm32")]
impl LeaderboardStore for LocalStorageStore {
    fn load(&self) -> Result<HighScores> {
        let storage = Self::storage()?;
        match storage.get_item(LEADERBOARD_KEY) {
            Ok(Some(json)) => {
                let mut scores: HighScores = serde_json::from_str(&json)?;
                scores.normalize();
                log::info!("Loaded {} high scores", scores.entries.len());
                Ok(scores)
            }
            Ok(None) => Ok(HighScores::new()),
            Err(_) => Err(Error::Storage("LocalStorage read failed".into())),
        }
    }

    fn save(&mut self, scores: &HighScores) -> Result<()> {
        let json = serde_json::to_string(scores)?;
        Self::storage()?
            .set_item(LEADERBOARD_KEY, &json)
            .map_err(|_| Error::Storage("LocalStorage write failed".into()))?;
        log::info!("High scores saved ({} entries)", scores.entries.len());
        Ok(())
    }
}

/// Wall-clock time in Unix milliseconds, for leaderboard timestamps
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}
