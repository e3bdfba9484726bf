//! High score leaderboard
//!
//! Keeps the best runs ranked by score, earlier runs first on ties.
//! Storage lives in `persistence`; this type is pure data.

use serde::{Deserialize, Serialize};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// How many entries the game-over screen lists
pub const SHOWN_HIGH_SCORES: usize = 5;

/// Longest name a player can record
pub const MAX_NAME_CHARS: usize = 12;

/// Recorded when the player leaves the name blank
pub const ANONYMOUS: &str = "anon";

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub name: String,
    pub score: u64,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

impl HighScoreEntry {
    /// True if `self` ranks strictly above `other`
    fn outranks(&self, other: &HighScoreEntry) -> bool {
        self.score > other.score || (self.score == other.score && self.timestamp < other.timestamp)
    }
}

/// High score leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

/// Trim, cap at 12 characters, and fall back to "anon"
pub fn sanitize_name(name: &str) -> String {
    let name: String = name.trim().chars().take(MAX_NAME_CHARS).collect();
    if name.is_empty() {
        ANONYMOUS.to_string()
    } else {
        name
    }
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    fn insertion_index(&self, candidate: &HighScoreEntry) -> usize {
        self.entries
            .iter()
            .position(|e| candidate.outranks(e))
            .unwrap_or(self.entries.len())
    }

    /// Check if a score would make the board right now
    pub fn qualifies(&self, score: u64) -> bool {
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // A tie with the last entry loses to the earlier run
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        // Ties rank below existing entries, since they are older
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add a new score to the leaderboard.
    ///
    /// Returns the rank achieved (1-indexed) or None if it fell off the end.
    pub fn add_score(&mut self, name: &str, score: u64, timestamp: f64) -> Option<usize> {
        let entry = HighScoreEntry {
            name: sanitize_name(name),
            score,
            timestamp,
        };

        let pos = self.insertion_index(&entry);
        if pos >= MAX_HIGH_SCORES {
            return None;
        }
        self.entries.insert(pos, entry);
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(pos + 1)
    }

    /// Restore ranking order and size after loading foreign data
    pub fn normalize(&mut self) {
        self.entries.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| a.timestamp.total_cmp(&b.timestamp))
        });
        self.entries.truncate(MAX_HIGH_SCORES);
    }

    /// The best `n` entries
    pub fn top(&self, n: usize) -> &[HighScoreEntry] {
        &self.entries[..n.min(self.entries.len())]
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }
}
