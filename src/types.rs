use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 1-based team identifier, assigned sequentially when the team count
/// grows and never reused, even if the count shrinks again
pub type TeamId = u32;

/// 1-based index of a scoring round
pub type RoundNumber = u32;

/// The complete mutable state of one quiz session.
///
/// `team_names` and `team_scores` only ever grow: lowering `num_teams`
/// hides teams from the setup form but keeps their stored entries, so
/// raising the count again brings them back untouched. The intended
/// (unenforced) invariant is `team_names.keys() == 1..=num_teams`.
///
/// `BTreeMap` keeps iteration in ascending team id, which is what makes
/// the summary's stable tie-break deterministic.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuizState {
    pub team_names: BTreeMap<TeamId, String>,
    pub team_scores: BTreeMap<TeamId, BTreeMap<RoundNumber, u32>>,
    pub num_teams: u32,
    pub num_rounds: u32,
}

impl Default for QuizState {
    fn default() -> Self {
        Self {
            team_names: BTreeMap::new(),
            team_scores: BTreeMap::new(),
            num_teams: 1,
            num_rounds: 5,
        }
    }
}

impl QuizState {
    /// Display name for a team, falling back to the placeholder the
    /// setup form shows for teams that were never renamed.
    pub fn team_name(&self, id: TeamId) -> String {
        self.team_names
            .get(&id)
            .cloned()
            .unwrap_or_else(|| format!("Team {}", id))
    }
}

/// One leaderboard row: a team and its summed score across all rounds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Standing {
    pub team_id: TeamId,
    pub name: String,
    pub total: u64,
}

/// An uploaded music-round file. The frontend streams it from
/// `/tracks/{filename}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Track {
    pub filename: String,
}
