use super::AppState;
use crate::error::{QuizError, QuizResult};
use crate::types::{QuizState, TeamId};

impl AppState {
    /// Set the team count, materializing an entry for every team the
    /// setup form will now show: missing names default to `"Team {id}"`
    /// and missing score maps start empty. Counts below 1 are floored
    /// to 1. Shrinking only lowers the count — stored names and scores
    /// for hidden teams stay put.
    pub async fn set_team_count(&self, count: u32) -> QuizState {
        let count = count.max(1);
        let mut quiz = self.quiz.write().await;
        quiz.num_teams = count;
        for id in 1..=count {
            quiz.team_names
                .entry(id)
                .or_insert_with(|| format!("Team {}", id));
            quiz.team_scores.entry(id).or_default();
        }
        quiz.clone()
    }

    /// Rename a materialized team.
    pub async fn set_team_name(&self, id: TeamId, name: String) -> QuizResult<QuizState> {
        let mut quiz = self.quiz.write().await;
        match quiz.team_names.get_mut(&id) {
            Some(stored) => {
                *stored = name;
                Ok(quiz.clone())
            }
            None => Err(QuizError::UnknownTeam(id)),
        }
    }
}
