use super::AppState;
use crate::error::{QuizError, QuizResult};
use crate::types::{QuizState, RoundNumber, Standing, TeamId};

impl AppState {
    /// Set the round count, floored at 1. Scores already stored for
    /// rounds beyond the new count stay put and keep counting toward
    /// totals; the form just stops showing inputs for them.
    pub async fn set_round_count(&self, count: u32) -> QuizState {
        let mut quiz = self.quiz.write().await;
        quiz.num_rounds = count.max(1);
        quiz.clone()
    }

    /// Record one score cell for a materialized team.
    pub async fn set_score(
        &self,
        team: TeamId,
        round: RoundNumber,
        points: u32,
    ) -> QuizResult<QuizState> {
        if round == 0 {
            return Err(QuizError::InvalidRound);
        }
        let mut quiz = self.quiz.write().await;
        if !quiz.team_names.contains_key(&team) {
            return Err(QuizError::UnknownTeam(team));
        }
        quiz.team_scores.entry(team).or_default().insert(round, points);
        Ok(quiz.clone())
    }

    /// Leaderboard rows: every scored team's total, highest first.
    /// The sort is stable over rows collected in ascending team id, so
    /// equal totals rank the lower team id first.
    pub async fn standings(&self) -> Vec<Standing> {
        let quiz = self.quiz.read().await;
        let mut rows: Vec<Standing> = quiz
            .team_scores
            .iter()
            .map(|(&team_id, rounds)| Standing {
                team_id,
                name: quiz.team_name(team_id),
                total: rounds.values().map(|&p| u64::from(p)).sum(),
            })
            .collect();
        rows.sort_by(|a, b| b.total.cmp(&a.total));
        rows
    }
}
