//! Serializable view of a round for rendering layers.

use serde::Serialize;

use crate::state::{
    player::PlayerLedger,
    question::Question,
    round::{AnswerRecord, RoundState, RoundStatus},
};

/// Read-only view of a round for rendering layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundSnapshot {
    /// Lifecycle status.
    pub status: RoundStatus,
    /// Load failure message, only in the error status.
    pub error_message: Option<String>,
    /// Zero-based position in the round.
    pub current_index: usize,
    /// Number of questions loaded.
    pub total_questions: usize,
    /// Question at the current position.
    pub current_question: Option<Question>,
    /// Answer recorded for the current question.
    pub current_answer: Option<AnswerRecord>,
    /// Answers removed by fifty-fifty on the current question.
    pub hidden_answers: Vec<String>,
    /// Fifty-fifty uses left this round.
    pub fifty_fifty_remaining: u8,
    /// Whether double-score may still be armed.
    pub can_use_double_score: bool,
    /// Whether the next answer is doubled.
    pub double_score_armed: bool,
    /// Name entries are recorded under; empty when anonymous.
    pub player_name: String,
    /// Running score.
    pub score: i64,
}

impl RoundSnapshot {
    /// Capture the round together with the player it is scored for.
    pub fn capture(round: &RoundState, player: &PlayerLedger) -> Self {
        Self {
            status: round.status(),
            error_message: round.error_message().map(str::to_string),
            current_index: round.current_index(),
            total_questions: round.total_questions(),
            current_question: round.current_question().cloned(),
            current_answer: round.current_answer().cloned(),
            hidden_answers: round.current_hidden_answers().to_vec(),
            fifty_fifty_remaining: round.fifty_fifty_remaining(),
            can_use_double_score: round.can_use_double_score(),
            double_score_armed: round.is_double_score_armed(),
            player_name: player.name().to_string(),
            score: player.score(),
        }
    }
}
