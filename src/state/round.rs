use std::collections::HashMap;

use rand::Rng;
use serde::Serialize;
use thiserror::Error;
use tokio::task::AbortHandle;
use tracing::debug;

use crate::{
    dao::{models::Difficulty, question_source::RawQuestion},
    error::{ProviderError, ProviderResult},
    randomizer::shuffled_with,
    state::question::{Question, decode},
};

/// Fifty-fifty uses available per round.
pub const FIFTY_FIFTY_LIMIT: u8 = 2;
/// Incorrect answers hidden by one fifty-fifty.
pub const FIFTY_FIFTY_HIDDEN: usize = 2;
/// Score delta of a correct answer.
pub const CORRECT_DELTA: i64 = 3;
/// Score delta of an incorrect answer.
pub const INCORRECT_DELTA: i64 = -1;
/// Factor applied to the answer submitted while double-score is armed.
pub const DOUBLE_SCORE_FACTOR: i64 = 2;

/// Lifecycle of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RoundStatus {
    /// Nothing loaded.
    #[default]
    Idle,
    /// Waiting for the question provider.
    Loading,
    /// Questions are being answered.
    Active,
    /// Last question answered and advanced past.
    Finished,
    /// The question load failed; see the error message.
    Error,
}

/// Events driving [`RoundStatus`] changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundEvent {
    /// A question request was issued.
    LoadStarted,
    /// The provider delivered a usable question set.
    LoadSucceeded,
    /// The provider failed or delivered nothing usable.
    LoadFailed,
    /// The last question was completed.
    Finish,
    /// Progress was discarded.
    Reset,
}

/// Error returned when an event does not apply to the current status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid transition: {event:?} cannot be applied while {from:?}")]
pub struct InvalidTransition {
    /// Status the round was in.
    pub from: RoundStatus,
    /// Rejected event.
    pub event: RoundEvent,
}

/// The answer recorded for one question. Created once, never changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerRecord {
    /// Answer text the player picked.
    pub selected: String,
    /// Whether it matched the correct answer.
    pub correct: bool,
    /// Signed score change applied for this answer.
    pub score_delta: i64,
}

/// Filters a round was loaded with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundFilters {
    /// Category id, or `any`.
    pub category: String,
    /// Tier; completed rounds are filed under it.
    pub difficulty: Difficulty,
}

/// Result of trying to move past the current question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// The current question has no answer yet; nothing moved.
    Unanswered,
    /// Moved to the question at this index.
    Moved(usize),
    /// The answered question was the last one.
    RoundComplete,
}

/// Identifies the load a provider response belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

#[derive(Debug)]
struct PendingAdvance {
    ticket: u64,
    handle: AbortHandle,
}

/// Everything one round owns: questions, position, answers and power-up usage.
#[derive(Debug, Default)]
pub struct RoundState {
    status: RoundStatus,
    questions: Vec<Question>,
    current_index: usize,
    answers: HashMap<usize, AnswerRecord>,
    error_message: Option<String>,
    hidden_answers: HashMap<usize, Vec<String>>,
    fifty_fifty_uses: u8,
    double_score_armed: bool,
    double_score_used: bool,
    filters: Option<RoundFilters>,
    generation: u64,
    auto_advance: Option<PendingAdvance>,
    advance_tickets: u64,
}

impl RoundState {
    /// Create an idle round.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> RoundStatus {
        self.status
    }

    /// Message describing the load failure; only set in [`RoundStatus::Error`].
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    pub fn current_answer(&self) -> Option<&AnswerRecord> {
        self.answers.get(&self.current_index)
    }

    /// Answer recorded at `index`, if any.
    pub fn answer_at(&self, index: usize) -> Option<&AnswerRecord> {
        self.answers.get(&index)
    }

    /// Answers hidden by fifty-fifty on the current question; empty when none.
    pub fn current_hidden_answers(&self) -> &[String] {
        self.hidden_answers
            .get(&self.current_index)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn fifty_fifty_remaining(&self) -> u8 {
        FIFTY_FIFTY_LIMIT.saturating_sub(self.fifty_fifty_uses)
    }

    pub fn can_use_double_score(&self) -> bool {
        !self.double_score_used && !self.double_score_armed
    }

    pub fn is_double_score_armed(&self) -> bool {
        self.double_score_armed
    }

    /// Filters of the current or last load.
    pub fn filters(&self) -> Option<&RoundFilters> {
        self.filters.as_ref()
    }

    pub fn has_pending_auto_advance(&self) -> bool {
        self.auto_advance.is_some()
    }

    /// Enter the loading status with every per-round field cleared.
    ///
    /// Any earlier in-flight load is superseded: only the returned ticket is accepted by
    /// [`RoundState::complete_load`].
    pub fn begin_load(&mut self, category: impl Into<String>, difficulty: Difficulty) -> LoadTicket {
        self.clear_progress();
        self.apply(RoundEvent::LoadStarted);
        self.filters = Some(RoundFilters {
            category: category.into(),
            difficulty,
        });
        LoadTicket(self.generation)
    }

    /// Apply a provider response. Returns `false` when the response is stale and was ignored.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: ProviderResult<Vec<RawQuestion>>,
    ) -> bool {
        if ticket.0 != self.generation || self.status != RoundStatus::Loading {
            debug!(
                ticket = ticket.0,
                generation = self.generation,
                status = ?self.status,
                "ignoring stale question response"
            );
            return false;
        }

        let event = match result.and_then(validate_question_set) {
            Ok(records) => {
                self.questions = records.into_iter().map(Question::from_raw).collect();
                self.current_index = 0;
                RoundEvent::LoadSucceeded
            }
            Err(err) => {
                self.error_message = Some(err.user_message());
                RoundEvent::LoadFailed
            }
        };
        self.apply(event)
    }

    /// Record an answer for the current question and return it.
    ///
    /// Returns `None` when the round is not active or the question was already answered.
    pub fn submit_answer(&mut self, answer: &str) -> Option<AnswerRecord> {
        if self.status != RoundStatus::Active || self.current_answer().is_some() {
            return None;
        }
        let question = self.current_question()?;

        let correct = answer == question.correct_answer;
        let mut score_delta = if correct { CORRECT_DELTA } else { INCORRECT_DELTA };
        if self.double_score_armed {
            score_delta *= DOUBLE_SCORE_FACTOR;
            self.double_score_armed = false;
            self.double_score_used = true;
        }

        let record = AnswerRecord {
            selected: answer.to_string(),
            correct,
            score_delta,
        };
        self.answers.insert(self.current_index, record.clone());
        Some(record)
    }

    /// Cancel any pending auto-advance and move past the answered current question.
    pub fn advance(&mut self) -> Advance {
        self.cancel_auto_advance();
        if self.current_answer().is_none() {
            return Advance::Unanswered;
        }

        if self.current_index + 1 >= self.questions.len() {
            Advance::RoundComplete
        } else {
            self.current_index += 1;
            Advance::Moved(self.current_index)
        }
    }

    /// Move to [`RoundStatus::Finished`]. Returns `false` unless the round was active.
    pub fn mark_finished(&mut self) -> bool {
        self.cancel_auto_advance();
        self.apply(RoundEvent::Finish)
    }

    /// Discard all per-round state and return to idle.
    pub fn reset(&mut self) {
        self.clear_progress();
        self.filters = None;
        self.apply(RoundEvent::Reset);
    }

    /// Hide two incorrect answers of the current question using the thread-local generator.
    pub fn use_fifty_fifty(&mut self) -> Option<&[String]> {
        self.use_fifty_fifty_with(&mut rand::rng())
    }

    /// Hide two randomly chosen incorrect answers of the current question.
    ///
    /// Returns the hidden answers, or `None` when the round is not active, the budget is
    /// spent, this question already has hidden answers, or it has fewer than two
    /// incorrect answers.
    pub fn use_fifty_fifty_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<&[String]> {
        if self.status != RoundStatus::Active
            || self.fifty_fifty_remaining() == 0
            || self.hidden_answers.contains_key(&self.current_index)
        {
            return None;
        }
        let question = self.current_question()?;

        let incorrect: Vec<String> = question.incorrect_answers().cloned().collect();
        if incorrect.len() < FIFTY_FIFTY_HIDDEN {
            return None;
        }

        let mut hidden = shuffled_with(&incorrect, rng);
        hidden.truncate(FIFTY_FIFTY_HIDDEN);
        self.fifty_fifty_uses += 1;

        let hidden = self.hidden_answers.entry(self.current_index).or_insert(hidden);
        Some(hidden.as_slice())
    }

    /// Arm double-score for the next answer. Returns `false` when not allowed.
    pub fn arm_double_score(&mut self) -> bool {
        if self.status != RoundStatus::Active || !self.can_use_double_score() {
            return false;
        }
        self.double_score_armed = true;
        true
    }

    /// Replace the pending auto-advance with a new one.
    ///
    /// `spawn` receives the ticket the timer must present to
    /// [`RoundState::claim_auto_advance`] when it fires.
    pub fn schedule_auto_advance<F>(&mut self, spawn: F)
    where
        F: FnOnce(u64) -> AbortHandle,
    {
        self.cancel_auto_advance();
        self.advance_tickets += 1;
        let ticket = self.advance_tickets;
        let handle = spawn(ticket);
        self.auto_advance = Some(PendingAdvance { ticket, handle });
    }

    /// Called by a firing timer. Returns `true` if `ticket` is still the pending one,
    /// clearing it without aborting the calling task.
    pub fn claim_auto_advance(&mut self, ticket: u64) -> bool {
        match &self.auto_advance {
            Some(pending) if pending.ticket == ticket => {
                self.auto_advance = None;
                true
            }
            _ => false,
        }
    }

    /// Abort the pending auto-advance, if any.
    pub fn cancel_auto_advance(&mut self) {
        if let Some(pending) = self.auto_advance.take() {
            pending.handle.abort();
        }
    }

    fn clear_progress(&mut self) {
        self.cancel_auto_advance();
        self.generation += 1;
        self.questions.clear();
        self.current_index = 0;
        self.answers.clear();
        self.error_message = None;
        self.hidden_answers.clear();
        self.fifty_fifty_uses = 0;
        self.double_score_armed = false;
        self.double_score_used = false;
    }

    /// Move to the status `event` leads to; rejected events leave the status unchanged.
    fn apply(&mut self, event: RoundEvent) -> bool {
        match self.transition(event) {
            Ok(next) => {
                self.status = next;
                true
            }
            Err(err) => {
                debug!(error = %err, "round event rejected");
                false
            }
        }
    }

    /// Compute the status an event leads to, if the event applies.
    fn transition(&self, event: RoundEvent) -> Result<RoundStatus, InvalidTransition> {
        let next = match (self.status, event) {
            (_, RoundEvent::LoadStarted) => RoundStatus::Loading,
            (RoundStatus::Loading, RoundEvent::LoadSucceeded) => RoundStatus::Active,
            (RoundStatus::Loading, RoundEvent::LoadFailed) => RoundStatus::Error,
            (RoundStatus::Active, RoundEvent::Finish) => RoundStatus::Finished,
            (_, RoundEvent::Reset) => RoundStatus::Idle,
            (from, event) => return Err(InvalidTransition { from, event }),
        };
        Ok(next)
    }
}

/// Reject sets that cannot form a round: empty, or any question without a non-blank
/// correct answer and at least one distinct incorrect answer. Answers are compared
/// as they will be displayed, after entity decoding.
fn validate_question_set(records: Vec<RawQuestion>) -> ProviderResult<Vec<RawQuestion>> {
    if records.is_empty() {
        return Err(ProviderError::NoQuestions);
    }

    let malformed = records.iter().position(|record| {
        let correct = decode(&record.correct_answer);
        correct.trim().is_empty()
            || record.incorrect_answers.is_empty()
            || record
                .incorrect_answers
                .iter()
                .any(|answer| decode(answer) == correct)
    });

    match malformed {
        Some(index) => Err(ProviderError::Malformed { index }),
        None => Ok(records),
    }
}
