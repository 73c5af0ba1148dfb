use std::fmt;

use html_escape::decode_html_entities;
use rand::Rng;
use serde::Serialize;
use uuid::Uuid;

use crate::{
    dao::{models::Difficulty, question_source::RawQuestion},
    randomizer::shuffled_with,
};

/// Stable identity of a question, derived from its encoded prompt and correct answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct QuestionId(Uuid);

impl QuestionId {
    /// Derive the identity from the provider's (still encoded) text, so refetching the
    /// same question yields the same id.
    pub fn derive(question: &str, correct_answer: &str) -> Self {
        let mut name = Vec::with_capacity(question.len() + correct_answer.len() + 1);
        name.extend_from_slice(question.as_bytes());
        name.push(0x1f);
        name.extend_from_slice(correct_answer.as_bytes());
        Self(Uuid::new_v5(&Uuid::NAMESPACE_OID, &name))
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A decoded question with its answer order fixed for the rest of the round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    /// Identity shared by every fetch of the same question.
    pub id: QuestionId,
    /// Decoded prompt text.
    pub prompt: String,
    /// Decoded answers in display order; contains the correct answer exactly once.
    pub answers: Vec<String>,
    /// Decoded correct answer.
    pub correct_answer: String,
    /// Decoded category label.
    pub category: String,
    /// Tier of the question.
    pub difficulty: Difficulty,
}

impl Question {
    /// Normalize a provider record using the thread-local generator.
    pub fn from_raw(raw: RawQuestion) -> Self {
        Self::from_raw_with(raw, &mut rand::rng())
    }

    /// Normalize a provider record, drawing the answer order from `rng`.
    pub fn from_raw_with<R: Rng + ?Sized>(raw: RawQuestion, rng: &mut R) -> Self {
        let id = QuestionId::derive(&raw.question, &raw.correct_answer);

        let mut candidates = Vec::with_capacity(raw.incorrect_answers.len() + 1);
        candidates.push(decode(&raw.correct_answer));
        candidates.extend(raw.incorrect_answers.iter().map(|answer| decode(answer)));

        Self {
            id,
            prompt: decode(&raw.question),
            answers: shuffled_with(&candidates, rng),
            correct_answer: decode(&raw.correct_answer),
            category: decode(&raw.category),
            difficulty: raw.difficulty,
        }
    }

    /// Answers other than the correct one, in display order.
    pub fn incorrect_answers(&self) -> impl Iterator<Item = &String> {
        self.answers
            .iter()
            .filter(move |answer| **answer != self.correct_answer)
    }
}

/// Decode HTML entities the provider leaves in question text.
pub(crate) fn decode(text: &str) -> String {
    decode_html_entities(text).into_owned()
}
