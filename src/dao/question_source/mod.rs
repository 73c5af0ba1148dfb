#[cfg(feature = "opentdb")]
pub mod opentdb;

use futures::future::BoxFuture;
use serde::Deserialize;

use crate::{
    dao::models::{ANY_CATEGORY, Difficulty},
    error::ProviderResult,
};

/// Number of questions requested for every round.
pub const QUESTIONS_PER_ROUND: u8 = 10;

/// Parameters of a question set request. Only multiple-choice questions are requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRequest {
    /// How many questions to fetch.
    pub amount: u8,
    /// Provider category id; `None` means any category.
    pub category: Option<String>,
    /// Tier of the requested questions.
    pub difficulty: Difficulty,
}

impl QuestionRequest {
    /// Request a full round for the given filters; the `any` category is omitted.
    pub fn for_round(category: &str, difficulty: Difficulty) -> Self {
        let category = category.trim();
        Self {
            amount: QUESTIONS_PER_ROUND,
            category: (!category.is_empty() && category != ANY_CATEGORY)
                .then(|| category.to_string()),
            difficulty,
        }
    }
}

/// Question record as delivered by the provider, still HTML-encoded.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawQuestion {
    /// Prompt text.
    pub question: String,
    /// Text of the single correct answer.
    pub correct_answer: String,
    /// Wrong answers, zero or more.
    #[serde(default)]
    pub incorrect_answers: Vec<String>,
    /// Category label.
    pub category: String,
    /// Tier of the question.
    pub difficulty: Difficulty,
}

/// Black-box source of question sets.
pub trait QuestionProvider: Send + Sync {
    fn fetch_questions(
        &self,
        request: QuestionRequest,
    ) -> BoxFuture<'static, ProviderResult<Vec<RawQuestion>>>;
}
