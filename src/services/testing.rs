//! In-process backends for service tests.

use std::{
    collections::VecDeque,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use futures::future::{BoxFuture, FutureExt};
use tokio::sync::oneshot;

use crate::{
    config::QuizConfig,
    dao::{
        leaderboard_mirror::LeaderboardMirror,
        models::{Difficulty, LeaderboardEntry, LeaderboardMap},
        question_source::{QuestionProvider, QuestionRequest, RawQuestion},
        storage::{KeyValueStore, MemoryStore},
    },
    error::{ProviderError, ProviderResult, RemoteLeaderboardError, RemoteResult},
    state::{QuizState, SharedState},
};

/// Serves queued responses in order; an empty queue yields [`ProviderError::NoQuestions`].
#[derive(Default)]
pub(crate) struct FakeProvider {
    responses: Mutex<VecDeque<ProviderResult<Vec<RawQuestion>>>>,
    requests: Mutex<Vec<QuestionRequest>>,
}

impl FakeProvider {
    pub(crate) fn with(responses: Vec<ProviderResult<Vec<RawQuestion>>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::default(),
        })
    }

    pub(crate) fn requests(&self) -> Vec<QuestionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl QuestionProvider for FakeProvider {
    fn fetch_questions(
        &self,
        request: QuestionRequest,
    ) -> BoxFuture<'static, ProviderResult<Vec<RawQuestion>>> {
        self.requests.lock().unwrap().push(request);
        let response = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(ProviderError::NoQuestions));
        async move { response }.boxed()
    }
}

/// Every request waits until the test sends its response through the matching sender.
#[derive(Default)]
pub(crate) struct GatedProvider {
    pending: Mutex<VecDeque<oneshot::Receiver<ProviderResult<Vec<RawQuestion>>>>>,
}

impl GatedProvider {
    /// Queue a gate for the next request and return its sender.
    pub(crate) fn gate(&self) -> oneshot::Sender<ProviderResult<Vec<RawQuestion>>> {
        let (sender, receiver) = oneshot::channel();
        self.pending.lock().unwrap().push_back(receiver);
        sender
    }
}

impl QuestionProvider for GatedProvider {
    fn fetch_questions(
        &self,
        _request: QuestionRequest,
    ) -> BoxFuture<'static, ProviderResult<Vec<RawQuestion>>> {
        let receiver = self.pending.lock().unwrap().pop_front();
        async move {
            match receiver {
                Some(receiver) => receiver.await.unwrap_or(Err(ProviderError::NoQuestions)),
                None => Err(ProviderError::NoQuestions),
            }
        }
        .boxed()
    }
}

/// Mirror that keeps boards in memory and can be told to fail.
#[derive(Default)]
pub(crate) struct FakeMirror {
    boards: Mutex<LeaderboardMap>,
    inserted: Mutex<Vec<(LeaderboardEntry, Difficulty)>>,
    fail_insert: bool,
    fail_fetch_tier: Option<Difficulty>,
    fetches: AtomicUsize,
}

impl FakeMirror {
    pub(crate) fn failing_insert() -> Self {
        Self {
            fail_insert: true,
            ..Self::default()
        }
    }

    pub(crate) fn failing_fetch(tier: Difficulty) -> Self {
        Self {
            fail_fetch_tier: Some(tier),
            ..Self::default()
        }
    }

    pub(crate) fn with_boards(boards: LeaderboardMap) -> Self {
        Self {
            boards: Mutex::new(boards),
            ..Self::default()
        }
    }

    pub(crate) fn inserted(&self) -> Vec<(LeaderboardEntry, Difficulty)> {
        self.inserted.lock().unwrap().clone()
    }

    pub(crate) fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl LeaderboardMirror for FakeMirror {
    fn fetch_top(&self, tier: Difficulty) -> BoxFuture<'static, RemoteResult<Vec<LeaderboardEntry>>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let result = if self.fail_fetch_tier == Some(tier) {
            Err(RemoteLeaderboardError::Rejected {
                tier,
                message: "fetch refused".into(),
            })
        } else {
            Ok(self.boards.lock().unwrap().bucket(tier).to_vec())
        };
        async move { result }.boxed()
    }

    fn insert(
        &self,
        entry: LeaderboardEntry,
        tier: Difficulty,
    ) -> BoxFuture<'static, RemoteResult<()>> {
        let result = if self.fail_insert {
            Err(RemoteLeaderboardError::unavailable(
                "insert failed".into(),
                std::io::Error::other("connection refused"),
            ))
        } else {
            self.inserted.lock().unwrap().push((entry.clone(), tier));
            self.boards.lock().unwrap().bucket_mut(tier).push(entry);
            Ok(())
        };
        async move { result }.boxed()
    }
}

/// Session with in-memory storage and the default 1500ms auto-advance.
pub(crate) fn session(
    provider: Arc<dyn QuestionProvider>,
    mirror: Option<Arc<dyn LeaderboardMirror>>,
) -> (SharedState, Arc<MemoryStore>) {
    let storage = Arc::new(MemoryStore::new());
    let state = QuizState::new(
        &QuizConfig::default(),
        provider,
        mirror,
        storage.clone() as Arc<dyn KeyValueStore>,
    );
    (state, storage)
}

/// Longer than the auto-advance delay.
pub(crate) const PAST_AUTO_ADVANCE: Duration = Duration::from_millis(1_600);

pub(crate) fn entry(name: &str, score: i64) -> LeaderboardEntry {
    LeaderboardEntry {
        name: name.into(),
        score,
        achieved_at: "2026-10-19T08:30:00Z".into(),
    }
}
