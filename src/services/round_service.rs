use std::sync::Arc;

use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::{
    dao::{
        models::{Difficulty, LeaderboardEntry},
        question_source::QuestionRequest,
    },
    dto::{now_timestamp, snapshot::RoundSnapshot},
    error::ServiceError,
    services::leaderboard_service,
    state::{
        SharedState,
        round::{Advance, AnswerRecord, RoundState, RoundStatus},
    },
};

/// Request a fresh question set and start a round with it.
///
/// Any round in progress is discarded first. Returns the status the load left the
/// round in, or the current status when a newer load or a reset superseded this one.
pub async fn load_questions(
    state: &SharedState,
    category: &str,
    difficulty: Difficulty,
) -> RoundStatus {
    let ticket = state.round().write().await.begin_load(category, difficulty);
    let request = QuestionRequest::for_round(category, difficulty);
    debug!(?request, "requesting question set");

    let result = state.provider().fetch_questions(request).await;
    if let Err(err) = &result {
        warn!(error = %err, "question load failed");
    }

    let mut round = state.round().write().await;
    if round.complete_load(ticket, result) && round.status() == RoundStatus::Active {
        info!(
            questions = round.total_questions(),
            %difficulty,
            "round started"
        );
    }
    round.status()
}

/// Load a question set with the stored category and difficulty preferences.
pub async fn load_selected_questions(state: &SharedState) -> RoundStatus {
    let (category, difficulty) = {
        let preferences = state.preferences().read().await;
        (preferences.category().to_string(), preferences.difficulty())
    };
    load_questions(state, &category, difficulty).await
}

/// Set the player name, zero the score and clear any round in progress.
pub async fn start_quiz(state: &SharedState, name: &str) -> Result<(), ServiceError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ServiceError::InvalidInput("player name must not be empty".into()));
    }

    let mut round = state.round().write().await;
    {
        let mut player = state.player().write().await;
        player.set_name(name);
        player.reset_score();
    }
    round.reset();
    info!(player = name, "quiz started");
    Ok(())
}

/// Answer the current question, update the score and schedule the auto-advance.
///
/// Returns `None` when the round is not active or the question is already answered.
pub async fn submit_answer(state: &SharedState, answer: &str) -> Option<AnswerRecord> {
    let mut round = state.round().write().await;
    let record = round.submit_answer(answer)?;
    state.player().write().await.add_score(record.score_delta);

    let weak = Arc::downgrade(state);
    let delay = state.auto_advance_delay();
    round.schedule_auto_advance(|ticket| {
        tokio::spawn(async move {
            sleep(delay).await;
            if let Some(state) = weak.upgrade() {
                fire_auto_advance(&state, ticket).await;
            }
        })
        .abort_handle()
    });

    debug!(
        correct = record.correct,
        delta = record.score_delta,
        "answer recorded"
    );
    Some(record)
}

/// Move past the answered current question, finishing the round after the last one.
pub async fn go_to_next_question(state: &SharedState) -> Advance {
    let mut round = state.round().write().await;
    advance_locked(state, &mut round).await
}

/// Finish the active round and record it on the leaderboard.
///
/// Returns `false` when the round was not active, which makes repeated calls no-ops.
pub async fn finish_round(state: &SharedState) -> bool {
    let mut round = state.round().write().await;
    finish_locked(state, &mut round).await
}

/// Discard the round and return to idle. The player and leaderboards are kept.
pub async fn reset_quiz_progress(state: &SharedState) {
    state.round().write().await.reset();
}

/// Hide two incorrect answers of the current question.
pub async fn use_fifty_fifty(state: &SharedState) -> Option<Vec<String>> {
    state
        .round()
        .write()
        .await
        .use_fifty_fifty()
        .map(<[String]>::to_vec)
}

/// Double the score delta of the next answer.
pub async fn arm_double_score(state: &SharedState) -> bool {
    state.round().write().await.arm_double_score()
}

/// Current round and player, ready for rendering.
pub async fn snapshot(state: &SharedState) -> RoundSnapshot {
    let round = state.round().read().await;
    let player = state.player().read().await;
    RoundSnapshot::capture(&round, &player)
}

async fn fire_auto_advance(state: &SharedState, ticket: u64) {
    let mut round = state.round().write().await;
    if !round.claim_auto_advance(ticket) {
        debug!(ticket, "ignoring superseded auto-advance");
        return;
    }
    debug!(ticket, "auto-advancing");
    advance_locked(state, &mut round).await;
}

async fn advance_locked(state: &SharedState, round: &mut RoundState) -> Advance {
    let step = round.advance();
    if step == Advance::RoundComplete {
        finish_locked(state, round).await;
    }
    step
}

async fn finish_locked(state: &SharedState, round: &mut RoundState) -> bool {
    if !round.mark_finished() {
        return false;
    }
    let tier = round
        .filters()
        .map(|filters| filters.difficulty)
        .unwrap_or_default();

    let entry = {
        let player = state.player().read().await;
        if player.name().is_empty() {
            info!("round finished without a player name; leaderboard skipped");
            return true;
        }
        LeaderboardEntry {
            name: player.name().to_string(),
            score: player.score(),
            achieved_at: now_timestamp(),
        }
    };

    info!(player = %entry.name, score = entry.score, %tier, "round finished");
    leaderboard_service::apply_local_entry(state, entry.clone(), tier).await;

    if state.mirror().is_some() {
        tokio::spawn(leaderboard_service::push_entry_to_remote(
            state.clone(),
            entry,
            tier,
        ));
    }
    true
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{
        dao::{
            leaderboard_mirror::LeaderboardMirror, question_source::QuestionProvider,
            storage::KeyValueStore,
        },
        error::ProviderError,
        services::testing::{
            FakeMirror, FakeProvider, GatedProvider, PAST_AUTO_ADVANCE, session,
        },
        state::{leaderboard::LEADERBOARD_KEY, round::tests::sample_records},
    };

    use super::*;

    async fn named_session(
        provider: Arc<dyn QuestionProvider>,
        mirror: Option<Arc<dyn LeaderboardMirror>>,
    ) -> SharedState {
        let (state, _) = session(provider, mirror);
        start_quiz(&state, "  Ada ").await.unwrap();
        state
    }

    async fn wait_for_loading(state: &SharedState, difficulty: Difficulty) {
        loop {
            {
                let round = state.round().read().await;
                if round.status() == RoundStatus::Loading
                    && round.filters().map(|filters| filters.difficulty) == Some(difficulty)
                {
                    return;
                }
            }
            tokio::task::yield_now().await;
        }
    }

    async fn answer_and_advance(state: &SharedState, answer: &str) -> Advance {
        submit_answer(state, answer).await.unwrap();
        go_to_next_question(state).await
    }

    #[tokio::test]
    async fn start_quiz_requires_a_name() {
        let (state, _) = session(FakeProvider::with(Vec::new()), None);
        assert!(matches!(
            start_quiz(&state, "   ").await,
            Err(ServiceError::InvalidInput(_))
        ));

        start_quiz(&state, "  Ada ").await.unwrap();
        let snapshot = snapshot(&state).await;
        assert_eq!(snapshot.player_name, "Ada");
        assert_eq!(snapshot.score, 0);
        assert_eq!(snapshot.status, RoundStatus::Idle);
    }

    #[tokio::test]
    async fn load_uses_stored_preferences() {
        let provider = FakeProvider::with(vec![Ok(sample_records(10))]);
        let (state, _) = session(provider.clone(), None);
        {
            let mut preferences = state.preferences().write().await;
            preferences.set_category("18");
            preferences.set_difficulty(Difficulty::Hard);
        }

        assert_eq!(load_selected_questions(&state).await, RoundStatus::Active);

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].category.as_deref(), Some("18"));
        assert_eq!(requests[0].difficulty, Difficulty::Hard);
        assert_eq!(requests[0].amount, 10);
    }

    #[tokio::test]
    async fn provider_failures_end_in_error_status() {
        let provider = FakeProvider::with(vec![
            Err(ProviderError::unavailable(
                "GET failed".into(),
                std::io::Error::other("timed out"),
            )),
            Ok(Vec::new()),
            Ok(sample_records(10)),
        ]);
        let (state, _) = session(provider, None);

        assert_eq!(
            load_questions(&state, "any", Difficulty::Easy).await,
            RoundStatus::Error
        );
        assert_eq!(
            snapshot(&state).await.error_message.as_deref(),
            Some("Unable to load questions. Please try again.")
        );

        assert_eq!(
            load_questions(&state, "any", Difficulty::Easy).await,
            RoundStatus::Error
        );

        assert_eq!(
            load_questions(&state, "any", Difficulty::Easy).await,
            RoundStatus::Active
        );
        assert_eq!(snapshot(&state).await.error_message, None);
    }

    #[tokio::test]
    async fn stale_load_does_not_override_a_newer_one() {
        let provider = Arc::new(GatedProvider::default());
        let first_gate = provider.gate();
        let second_gate = provider.gate();
        let (state, _) = session(provider, None);

        let first = tokio::spawn({
            let state = state.clone();
            async move { load_questions(&state, "any", Difficulty::Easy).await }
        });
        wait_for_loading(&state, Difficulty::Easy).await;
        let second = tokio::spawn({
            let state = state.clone();
            async move { load_questions(&state, "any", Difficulty::Medium).await }
        });
        wait_for_loading(&state, Difficulty::Medium).await;
        tokio::task::yield_now().await;

        second_gate.send(Ok(sample_records(3))).unwrap();
        assert_eq!(second.await.unwrap(), RoundStatus::Active);

        first_gate.send(Ok(sample_records(10))).unwrap();
        first.await.unwrap();

        let round = state.round().read().await;
        assert_eq!(round.total_questions(), 3);
        assert_eq!(round.filters().unwrap().difficulty, Difficulty::Medium);
    }

    #[tokio::test(start_paused = true)]
    async fn answer_advances_automatically() {
        let state = named_session(FakeProvider::with(vec![Ok(sample_records(10))]), None).await;
        load_questions(&state, "any", Difficulty::Easy).await;

        let record = submit_answer(&state, "right").await.unwrap();
        assert!(record.correct);
        assert_eq!(snapshot(&state).await.score, 3);
        assert!(state.round().read().await.has_pending_auto_advance());

        sleep(PAST_AUTO_ADVANCE).await;

        let round = state.round().read().await;
        assert_eq!(round.current_index(), 1);
        assert!(!round.has_pending_auto_advance());
    }

    #[tokio::test(start_paused = true)]
    async fn reset_and_reload_drop_the_pending_timer() {
        let provider = FakeProvider::with(vec![
            Ok(sample_records(10)),
            Ok(sample_records(10)),
            Ok(sample_records(10)),
        ]);
        let state = named_session(provider, None).await;

        load_questions(&state, "any", Difficulty::Easy).await;
        submit_answer(&state, "right").await.unwrap();
        reset_quiz_progress(&state).await;
        sleep(PAST_AUTO_ADVANCE).await;
        {
            let round = state.round().read().await;
            assert_eq!(round.status(), RoundStatus::Idle);
            assert_eq!(round.current_index(), 0);
        }

        load_questions(&state, "any", Difficulty::Easy).await;
        submit_answer(&state, "right").await.unwrap();
        assert_eq!(
            load_questions(&state, "any", Difficulty::Hard).await,
            RoundStatus::Active
        );
        sleep(PAST_AUTO_ADVANCE).await;

        let round = state.round().read().await;
        assert_eq!(round.status(), RoundStatus::Active);
        assert_eq!(round.current_index(), 0);
        assert!(round.current_answer().is_none());
        assert!(!round.has_pending_auto_advance());
    }

    #[tokio::test(start_paused = true)]
    async fn manual_advance_cancels_the_timer() {
        let state = named_session(FakeProvider::with(vec![Ok(sample_records(10))]), None).await;
        load_questions(&state, "any", Difficulty::Easy).await;

        assert_eq!(go_to_next_question(&state).await, Advance::Unanswered);
        assert_eq!(answer_and_advance(&state, "right").await, Advance::Moved(1));

        sleep(PAST_AUTO_ADVANCE).await;
        assert_eq!(state.round().read().await.current_index(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn full_round_records_one_entry() {
        let state =
            named_session(FakeProvider::with(vec![Ok(sample_records(3))]), None).await;
        load_questions(&state, "any", Difficulty::Medium).await;

        assert_eq!(answer_and_advance(&state, "right").await, Advance::Moved(1));
        assert_eq!(answer_and_advance(&state, "wrong a").await, Advance::Moved(2));
        assert_eq!(answer_and_advance(&state, "right").await, Advance::RoundComplete);

        let snapshot = snapshot(&state).await;
        assert_eq!(snapshot.status, RoundStatus::Finished);
        assert_eq!(snapshot.score, 5);

        assert!(!finish_round(&state).await);
        assert_eq!(go_to_next_question(&state).await, Advance::RoundComplete);

        let leaderboard = state.leaderboard().read().await;
        let bucket = leaderboard.bucket(Difficulty::Medium);
        assert_eq!(bucket.len(), 1);
        assert_eq!(bucket[0].name, "Ada");
        assert_eq!(bucket[0].score, 5);
        assert!(leaderboard.bucket(Difficulty::Easy).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn last_answer_finishes_on_its_own() {
        let state =
            named_session(FakeProvider::with(vec![Ok(sample_records(1))]), None).await;
        load_questions(&state, "any", Difficulty::Hard).await;

        submit_answer(&state, "right").await.unwrap();
        sleep(PAST_AUTO_ADVANCE).await;

        assert_eq!(state.round().read().await.status(), RoundStatus::Finished);
        assert_eq!(
            state.leaderboard().read().await.bucket(Difficulty::Hard).len(),
            1
        );
    }

    #[tokio::test]
    async fn anonymous_round_skips_the_leaderboard() {
        let (state, storage) =
            session(FakeProvider::with(vec![Ok(sample_records(1))]), None);
        load_questions(&state, "any", Difficulty::Easy).await;

        assert_eq!(answer_and_advance(&state, "right").await, Advance::RoundComplete);

        assert_eq!(state.round().read().await.status(), RoundStatus::Finished);
        assert!(state.leaderboard().read().await.map().easy.is_empty());
        assert_eq!(storage.get(LEADERBOARD_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn remote_failure_keeps_the_local_entry() {
        let mirror = Arc::new(FakeMirror::failing_insert());
        let state = named_session(
            FakeProvider::with(vec![Ok(sample_records(1))]),
            Some(mirror.clone() as Arc<dyn LeaderboardMirror>),
        )
        .await;
        load_questions(&state, "any", Difficulty::Easy).await;

        submit_answer(&state, "right").await.unwrap();
        assert!(finish_round(&state).await);
        tokio::task::yield_now().await;

        assert_eq!(state.round().read().await.status(), RoundStatus::Finished);
        assert_eq!(state.leaderboard().read().await.bucket(Difficulty::Easy).len(), 1);
        assert!(mirror.inserted().is_empty());
    }

    #[tokio::test]
    async fn reset_blocks_further_answers() {
        let state =
            named_session(FakeProvider::with(vec![Ok(sample_records(10))]), None).await;
        load_questions(&state, "any", Difficulty::Easy).await;
        submit_answer(&state, "right").await.unwrap();

        reset_quiz_progress(&state).await;

        assert!(submit_answer(&state, "right").await.is_none());
        let snapshot = snapshot(&state).await;
        assert_eq!(snapshot.status, RoundStatus::Idle);
        assert_eq!(snapshot.total_questions, 0);
        assert_eq!(snapshot.player_name, "Ada");
        assert_eq!(snapshot.score, 3);
        assert!(!state.round().read().await.has_pending_auto_advance());
    }

    #[tokio::test]
    async fn power_ups_through_the_service() {
        let state =
            named_session(FakeProvider::with(vec![Ok(sample_records(10))]), None).await;
        assert!(use_fifty_fifty(&state).await.is_none());
        assert!(!arm_double_score(&state).await);

        load_questions(&state, "any", Difficulty::Easy).await;
        let hidden = use_fifty_fifty(&state).await.unwrap();
        assert_eq!(hidden.len(), 2);
        assert!(!hidden.contains(&"right".to_string()));
        assert!(arm_double_score(&state).await);

        let snapshot = snapshot(&state).await;
        assert_eq!(snapshot.hidden_answers, hidden);
        assert_eq!(snapshot.fifty_fifty_remaining, 1);
        assert!(snapshot.double_score_armed);

        assert_eq!(submit_answer(&state, "right").await.unwrap().score_delta, 6);
        assert_eq!(super::snapshot(&state).await.score, 6);
    }
}
