//! Single-session trivia rounds: question loading, scoring, power-ups and tiered
//! leaderboards with an optional remote mirror.
//!
//! A session is a [`state::QuizState`] shared behind an [`std::sync::Arc`]; the
//! operations live in [`services::round_service`] and [`services::leaderboard_service`].

pub mod config;
pub mod dao;
pub mod dto;
pub mod error;
pub mod randomizer;
pub mod services;
pub mod state;
pub mod telemetry;
