//! Serializable views and helpers for rendering layers.

use time::{OffsetDateTime, format_description::well_known::Rfc3339};

pub mod options;
pub mod snapshot;

/// RFC 3339 rendering used for leaderboard timestamps.
pub fn format_timestamp(time: OffsetDateTime) -> String {
    time.format(&Rfc3339)
        .unwrap_or_else(|_| "invalid-timestamp".into())
}

/// Current UTC time in RFC 3339.
pub fn now_timestamp() -> String {
    format_timestamp(OffsetDateTime::now_utc())
}
