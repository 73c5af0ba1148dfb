mod config;
mod error;
mod models;
mod store;

pub use config::RestMirrorConfig;
pub use error::{RestMirrorError, RestMirrorResult};
pub use store::RestLeaderboardMirror;
