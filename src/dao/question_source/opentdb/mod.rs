mod error;
mod models;
mod provider;

pub use error::{OpenTdbError, OpenTdbResult};
pub use provider::OpenTdbProvider;
