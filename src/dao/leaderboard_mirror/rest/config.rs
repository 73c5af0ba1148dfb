/// Default table name holding leaderboard rows.
pub const DEFAULT_TABLE: &str = "leaderboard";

const URL_ENV: &str = "TRIVIA_LEADERBOARD_URL";
const KEY_ENV: &str = "TRIVIA_LEADERBOARD_KEY";
const TABLE_ENV: &str = "TRIVIA_LEADERBOARD_TABLE";

/// Runtime configuration describing how to reach the remote leaderboard table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestMirrorConfig {
    /// Project URL; the table lives under `/rest/v1/`.
    pub base_url: String,
    /// Key sent both as `apikey` and as bearer token.
    pub api_key: String,
    /// Table holding one row per recorded round.
    pub table: String,
}

impl RestMirrorConfig {
    /// Construct a configuration from explicit endpoint and key, using the default table.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            table: DEFAULT_TABLE.into(),
        }
    }

    /// Target a different table.
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    /// Read the mirror settings from the environment.
    ///
    /// Returns `None` when the endpoint or key is missing or blank, which disables the mirror.
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let non_blank = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let config = Self::new(non_blank(URL_ENV)?, non_blank(KEY_ENV)?);
        Some(match non_blank(TABLE_ENV) {
            Some(table) => config.with_table(table),
            None => config,
        })
    }
}
