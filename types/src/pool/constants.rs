/// Tokens granted to a fresh session and restored by a full game reset.
pub const STARTING_TOKENS: u64 = 100;

/// Store key for the current round's ledger (JSON array of bets).
pub const BETS_KEY: &str = "bets";

/// Store key for the token balance (decimal integer).
pub const TOKENS_KEY: &str = "tokens";

/// Store key for cumulative winnings per player (JSON object).
pub const PLAYER_STATS_KEY: &str = "playerStats";

/// Store key for the index of the active poll in the catalog.
pub const POLL_INDEX_KEY: &str = "pollIndex";

/// Store key for the round-closed flag.
pub const GAME_OVER_KEY: &str = "gameOver";

/// Minimum number of options a poll must offer.
pub const MIN_POLL_OPTIONS: usize = 2;
