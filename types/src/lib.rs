//! Common types used throughout pollbet.

pub mod pool;

pub use pool::{
    Bet, BetError, BetSlip, Catalog, CatalogError, Direction, LeaderboardEntry, Ledger,
    PlayerStats, Poll, StoreCodec, STARTING_TOKENS,
};
