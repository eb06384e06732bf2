//! Betting-pool domain types.
//!
//! Defines bets and the round ledger, the poll catalog, per-player winnings and the values
//! exchanged with the persistent store.

mod bet;
mod codec;
mod constants;
mod poll;
mod stats;

pub use bet::*;
pub use codec::*;
pub use constants::*;
pub use poll::*;
pub use stats::*;

#[cfg(test)]
mod tests;
