//! pollbet execution layer.
//!
//! This crate contains the betting-pool calculation core: the pure pool calculator, the
//! persisted state model and the round controller that drives bets, reveals and resets.
//!
//! ## Determinism requirements
//! - Pool totals, odds and payouts are pure functions of the ledger.
//! - Winner selection only draws from the injected [`OutcomeSource`].
//! - Payouts are floored with integer arithmetic; floats are used for display only.
//!
//! ## Storage invariants
//! Every mutation is followed immediately by a flush of the one field it touched. A failed
//! validation never writes to the store.
//!
//! The primary entrypoint is [`RoundController`].
//!
//! ## Minimal round (example)
//! ```no_run
//! use pollbet_execution::{outcome_rng, RoundController, RoundError, Store};
//! use pollbet_types::Catalog;
//!
//! # fn example(store: impl Store) -> Result<(), RoundError> {
//! let mut round = RoundController::new(Catalog::default(), store, outcome_rng(Some(7)))?;
//! round.place_bet("Alice", Some("Team Red"), 40)?;
//! round.place_bet("Bob", Some("Team Blue"), 60)?;
//!
//! // Picks a winner uniformly, pays the winning bets and closes the round.
//! let reveal = round.reveal_winner()?;
//! println!("{reveal}");
//!
//! // Reopen betting on the same poll.
//! round.reset_round()?;
//! # Ok(())
//! # }
//! ```

pub mod pool;
pub mod rng;
pub mod round;

#[cfg(any(test, feature = "mocks"))]
pub mod mocks;

mod model;
mod state;

pub use model::StateModel;
pub use pool::{
    distribution, odds, payout, summarize, DistributionLine, Odds, OddsTable, OptionTotal,
    Summary,
};
pub use rng::{outcome_rng, OutcomeSource};
pub use round::{validate_bet, Phase, Receipt, Reveal, RoundController, RoundError, Winner};
pub use state::Store;

#[cfg(any(test, feature = "mocks"))]
pub use state::Memory;
