//! Round controller.
//!
//! The controller is the only component that mutates the [`StateModel`]. A round moves
//! between two phases:
//!
//! 1. **Open** - bets are accepted
//! 2. **Closed** - a winner was revealed; bets are refused until the round is reset
//!
//! Every request is validated in full before anything changes, so a rejected bet or reveal
//! leaves both memory and the store untouched. If a store write fails part way through, memory
//! is rolled back to where it was before the request; keys already written stay written.

use std::fmt;

use pollbet_types::{
    pool::parse_amount, Bet, BetError, BetSlip, Catalog, Direction, LeaderboardEntry, Ledger,
    PlayerStats, Poll, STARTING_TOKENS,
};
use thiserror::Error;
use tracing::{info, warn};

use crate::model::StateModel;
use crate::pool::{self, DistributionLine, OddsTable, Summary};
use crate::rng::OutcomeSource;
use crate::state::Store;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Open,
    Closed,
}

#[derive(Debug, Error)]
pub enum RoundError {
    #[error(transparent)]
    Rejected(#[from] BetError),
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl RoundError {
    /// The validation failure, if this was one.
    pub fn rejection(&self) -> Option<&BetError> {
        match self {
            RoundError::Rejected(err) => Some(err),
            RoundError::Store(_) => None,
        }
    }
}

/// Confirmation for an accepted bet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Receipt {
    pub bet: Bet,
    /// Balance after the stake was deducted.
    pub balance: u64,
}

impl fmt::Display for Receipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Bet placed: {} tokens on \"{}\" by {}",
            self.bet.amount, self.bet.option, self.bet.player
        )
    }
}

/// A player paid out by a reveal. One entry per winning bet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Winner {
    pub player: String,
    pub payout: u64,
}

/// Outcome of a reveal. An empty `winners` list means nobody backed the winning option.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reveal {
    pub option: String,
    pub winners: Vec<Winner>,
}

impl Reveal {
    pub fn total_paid(&self) -> u64 {
        self.winners
            .iter()
            .fold(0u64, |acc, w| acc.saturating_add(w.payout))
    }
}

/// Winner announcement text.
impl fmt::Display for Reveal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Winner: {}", self.option)?;
        if self.winners.is_empty() {
            return write!(f, "\nNo one bet on the winning option. The house keeps the pool.");
        }
        for winner in &self.winners {
            write!(f, "\n{} wins {} tokens", winner.player, winner.payout)?;
        }
        Ok(())
    }
}

/// Check a bet request against the current round without touching any state.
///
/// Conditions are checked in a fixed order and the first failure is reported. `amount` is
/// already parsed; its error only surfaces once the player and option checks pass.
pub fn validate_bet(
    poll: &Poll,
    phase: Phase,
    balance: u64,
    player: &str,
    option: Option<&str>,
    amount: Result<u64, BetError>,
) -> Result<Bet, BetError> {
    if phase == Phase::Closed {
        return Err(BetError::RoundClosed);
    }
    let player = player.trim();
    if player.is_empty() {
        return Err(BetError::MissingPlayerName);
    }
    let option = match option {
        Some(option) if !option.is_empty() => option,
        _ => return Err(BetError::NoOptionSelected),
    };
    if !poll.contains(option) {
        return Err(BetError::UnknownOption {
            option: option.to_string(),
        });
    }
    let amount = amount?;
    if amount == 0 {
        return Err(BetError::InvalidBetAmount);
    }
    if amount > balance {
        return Err(BetError::InsufficientBalance { amount, balance });
    }
    Ok(Bet::new(player, option, amount))
}

/// Orchestrates bets, reveals, resets and poll navigation over a persisted state model.
pub struct RoundController<S: Store, R: OutcomeSource> {
    catalog: Catalog,
    state: StateModel<S>,
    rng: R,
    announcement: Option<Reveal>,
}

impl<S: Store, R: OutcomeSource> RoundController<S, R> {
    /// Load state from `store`. A stored poll index outside `catalog` resets to the first
    /// poll. If any stored bet names an option the current poll does not offer, the whole
    /// ledger is dropped; stakes are not refunded, as with any other round reset.
    pub fn new(catalog: Catalog, store: S, rng: R) -> Result<Self, RoundError> {
        let mut state = StateModel::load(store)?;
        if catalog.get(state.poll_index()).is_none() {
            warn!(
                poll_index = state.poll_index(),
                polls = catalog.len(),
                "stored poll index out of range"
            );
            state.set_poll_index(0);
            state.persist_poll_index()?;
        }
        let stale = match catalog.get(state.poll_index()) {
            Some(poll) => state
                .ledger()
                .iter()
                .any(|bet| !poll.contains(&bet.option)),
            None => !state.ledger().is_empty(),
        };
        if stale {
            warn!(
                poll_index = state.poll_index(),
                bets = state.ledger().len(),
                "dropping ledger with bets outside the current poll"
            );
            state.ledger_mut().clear();
            state.persist_bets()?;
        }
        Ok(Self {
            catalog,
            state,
            rng,
            announcement: None,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn poll_index(&self) -> usize {
        self.state.poll_index()
    }

    pub fn poll(&self) -> &Poll {
        // The index is validated on load and only moves through `Catalog::step`.
        &self.catalog.polls()[self.state.poll_index()]
    }

    pub fn phase(&self) -> Phase {
        if self.state.game_over() {
            Phase::Closed
        } else {
            Phase::Open
        }
    }

    pub fn balance(&self) -> u64 {
        self.state.balance()
    }

    pub fn ledger(&self) -> &Ledger {
        self.state.ledger()
    }

    pub fn stats(&self) -> &PlayerStats {
        self.state.stats()
    }

    pub fn state(&self) -> &StateModel<S> {
        &self.state
    }

    pub fn into_state(self) -> StateModel<S> {
        self.state
    }

    pub fn summary(&self) -> Summary {
        pool::summarize(self.state.ledger())
    }

    pub fn odds(&self) -> OddsTable {
        pool::odds(&self.summary())
    }

    pub fn distribution(&self) -> Vec<DistributionLine> {
        pool::distribution(&self.summary())
    }

    /// Bets newest first.
    pub fn history(&self) -> impl Iterator<Item = &Bet> {
        self.state.ledger().recent()
    }

    pub fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        self.state.stats().leaderboard()
    }

    /// The last reveal of this round, cleared by any reset.
    pub fn announcement(&self) -> Option<&Reveal> {
        self.announcement.as_ref()
    }

    /// Place a bet from already-parsed values.
    pub fn place_bet(
        &mut self,
        player: &str,
        option: Option<&str>,
        amount: u64,
    ) -> Result<Receipt, RoundError> {
        self.place(player, option, Ok(amount))
    }

    /// Place a bet from raw form input.
    pub fn submit(&mut self, slip: &BetSlip) -> Result<Receipt, RoundError> {
        self.place(
            &slip.player,
            slip.option.as_deref(),
            parse_amount(&slip.amount),
        )
    }

    fn place(
        &mut self,
        player: &str,
        option: Option<&str>,
        amount: Result<u64, BetError>,
    ) -> Result<Receipt, RoundError> {
        let balance = self.state.balance();
        let bet = match validate_bet(self.poll(), self.phase(), balance, player, option, amount)
        {
            Ok(bet) => bet,
            Err(err) => {
                warn!(player, ?option, balance, ?err, "bet rejected");
                return Err(err.into());
            }
        };

        let balance = balance - bet.amount;
        self.transact(|state| {
            state.ledger_mut().push(bet.clone());
            state.set_balance(balance);
            state.persist_bets()?;
            state.persist_balance()
        })?;
        info!(
            player = %bet.player,
            option = %bet.option,
            amount = bet.amount,
            balance,
            "bet placed"
        );
        Ok(Receipt { bet, balance })
    }

    /// Pick a winning option uniformly from the current poll and pay every bet on it.
    ///
    /// Any option can win, including one nobody backed.
    pub fn reveal_winner(&mut self) -> Result<Reveal, RoundError> {
        if self.state.ledger().is_empty() {
            warn!(poll_index = self.poll_index(), "reveal rejected: no bets");
            return Err(BetError::EmptyLedgerOnReveal.into());
        }

        let len = self.poll().options.len();
        let index = self.rng.pick(len);
        let option = self.poll().options[index].clone();
        let odds = self.odds().get(&option);

        let winners: Vec<Winner> = match odds {
            Some(odds) => self
                .state
                .ledger()
                .iter()
                .filter(|bet| bet.option == option)
                .map(|bet| Winner {
                    player: bet.player.clone(),
                    payout: pool::payout(bet.amount, odds),
                })
                .collect(),
            None => Vec::new(),
        };

        let balance = winners
            .iter()
            .fold(self.state.balance(), |acc, w| acc.saturating_add(w.payout));
        self.transact(|state| {
            for winner in &winners {
                state.stats_mut().credit(&winner.player, winner.payout);
            }
            state.set_balance(balance);
            state.set_game_over(true);
            state.persist_balance()?;
            state.persist_stats()?;
            state.persist_game_over()?;
            state.ledger_mut().clear();
            state.persist_bets()
        })?;

        let reveal = Reveal { option, winners };
        info!(
            option = %reveal.option,
            winners = reveal.winners.len(),
            paid = reveal.total_paid(),
            balance,
            "winner revealed"
        );
        self.announcement = Some(reveal.clone());
        Ok(reveal)
    }

    /// Clear the ledger and reopen betting. Balance and winnings are kept.
    pub fn reset_round(&mut self) -> Result<(), RoundError> {
        self.transact(reopen::<S>)?;
        self.announcement = None;
        info!(poll_index = self.poll_index(), "round reset");
        Ok(())
    }

    /// Start over: empty ledger, starting balance, no winnings. The caller is responsible for
    /// confirming with the user first.
    pub fn reset_game(&mut self) -> Result<(), RoundError> {
        self.transact(|state| {
            state.ledger_mut().clear();
            state.set_balance(STARTING_TOKENS);
            state.stats_mut().clear();
            state.set_game_over(false);
            state.persist_bets()?;
            state.persist_balance()?;
            state.persist_stats()?;
            state.persist_game_over()
        })?;
        self.announcement = None;
        info!(balance = STARTING_TOKENS, "game reset");
        Ok(())
    }

    /// Move to the neighbouring poll (wrapping) and reset the round.
    pub fn advance_poll(&mut self, direction: Direction) -> Result<&Poll, RoundError> {
        let next = self.catalog.step(self.state.poll_index(), direction);
        self.transact(|state| {
            state.set_poll_index(next);
            state.persist_poll_index()?;
            reopen(state)
        })?;
        self.announcement = None;
        info!(poll_index = next, ?direction, "poll changed");
        Ok(self.poll())
    }

    /// Apply `mutate` to the state model, rolling memory back if it fails.
    fn transact<T>(
        &mut self,
        mutate: impl FnOnce(&mut StateModel<S>) -> anyhow::Result<T>,
    ) -> Result<T, RoundError> {
        let snapshot = self.state.snapshot();
        match mutate(&mut self.state) {
            Ok(value) => Ok(value),
            Err(err) => {
                self.state.restore(snapshot);
                warn!(?err, "store write failed, state rolled back");
                Err(err.into())
            }
        }
    }
}

/// Empty ledger, betting open.
fn reopen<S: Store>(state: &mut StateModel<S>) -> anyhow::Result<()> {
    state.ledger_mut().clear();
    state.persist_bets()?;
    state.set_game_over(false);
    state.persist_game_over()
}
