use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

/// Reasons a bet or reveal request is refused.
///
/// Every variant is a recoverable validation failure: the request is dropped before any state
/// is touched.
#[derive(Clone, Debug, ThisError, PartialEq, Eq)]
pub enum BetError {
    #[error("enter a player name")]
    MissingPlayerName,
    #[error("choose an option to bet on")]
    NoOptionSelected,
    #[error("option {option:?} is not part of the current poll")]
    UnknownOption { option: String },
    #[error("enter a valid bet amount")]
    InvalidBetAmount,
    #[error("not enough tokens for this bet (amount={amount}, balance={balance})")]
    InsufficientBalance { amount: u64, balance: u64 },
    #[error("betting is closed until the round is reset")]
    RoundClosed,
    #[error("no bets have been placed this round")]
    EmptyLedgerOnReveal,
}

/// A single wager recorded in the current round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bet {
    pub player: String,
    pub option: String,
    pub amount: u64,
}

impl Bet {
    pub fn new(player: impl Into<String>, option: impl Into<String>, amount: u64) -> Self {
        Self {
            player: player.into(),
            option: option.into(),
            amount,
        }
    }
}

/// Renders the chat-style history line.
impl fmt::Display for Bet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} bet {} tokens on \"{}\"",
            self.player, self.amount, self.option
        )
    }
}

/// Raw bet form input, validated by the round controller.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BetSlip {
    pub player: String,
    pub option: Option<String>,
    pub amount: String,
}

impl BetSlip {
    pub fn new(
        player: impl Into<String>,
        option: Option<impl Into<String>>,
        amount: impl Into<String>,
    ) -> Self {
        Self {
            player: player.into(),
            option: option.map(Into::into),
            amount: amount.into(),
        }
    }
}

/// Parse a user-entered bet amount.
///
/// Surrounding whitespace is ignored. Non-numeric text and values below one are rejected.
pub fn parse_amount(text: &str) -> Result<u64, BetError> {
    let amount: i128 = text
        .trim()
        .parse()
        .map_err(|_| BetError::InvalidBetAmount)?;
    if amount < 1 {
        return Err(BetError::InvalidBetAmount);
    }
    u64::try_from(amount).map_err(|_| BetError::InvalidBetAmount)
}

/// Ordered bets of the current round, oldest first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger {
    bets: Vec<Bet>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, bet: Bet) {
        self.bets.push(bet);
    }

    pub fn clear(&mut self) {
        self.bets.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.bets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bets.len()
    }

    /// Bets in placement order.
    pub fn iter(&self) -> std::slice::Iter<'_, Bet> {
        self.bets.iter()
    }

    /// Bets newest first, the order the history view shows them in.
    pub fn recent(&self) -> impl Iterator<Item = &Bet> {
        self.bets.iter().rev()
    }

    /// Sum of all staked amounts.
    pub fn staked(&self) -> u64 {
        self.bets
            .iter()
            .fold(0u64, |acc, bet| acc.saturating_add(bet.amount))
    }

    pub fn as_slice(&self) -> &[Bet] {
        &self.bets
    }
}

impl From<Vec<Bet>> for Ledger {
    fn from(bets: Vec<Bet>) -> Self {
        Self { bets }
    }
}

impl<'a> IntoIterator for &'a Ledger {
    type Item = &'a Bet;
    type IntoIter = std::slice::Iter<'a, Bet>;

    fn into_iter(self) -> Self::IntoIter {
        self.bets.iter()
    }
}
