//! In-memory state model backed by a [`Store`].
//!
//! Each field is flushed on its own right after it changes. There is no batching, so a crash
//! between two persists can leave the store partially updated. In-memory state can be rolled
//! back with [`Snapshot`] when a persist fails.

use anyhow::{Context as _, Result};
use pollbet_types::pool::{
    BETS_KEY, GAME_OVER_KEY, PLAYER_STATS_KEY, POLL_INDEX_KEY, STARTING_TOKENS, TOKENS_KEY,
};
use pollbet_types::{Ledger, PlayerStats, StoreCodec};
use tracing::{debug, warn};

use crate::state::Store;

/// Copy of every in-memory field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Snapshot {
    balance: u64,
    ledger: Ledger,
    stats: PlayerStats,
    poll_index: usize,
    game_over: bool,
}

#[derive(Debug)]
pub struct StateModel<S: Store> {
    store: S,
    balance: u64,
    ledger: Ledger,
    stats: PlayerStats,
    poll_index: usize,
    game_over: bool,
}

impl<S: Store> StateModel<S> {
    /// Read every field from `store`. Missing or unparseable values fall back to defaults.
    pub fn load(store: S) -> Result<Self> {
        let balance = read_or(&store, TOKENS_KEY, STARTING_TOKENS)?;
        let ledger = read_or(&store, BETS_KEY, Ledger::new())?;
        let stats = read_or(&store, PLAYER_STATS_KEY, PlayerStats::new())?;
        let poll_index = read_or(&store, POLL_INDEX_KEY, 0usize)?;
        let game_over = read_or(&store, GAME_OVER_KEY, false)?;
        debug!(
            balance,
            bets = ledger.len(),
            players = stats.len(),
            poll_index,
            game_over,
            "state loaded"
        );
        Ok(Self {
            store,
            balance,
            ledger,
            stats,
            poll_index,
            game_over,
        })
    }

    pub fn balance(&self) -> u64 {
        self.balance
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn stats(&self) -> &PlayerStats {
        &self.stats
    }

    pub fn poll_index(&self) -> usize {
        self.poll_index
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub(crate) fn snapshot(&self) -> Snapshot {
        Snapshot {
            balance: self.balance,
            ledger: self.ledger.clone(),
            stats: self.stats.clone(),
            poll_index: self.poll_index,
            game_over: self.game_over,
        }
    }

    /// Put memory back to `snapshot`. The store is not touched.
    pub(crate) fn restore(&mut self, snapshot: Snapshot) {
        self.balance = snapshot.balance;
        self.ledger = snapshot.ledger;
        self.stats = snapshot.stats;
        self.poll_index = snapshot.poll_index;
        self.game_over = snapshot.game_over;
    }

    pub(crate) fn set_balance(&mut self, balance: u64) {
        self.balance = balance;
    }

    pub(crate) fn ledger_mut(&mut self) -> &mut Ledger {
        &mut self.ledger
    }

    pub(crate) fn stats_mut(&mut self) -> &mut PlayerStats {
        &mut self.stats
    }

    pub(crate) fn set_poll_index(&mut self, poll_index: usize) {
        self.poll_index = poll_index;
    }

    pub(crate) fn set_game_over(&mut self, game_over: bool) {
        self.game_over = game_over;
    }

    pub fn persist_bets(&mut self) -> Result<()> {
        let value = self.ledger.encode_value();
        write(&mut self.store, BETS_KEY, value)
    }

    pub fn persist_balance(&mut self) -> Result<()> {
        let value = self.balance.encode_value();
        write(&mut self.store, TOKENS_KEY, value)
    }

    pub fn persist_stats(&mut self) -> Result<()> {
        let value = self.stats.encode_value();
        write(&mut self.store, PLAYER_STATS_KEY, value)
    }

    pub fn persist_poll_index(&mut self) -> Result<()> {
        let value = self.poll_index.encode_value();
        write(&mut self.store, POLL_INDEX_KEY, value)
    }

    pub fn persist_game_over(&mut self) -> Result<()> {
        let value = self.game_over.encode_value();
        write(&mut self.store, GAME_OVER_KEY, value)
    }
}

fn read_or<S: Store, T: StoreCodec>(store: &S, key: &str, default: T) -> Result<T> {
    let raw = store
        .get(key)
        .with_context(|| format!("store get {key}"))?;
    Ok(match raw {
        None => default,
        Some(raw) => match T::decode_value(&raw) {
            Some(value) => value,
            None => {
                warn!(key, len = raw.len(), "discarding unparseable store value");
                default
            }
        },
    })
}

fn write<S: Store>(store: &mut S, key: &str, value: String) -> Result<()> {
    debug!(key, len = value.len(), "persisting");
    store
        .set(key, value)
        .with_context(|| format!("store set {key}"))
}
