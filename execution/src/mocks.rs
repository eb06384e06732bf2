//! Deterministic helpers for tests.

use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;

use anyhow::{bail, Result};
use pollbet_types::{Catalog, Poll};

use crate::rng::OutcomeSource;
use crate::round::RoundController;
use crate::state::{Memory, Store};

/// Replays a fixed list of picks, then falls back to the first option.
#[derive(Clone, Debug, Default)]
pub struct Scripted {
    picks: VecDeque<usize>,
}

impl Scripted {
    pub fn new(picks: &[usize]) -> Self {
        Self {
            picks: picks.iter().copied().collect(),
        }
    }
}

impl OutcomeSource for Scripted {
    fn pick(&mut self, len: usize) -> usize {
        self.picks.pop_front().unwrap_or(0) % len
    }
}

/// Single-poll catalog: "Team Red" vs "Team Blue".
pub fn team_catalog() -> Catalog {
    Catalog::new(vec![Poll::new(
        "Who takes tonight's scrimmage?",
        ["Team Red", "Team Blue"],
    )])
    .expect("team catalog is valid")
}

/// Memory store whose writes start failing on demand.
///
/// Clones share the failure budget, so a clone kept by the test can break the store after it
/// has been moved into a controller.
#[derive(Clone, Debug, Default)]
pub struct Failing {
    inner: Memory,
    budget: Rc<Cell<Option<usize>>>,
}

impl Failing {
    /// Allow `writes` more successful writes, then fail every one after.
    pub fn fail_after(&self, writes: usize) {
        self.budget.set(Some(writes));
    }

    pub fn heal(&self) {
        self.budget.set(None);
    }
}

impl Store for Failing {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        match self.budget.get() {
            Some(0) => bail!("store unavailable"),
            Some(left) => self.budget.set(Some(left - 1)),
            None => {}
        }
        self.inner.set(key, value)
    }
}

/// Controller over the team catalog that resolves reveals with `picks`.
pub fn controller<S: Store>(store: S, picks: &[usize]) -> RoundController<S, Scripted> {
    RoundController::new(team_catalog(), store, Scripted::new(picks))
        .expect("store accepts the initial load")
}
