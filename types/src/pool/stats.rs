use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Cumulative winnings per player. Entries only grow until a full game reset.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerStats {
    winnings: BTreeMap<String, u64>,
}

impl PlayerStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` to `player`'s winnings, creating the entry at zero if needed.
    pub fn credit(&mut self, player: &str, amount: u64) {
        let entry = self.winnings.entry(player.to_string()).or_insert(0);
        *entry = entry.saturating_add(amount);
    }

    pub fn get(&self, player: &str) -> Option<u64> {
        self.winnings.get(player).copied()
    }

    pub fn clear(&mut self) {
        self.winnings.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.winnings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.winnings.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.winnings.iter().map(|(player, total)| (player.as_str(), *total))
    }

    /// Players ranked by descending winnings. Ties keep name order.
    pub fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        let mut entries: Vec<_> = self.iter().collect();
        // BTreeMap iteration is name-ordered and the sort is stable.
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries
            .into_iter()
            .enumerate()
            .map(|(i, (player, winnings))| LeaderboardEntry {
                rank: (i + 1) as u32,
                player: player.to_string(),
                winnings,
            })
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub player: String,
    pub winnings: u64,
}

impl fmt::Display for LeaderboardEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}: {} tokens", self.rank, self.player, self.winnings)
    }
}
