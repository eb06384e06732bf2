//! Pool calculator.
//!
//! Pure functions over a ledger snapshot: per-option totals, pari-mutuel odds and payouts.
//! Odds are kept as an exact `pool_total / option_total` fraction so payouts can be floored
//! with integer arithmetic; the float ratio is only for display.

use std::fmt;

use pollbet_types::Bet;

/// Tokens staked on one option.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionTotal {
    pub option: String,
    pub amount: u64,
}

/// Per-option totals in the order each option first received a bet.
///
/// Options without bets are absent rather than zero-valued.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    totals: Vec<OptionTotal>,
}

impl Summary {
    pub fn get(&self, option: &str) -> Option<u64> {
        self.totals
            .iter()
            .find(|t| t.option == option)
            .map(|t| t.amount)
    }

    /// Sum over every option.
    pub fn total(&self) -> u64 {
        self.totals
            .iter()
            .fold(0u64, |acc, t| acc.saturating_add(t.amount))
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OptionTotal> {
        self.totals.iter()
    }

    /// Share of the pool backing `option`, as a percentage rounded to one decimal.
    pub fn share_percent(&self, option: &str) -> Option<f64> {
        let amount = self.get(option)?;
        let total = self.total();
        if total == 0 {
            return None;
        }
        Some(round_to_tenth(amount as f64 / total as f64 * 100.0))
    }
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Group bet amounts by option.
pub fn summarize<'a>(bets: impl IntoIterator<Item = &'a Bet>) -> Summary {
    let mut totals: Vec<OptionTotal> = Vec::new();
    for bet in bets {
        match totals.iter_mut().find(|t| t.option == bet.option) {
            Some(total) => total.amount = total.amount.saturating_add(bet.amount),
            None => totals.push(OptionTotal {
                option: bet.option.clone(),
                amount: bet.amount,
            }),
        }
    }
    Summary { totals }
}

/// Pari-mutuel odds for one option: the whole pool over the option's share.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Odds {
    pool_total: u64,
    option_total: u64,
}

impl Odds {
    /// Returns `None` when nothing backs the option.
    pub fn new(pool_total: u64, option_total: u64) -> Option<Self> {
        if option_total == 0 || pool_total < option_total {
            return None;
        }
        Some(Self {
            pool_total,
            option_total,
        })
    }

    pub fn pool_total(&self) -> u64 {
        self.pool_total
    }

    pub fn option_total(&self) -> u64 {
        self.option_total
    }

    pub fn ratio(&self) -> f64 {
        self.pool_total as f64 / self.option_total as f64
    }
}

impl fmt::Display for Odds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{:.2}", self.ratio())
    }
}

/// Odds for every option present in a summary, in summary order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OddsTable {
    entries: Vec<(String, Odds)>,
}

impl OddsTable {
    pub fn get(&self, option: &str) -> Option<Odds> {
        self.entries
            .iter()
            .find(|(o, _)| o == option)
            .map(|(_, odds)| *odds)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Odds)> {
        self.entries.iter().map(|(o, odds)| (o.as_str(), *odds))
    }
}

/// Compute odds for each option in `summary`. An empty summary yields an empty table.
pub fn odds(summary: &Summary) -> OddsTable {
    let total = summary.total();
    let entries = summary
        .iter()
        .filter_map(|t| Odds::new(total, t.amount).map(|odds| (t.option.clone(), odds)))
        .collect();
    OddsTable { entries }
}

/// `floor(amount * odds)`. Fractional tokens stay with the house.
pub fn payout(amount: u64, odds: Odds) -> u64 {
    let scaled = amount as u128 * odds.pool_total as u128 / odds.option_total as u128;
    u64::try_from(scaled).unwrap_or(u64::MAX)
}

/// One row of the live distribution view.
#[derive(Clone, Debug, PartialEq)]
pub struct DistributionLine {
    pub option: String,
    pub tokens: u64,
    pub share_percent: f64,
    pub odds: Odds,
}

impl fmt::Display for DistributionLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Option {}: {} tokens ({:.1}%) | Odds: {}",
            self.option, self.tokens, self.share_percent, self.odds
        )
    }
}

/// Distribution rows for every option with bets.
pub fn distribution(summary: &Summary) -> Vec<DistributionLine> {
    let table = odds(summary);
    summary
        .iter()
        .filter_map(|t| {
            Some(DistributionLine {
                option: t.option.clone(),
                tokens: t.amount,
                share_percent: summary.share_percent(&t.option)?,
                odds: table.get(&t.option)?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn team_ledger() -> Vec<Bet> {
        vec![
            Bet::new("Alice", "Team Red", 40),
            Bet::new("Bob", "Team Blue", 60),
        ]
    }

    #[test]
    fn test_summarize_groups_by_option() {
        let bets = vec![
            Bet::new("Alice", "Yes", 10),
            Bet::new("Bob", "No", 5),
            Bet::new("Cara", "Yes", 15),
        ];
        let summary = summarize(&bets);

        assert_eq!(summary.get("Yes"), Some(25));
        assert_eq!(summary.get("No"), Some(5));
        assert_eq!(summary.get("Maybe"), None);
        assert_eq!(summary.total(), 30);
        let order: Vec<_> = summary.iter().map(|t| t.option.as_str()).collect();
        assert_eq!(order, vec!["Yes", "No"]);
    }

    #[test]
    fn test_empty_ledger_has_no_odds() {
        let summary = summarize(std::iter::empty::<&Bet>());
        assert!(summary.is_empty());
        assert!(odds(&summary).is_empty());
        assert!(distribution(&summary).is_empty());
        assert_eq!(summary.share_percent("Yes"), None);
    }

    #[test]
    fn test_team_odds() {
        let summary = summarize(&team_ledger());
        let table = odds(&summary);

        let red = table.get("Team Red").unwrap();
        let blue = table.get("Team Blue").unwrap();
        assert_eq!(red.ratio(), 2.5);
        assert!((blue.ratio() - 1.667).abs() < 0.001);
        assert_eq!(red.to_string(), "x2.50");
        assert_eq!(blue.to_string(), "x1.67");
    }

    #[test]
    fn test_payout_truncates() {
        let summary = summarize(&team_ledger());
        let table = odds(&summary);

        assert_eq!(payout(40, table.get("Team Red").unwrap()), 100);
        // 60 * 100 / 60 is exact, 59 * 100 / 60 = 98.33.. floors to 98.
        assert_eq!(payout(60, table.get("Team Blue").unwrap()), 100);
        assert_eq!(payout(59, table.get("Team Blue").unwrap()), 98);
    }

    #[test]
    fn test_payout_exact_where_float_would_undershoot() {
        // 100 / 30 * 30 in f64 is not exactly 100.
        let odds = Odds::new(100, 30).unwrap();
        assert_eq!(payout(30, odds), 100);
        let odds = Odds::new(10, 3).unwrap();
        assert_eq!(payout(3, odds), 10);
    }

    #[test]
    fn test_odds_requires_backing() {
        assert_eq!(Odds::new(100, 0), None);
        assert_eq!(Odds::new(10, 20), None);
    }

    #[test]
    fn test_distribution_lines() {
        let summary = summarize(&team_ledger());
        let lines: Vec<String> = distribution(&summary)
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            lines,
            vec![
                "Option Team Red: 40 tokens (40.0%) | Odds: x2.50",
                "Option Team Blue: 60 tokens (60.0%) | Odds: x1.67",
            ]
        );
    }

    #[test]
    fn test_share_percent_rounds_to_tenth() {
        let bets = vec![
            Bet::new("A", "x", 1),
            Bet::new("B", "y", 1),
            Bet::new("C", "z", 1),
        ];
        let summary = summarize(&bets);
        assert_eq!(summary.share_percent("x"), Some(33.3));
    }

    fn arb_bets() -> impl Strategy<Value = Vec<Bet>> {
        prop::collection::vec(
            (0usize..4, 0usize..4, 1u64..10_000),
            0..40,
        )
        .prop_map(|raw| {
            raw.into_iter()
                .map(|(player, option, amount)| {
                    Bet::new(format!("p{player}"), format!("opt{option}"), amount)
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_summary_total_matches_ledger(bets in arb_bets()) {
            let summary = summarize(&bets);
            let staked: u64 = bets.iter().map(|b| b.amount).sum();
            let grouped: u64 = summary.iter().map(|t| t.amount).sum();
            prop_assert_eq!(grouped, staked);
            prop_assert_eq!(summary.total(), staked);
            prop_assert!(summary.iter().all(|t| t.amount > 0));
        }

        #[test]
        fn prop_odds_times_share_is_total(bets in arb_bets()) {
            let summary = summarize(&bets);
            let table = odds(&summary);
            let total = summary.total() as f64;
            for t in summary.iter() {
                let ratio = table.get(&t.option).unwrap().ratio();
                prop_assert!((ratio * t.amount as f64 - total).abs() < 1e-6 * total.max(1.0));
                prop_assert!(ratio >= 1.0);
            }
        }

        #[test]
        fn prop_payout_is_floor_of_stake_times_odds(
            amount in 1u64..1_000_000,
            option_total in 1u64..1_000_000,
            extra in 0u64..1_000_000,
        ) {
            let odds = Odds::new(option_total + extra, option_total).unwrap();
            let paid = payout(amount, odds);
            let exact = amount as u128 * odds.pool_total() as u128;
            // paid <= amount * odds < paid + 1
            prop_assert!(paid as u128 * option_total as u128 <= exact);
            prop_assert!((paid as u128 + 1) * option_total as u128 > exact);
            prop_assert!(paid >= amount);
        }
    }
}
