use super::*;

#[test]
fn test_parse_amount_accepts_positive_integers() {
    assert_eq!(parse_amount("40"), Ok(40));
    assert_eq!(parse_amount("  7 "), Ok(7));
    assert_eq!(parse_amount("1"), Ok(1));
}

#[test]
fn test_parse_amount_rejects_invalid_input() {
    for text in ["", "abc", "0", "-5", "2.5", "12abc", "99999999999999999999999"] {
        assert_eq!(
            parse_amount(text),
            Err(BetError::InvalidBetAmount),
            "input {text:?}"
        );
    }
}

#[test]
fn test_bet_history_line() {
    let bet = Bet::new("Alice", "Team Red", 40);
    assert_eq!(bet.to_string(), r#"Alice bet 40 tokens on "Team Red""#);
}

#[test]
fn test_ledger_recent_is_newest_first() {
    let mut ledger = Ledger::new();
    ledger.push(Bet::new("Alice", "Yes", 10));
    ledger.push(Bet::new("Bob", "No", 20));
    ledger.push(Bet::new("Cara", "Yes", 5));

    let players: Vec<_> = ledger.recent().map(|b| b.player.as_str()).collect();
    assert_eq!(players, vec!["Cara", "Bob", "Alice"]);
    assert_eq!(ledger.staked(), 35);
    assert_eq!(ledger.len(), 3);
}

#[test]
fn test_ledger_store_format() {
    let ledger = Ledger::from(vec![Bet::new("Alice", "Team Red", 40)]);
    let encoded = ledger.encode_value();
    assert_eq!(
        encoded,
        r#"[{"player":"Alice","option":"Team Red","amount":40}]"#
    );
    assert_eq!(Ledger::decode_value(&encoded), Some(ledger));
}

#[test]
fn test_ledger_decode_rejects_garbage() {
    assert_eq!(Ledger::decode_value("not json"), None);
    assert_eq!(Ledger::decode_value(r#"{"player":"x"}"#), None);
    assert_eq!(
        Ledger::decode_value(r#"[{"player":"A","option":"Yes","amount":-3}]"#),
        None
    );
    assert_eq!(
        Ledger::decode_value(r#"[{"player":"A","option":"Yes","amount":0}]"#),
        None
    );
}

#[test]
fn test_scalar_store_values() {
    assert_eq!(u64::decode_value("100"), Some(100));
    assert_eq!(u64::decode_value("-1"), None);
    assert_eq!(u64::decode_value("lots"), None);
    assert_eq!(usize::decode_value(" 2 "), Some(2));
    assert_eq!(bool::decode_value("true"), Some(true));
    assert_eq!(bool::decode_value("yes"), None);
    assert_eq!(42u64.encode_value(), "42");
    assert_eq!(false.encode_value(), "false");
}

#[test]
fn test_player_stats_credit_and_store_format() {
    let mut stats = PlayerStats::new();
    stats.credit("Alice", 100);
    stats.credit("Alice", 25);
    stats.credit("Bob", 60);

    assert_eq!(stats.get("Alice"), Some(125));
    assert_eq!(stats.get("Zed"), None);

    let encoded = stats.encode_value();
    assert_eq!(encoded, r#"{"Alice":125,"Bob":60}"#);
    assert_eq!(PlayerStats::decode_value(&encoded), Some(stats));
    assert_eq!(PlayerStats::decode_value(r#"{"Alice":-4}"#), None);
}

#[test]
fn test_leaderboard_orders_by_winnings() {
    let mut stats = PlayerStats::new();
    stats.credit("Cara", 50);
    stats.credit("Alice", 200);
    stats.credit("Bob", 50);

    let board = stats.leaderboard();
    let order: Vec<_> = board
        .iter()
        .map(|e| (e.rank, e.player.as_str(), e.winnings))
        .collect();
    assert_eq!(
        order,
        vec![(1, "Alice", 200), (2, "Bob", 50), (3, "Cara", 50)]
    );
    assert_eq!(board[0].to_string(), "1. Alice: 200 tokens");
}

#[test]
fn test_default_catalog_is_valid() {
    let catalog = Catalog::default();
    assert!(!catalog.is_empty());
    Catalog::new(catalog.polls().to_vec()).expect("default catalog validates");
}

#[test]
fn test_catalog_step_wraps() {
    let catalog = Catalog::new(vec![
        Poll::new("a", ["1", "2"]),
        Poll::new("b", ["1", "2"]),
        Poll::new("c", ["1", "2"]),
    ])
    .unwrap();

    assert_eq!(catalog.step(0, Direction::Next), 1);
    assert_eq!(catalog.step(2, Direction::Next), 0);
    assert_eq!(catalog.step(0, Direction::Previous), 2);
    assert_eq!(catalog.step(1, Direction::Previous), 0);
}

#[test]
fn test_catalog_rejects_invalid_polls() {
    assert!(matches!(Catalog::new(vec![]), Err(CatalogError::Empty)));
    assert!(matches!(
        Catalog::new(vec![Poll::new("q", ["only"])]),
        Err(CatalogError::TooFewOptions { index: 0, count: 1 })
    ));
    assert!(matches!(
        Catalog::new(vec![Poll::new("q", ["a", "b"]), Poll::new("r", ["x", " "])]),
        Err(CatalogError::BlankOption { index: 1 })
    ));
    assert!(matches!(
        Catalog::new(vec![Poll::new("q", ["a", "a"])]),
        Err(CatalogError::DuplicateOption { index: 0, .. })
    ));
}

#[test]
fn test_catalog_from_json() {
    let catalog = Catalog::from_json(
        r#"[{"question":"Best pet?","options":["Cats","Dogs","Fish"]}]"#,
    )
    .unwrap();
    assert_eq!(catalog.len(), 1);
    let poll = catalog.get(0).unwrap();
    assert!(poll.contains("Dogs"));
    assert!(!poll.contains("dogs"));
    assert_eq!(poll.option(2), Some("Fish"));

    assert!(matches!(
        Catalog::from_json("[{"),
        Err(CatalogError::Malformed(_))
    ));
}
