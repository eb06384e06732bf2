//! String encodings for values kept in the persistent store.
//!
//! Decoding never fails loudly: a value that does not parse is reported as `None` and the
//! caller substitutes its default.

use super::{Ledger, PlayerStats};

/// A value that can be written to and read back from a string-valued store entry.
pub trait StoreCodec: Sized {
    fn encode_value(&self) -> String;
    fn decode_value(raw: &str) -> Option<Self>;
}

impl StoreCodec for Ledger {
    fn encode_value(&self) -> String {
        // A Vec of plain structs always serializes.
        serde_json::to_string(self).unwrap_or_else(|_| "[]".to_string())
    }

    fn decode_value(raw: &str) -> Option<Self> {
        let ledger: Ledger = serde_json::from_str(raw).ok()?;
        // Stored state is user-editable; zero-amount bets never come from placement.
        ledger.iter().all(|bet| bet.amount > 0).then_some(ledger)
    }
}

impl StoreCodec for PlayerStats {
    fn encode_value(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    fn decode_value(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }
}

impl StoreCodec for u64 {
    fn encode_value(&self) -> String {
        self.to_string()
    }

    fn decode_value(raw: &str) -> Option<Self> {
        raw.trim().parse().ok()
    }
}

impl StoreCodec for usize {
    fn encode_value(&self) -> String {
        self.to_string()
    }

    fn decode_value(raw: &str) -> Option<Self> {
        raw.trim().parse().ok()
    }
}

impl StoreCodec for bool {
    fn encode_value(&self) -> String {
        self.to_string()
    }

    fn decode_value(raw: &str) -> Option<Self> {
        raw.trim().parse().ok()
    }
}
