//! Key-value persistence port
//!
//! The game only ever stores non-negative integers as decimal strings, one per
//! key. Backends implement [`Store`]; the browser's LocalStorage lives in
//! `platform::storage`, and [`MemoryStore`] backs tests and the headless run.
//!
//! Reads never fail: a missing or malformed value reads as 0.

pub mod keys;

use std::collections::BTreeMap;

/// Durable string key-value store
pub trait Store {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: &str);

    /// Write several related values together.
    ///
    /// Backends that can commit atomically should override this; the default
    /// writes them in order.
    fn set_many(&mut self, entries: &[(&str, String)]) {
        for (key, value) in entries {
            self.set(key, value);
        }
    }
}

/// In-memory store (tests, native runs)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys written so far
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}

/// Parse the leading integer of a string: optional whitespace, optional sign,
/// then digits. Anything else stops the scan. Returns `None` when no digit is
/// found.
pub fn parse_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut value: i64 = 0;
    let mut seen = false;
    for b in digits.bytes() {
        if !b.is_ascii_digit() {
            break;
        }
        seen = true;
        value = value.saturating_mul(10).saturating_add(i64::from(b - b'0'));
    }

    seen.then_some(if negative { -value } else { value })
}

/// Read a count; absent, malformed or negative values read as 0
pub fn read_u64(store: &dyn Store, key: &str) -> u64 {
    store
        .get(key)
        .and_then(|raw| parse_int(&raw))
        .map(|v| v.max(0) as u64)
        .unwrap_or(0)
}

/// Write a count as a decimal string
pub fn write_u64(store: &mut dyn Store, key: &str, value: u64) {
    store.set(key, &value.to_string());
}
