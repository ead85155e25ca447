//! Auto-naming for style sources: `button-1`, `button-2`, ...
//!
//! One counter per component type. Counters only move forward; a name
//! that is already taken is skipped rather than reissued. A counter that
//! runs out of numbers starts over at 1 and keeps skipping taken names.

use std::collections::HashMap;

const FALLBACK_TYPE: &str = "style";

#[derive(Debug, Clone, Default)]
pub struct NameCounters {
    counters: HashMap<String, u32>,
}

impl NameCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the next free name for `component_type`
    pub fn next_name(&mut self, component_type: &str, is_taken: impl Fn(&str) -> bool) -> String {
        let prefix = normalize_type(component_type);
        let (n, name) = self.peek(&prefix, is_taken);
        self.counters.insert(prefix, n);
        name
    }

    /// What [`next_name`](Self::next_name) would return, without advancing
    pub fn preview_name(&self, component_type: &str, is_taken: impl Fn(&str) -> bool) -> String {
        let prefix = normalize_type(component_type);
        self.peek(&prefix, is_taken).1
    }

    /// Move every counter past the highest suffix found in `names`
    pub fn init_from_existing<'a>(&mut self, names: impl IntoIterator<Item = &'a str>) {
        for name in names {
            if let Some((prefix, n)) = split_generated_name(name) {
                let counter = self.counters.entry(prefix.to_string()).or_insert(0);
                *counter = (*counter).max(n);
            }
        }
    }

    pub fn counter(&self, component_type: &str) -> u32 {
        self.counters
            .get(&normalize_type(component_type))
            .copied()
            .unwrap_or(0)
    }

    fn peek(&self, prefix: &str, is_taken: impl Fn(&str) -> bool) -> (u32, String) {
        let mut n = self.counters.get(prefix).copied().unwrap_or(0);
        loop {
            n = n.checked_add(1).unwrap_or(1);
            let name = format!("{}-{}", prefix, n);
            if !is_taken(&name) {
                return (n, name);
            }
        }
    }
}

/// Lowercase, dash-separated prefix for a component type
pub fn normalize_type(component_type: &str) -> String {
    let normalized: String = component_type
        .trim()
        .chars()
        .map(|c| if c.is_whitespace() || c == '_' { '-' } else { c.to_ascii_lowercase() })
        .collect();

    if normalized.is_empty() {
        FALLBACK_TYPE.to_string()
    } else {
        normalized
    }
}

/// Split `button-12` into `("button", 12)`
pub fn split_generated_name(name: &str) -> Option<(&str, u32)> {
    let (prefix, suffix) = name.rsplit_once('-')?;
    if prefix.is_empty() || suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    suffix.parse().ok().map(|n| (prefix, n))
}
