//! Named viewport ranges, each carrying its own override layer.

use serde::{Deserialize, Serialize};

pub type BreakpointId = String;

/// Id of the breakpoint every other layer falls back to
pub const BASE_BREAKPOINT: &str = "base";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Breakpoint {
    pub id: BreakpointId,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_width: Option<u32>,
}

impl Breakpoint {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            min_width: None,
            max_width: None,
        }
    }

    pub fn base() -> Self {
        Self::new(BASE_BREAKPOINT, "Base")
    }

    pub fn with_min_width(mut self, px: u32) -> Self {
        self.min_width = Some(px);
        self
    }

    pub fn with_max_width(mut self, px: u32) -> Self {
        self.max_width = Some(px);
        self
    }

    pub fn is_base(&self) -> bool {
        self.id == BASE_BREAKPOINT
    }

    /// Whether a viewport of `width` pixels falls inside this range
    pub fn matches(&self, width: u32) -> bool {
        self.min_width.map_or(true, |min| width >= min)
            && self.max_width.map_or(true, |max| width <= max)
    }

    /// Width of the range, unbounded sides count as `u32::MAX`
    fn span(&self) -> u64 {
        let min = self.min_width.unwrap_or(0) as u64;
        let max = self.max_width.unwrap_or(u32::MAX) as u64;
        max.saturating_sub(min)
    }

    /// CSS media query for this range, `None` for an unbounded range
    pub fn media_query(&self) -> Option<String> {
        match (self.min_width, self.max_width) {
            (None, None) => None,
            (Some(min), None) => Some(format!("(min-width: {}px)", min)),
            (None, Some(max)) => Some(format!("(max-width: {}px)", max)),
            (Some(min), Some(max)) => Some(format!(
                "(min-width: {}px) and (max-width: {}px)",
                min, max
            )),
        }
    }
}

/// Default breakpoint set for new documents (desktop-first)
pub fn default_breakpoints() -> Vec<Breakpoint> {
    vec![
        Breakpoint::base(),
        Breakpoint::new("tablet", "Tablet").with_max_width(991),
        Breakpoint::new("mobile-landscape", "Mobile landscape").with_max_width(767),
        Breakpoint::new("mobile", "Mobile portrait").with_max_width(478),
    ]
}

/// Pick the narrowest breakpoint whose range contains `width`.
///
/// Falls back to the base breakpoint id when nothing matches.
pub fn breakpoint_for_width(breakpoints: &[Breakpoint], width: u32) -> &str {
    breakpoints
        .iter()
        .filter(|bp| bp.matches(width))
        .min_by_key(|bp| bp.span())
        .map(|bp| bp.id.as_str())
        .unwrap_or(BASE_BREAKPOINT)
}
