use serde::{Deserialize, Serialize};
use std::fmt;

/// Interaction overlay applied on top of the default style.
///
/// States are mutually exclusive per lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InteractionState {
    #[default]
    Default,
    Hover,
    Focus,
    Active,
    Visited,
}

impl InteractionState {
    pub const ALL: [InteractionState; 5] = [
        InteractionState::Default,
        InteractionState::Hover,
        InteractionState::Focus,
        InteractionState::Active,
        InteractionState::Visited,
    ];

    pub fn is_default(self) -> bool {
        self == InteractionState::Default
    }

    /// CSS pseudo-class selector suffix (empty for the default state)
    pub fn pseudo_class(self) -> &'static str {
        match self {
            InteractionState::Default => "",
            InteractionState::Hover => ":hover",
            InteractionState::Focus => ":focus",
            InteractionState::Active => ":active",
            InteractionState::Visited => ":visited",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            InteractionState::Default => "default",
            InteractionState::Hover => "hover",
            InteractionState::Focus => "focus",
            InteractionState::Active => "active",
            InteractionState::Visited => "visited",
        }
    }
}

impl fmt::Display for InteractionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for InteractionState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InteractionState::ALL
            .into_iter()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| format!("unknown interaction state: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        for state in InteractionState::ALL {
            let parsed: InteractionState = state.to_string().parse().unwrap();
            assert_eq!(parsed, state);
        }
        assert!("pressed".parse::<InteractionState>().is_err());
    }

    #[test]
    fn test_pseudo_classes() {
        assert_eq!(InteractionState::Default.pseudo_class(), "");
        assert_eq!(InteractionState::Hover.pseudo_class(), ":hover");
    }
}
