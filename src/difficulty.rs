//! Difficulty tiers and the search depth each one plays at

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tier {
    pub name: String,
    pub depth: usize,
}

impl Tier {
    pub fn new(name: &str, depth: usize) -> Self {
        Self {
            name: name.to_string(),
            depth,
        }
    }
}

/// Picks a tier either by 1-based ordinal or by name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TierSelector {
    Ordinal(usize),
    Name(String),
}

impl FromStr for TierSelector {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Ok(match s.parse::<usize>() {
            Ok(ordinal) => TierSelector::Ordinal(ordinal),
            Err(_) => TierSelector::Name(s.to_string()),
        })
    }
}

impl fmt::Display for TierSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TierSelector::Ordinal(ordinal) => write!(f, "{}", ordinal),
            TierSelector::Name(name) => write!(f, "{}", name),
        }
    }
}

/// Ordered difficulty tiers, easiest first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyTable {
    pub tiers: Vec<Tier>,
}

impl Default for DifficultyTable {
    fn default() -> Self {
        Self {
            tiers: vec![
                Tier::new("easy", 2),
                Tier::new("medium", 4),
                Tier::new("hard", 5),
            ],
        }
    }
}

impl DifficultyTable {
    /// Resolves a tier, failing on anything not in the table
    pub fn select(&self, selector: &TierSelector) -> Result<&Tier, ConfigError> {
        let tier = match selector {
            TierSelector::Ordinal(ordinal) => ordinal
                .checked_sub(1)
                .and_then(|index| self.tiers.get(index)),
            TierSelector::Name(name) => self
                .tiers
                .iter()
                .find(|tier| tier.name.eq_ignore_ascii_case(name)),
        };
        tier.ok_or_else(|| ConfigError::UnknownTier(selector.to_string()))
    }

    /// The search depth for a tier
    pub fn depth(&self, selector: &TierSelector) -> Result<usize, ConfigError> {
        self.select(selector).map(|tier| tier.depth)
    }

    /// The name of the first tier playing at `depth`, if any
    pub fn name_for_depth(&self, depth: usize) -> Option<&str> {
        self.tiers
            .iter()
            .find(|tier| tier.depth == depth)
            .map(|tier| tier.name.as_str())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tiers.is_empty() {
            return Err(ConfigError::Validation(
                "difficulty.tiers must not be empty".into(),
            ));
        }
        for (index, tier) in self.tiers.iter().enumerate() {
            if tier.name.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "difficulty tier {} has an empty name",
                    index + 1
                )));
            }
            if tier.name.parse::<usize>().is_ok() {
                return Err(ConfigError::Validation(format!(
                    "difficulty tier name '{}' must not be a number",
                    tier.name
                )));
            }
            if tier.depth == 0 {
                return Err(ConfigError::Validation(format!(
                    "difficulty tier '{}' must have a depth > 0",
                    tier.name
                )));
            }
            if self.tiers[..index]
                .iter()
                .any(|other| other.name.eq_ignore_ascii_case(&tier.name))
            {
                return Err(ConfigError::Validation(format!(
                    "difficulty tier '{}' is defined twice",
                    tier.name
                )));
            }
        }
        if self.tiers.windows(2).any(|pair| pair[1].depth < pair[0].depth) {
            return Err(ConfigError::Validation(
                "difficulty tiers must be ordered by non-decreasing depth".into(),
            ));
        }
        Ok(())
    }
}
