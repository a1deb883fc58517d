// Reward entity
// Rank-indexed prize table loaded from configuration

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemQuantity {
    pub item: String,
    pub quantity: u64,
}

impl ItemQuantity {
    pub fn new(item: impl Into<String>, quantity: u64) -> Self {
        Self {
            item: item.into(),
            quantity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardTier {
    pub rank: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<ItemQuantity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diamonds: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl RewardTier {
    pub fn items(rank: u32, items: Vec<ItemQuantity>) -> Self {
        Self {
            rank,
            items,
            diamonds: None,
            label: None,
        }
    }

    pub fn diamonds(rank: u32, amount: u64) -> Self {
        Self {
            rank,
            items: Vec::new(),
            diamonds: Some(amount),
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.diamonds.unwrap_or(0) == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RewardTableError {
    #[error("reward table must define at least one tier")]
    Empty,
    #[error("reward ranks must be contiguous from 1, expected rank {expected} but found {found}")]
    NonContiguous { expected: u32, found: u32 },
    #[error("reward tier for rank {0} grants nothing")]
    EmptyTier(u32),
    #[error("reward tier for rank {rank} has a zero quantity for '{item}'")]
    ZeroQuantity { rank: u32, item: String },
}

/// Immutable rank -> reward mapping. Ranks are 1-based and contiguous, so the
/// number of tiers is also the number of ranked players that win something.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<RewardTier>", into = "Vec<RewardTier>")]
pub struct RewardTable {
    tiers: Vec<RewardTier>,
}

impl RewardTable {
    pub fn new(mut tiers: Vec<RewardTier>) -> Result<Self, RewardTableError> {
        if tiers.is_empty() {
            return Err(RewardTableError::Empty);
        }
        tiers.sort_by_key(|tier| tier.rank);
        for (index, tier) in tiers.iter().enumerate() {
            let expected = index as u32 + 1;
            if tier.rank != expected {
                return Err(RewardTableError::NonContiguous {
                    expected,
                    found: tier.rank,
                });
            }
            if tier.is_empty() {
                return Err(RewardTableError::EmptyTier(tier.rank));
            }
            if let Some(item) = tier.items.iter().find(|item| item.quantity == 0) {
                return Err(RewardTableError::ZeroQuantity {
                    rank: tier.rank,
                    item: item.item.clone(),
                });
            }
        }
        Ok(Self { tiers })
    }

    pub fn tier_count(&self) -> usize {
        self.tiers.len()
    }

    pub fn for_rank(&self, rank: u32) -> Option<&RewardTier> {
        let index = usize::try_from(rank.checked_sub(1)?).ok()?;
        self.tiers.get(index)
    }

    pub fn tiers(&self) -> &[RewardTier] {
        &self.tiers
    }
}

impl TryFrom<Vec<RewardTier>> for RewardTable {
    type Error = RewardTableError;

    fn try_from(value: Vec<RewardTier>) -> Result<Self, Self::Error> {
        RewardTable::new(value)
    }
}

impl From<RewardTable> for Vec<RewardTier> {
    fn from(value: RewardTable) -> Self {
        value.tiers
    }
}
