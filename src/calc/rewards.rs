//! Staking reward and royalty estimates.
//!
//! | Tier            | Minimum stake | Royalty share |
//! |-----------------|---------------|---------------|
//! | Basic Supporter | 100           | 0.5%          |
//! | Premium Backer  | 1,000         | 1.2%          |
//! | VIP Investor    | 5,000         | 2.0%          |

use serde::Serialize;
use utoipa::ToSchema;

use super::non_negative;

pub const DAYS_PER_YEAR: f64 = 365.0;

/// Share of the stake assumed to come back as yearly revenue for royalty estimates
pub const ASSUMED_REVENUE_RATIO: f64 = 0.30;

/// Royalty share (percent) applied when the stake is below every tier
pub const BASE_ROYALTY_SHARE: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RoyaltyTier {
    pub name: &'static str,
    pub min_stake: f64,
    /// Percent of yearly revenue paid to the staker
    pub royalty_share: f64,
}

/// Ordered by ascending minimum stake.
pub const ROYALTY_TIERS: [RoyaltyTier; 3] = [
    RoyaltyTier {
        name: "Basic Supporter",
        min_stake: 100.0,
        royalty_share: 0.5,
    },
    RoyaltyTier {
        name: "Premium Backer",
        min_stake: 1000.0,
        royalty_share: 1.2,
    },
    RoyaltyTier {
        name: "VIP Investor",
        min_stake: 5000.0,
        royalty_share: 2.0,
    },
];

/// Simple pro-rated reward: `principal * apy/100 * lockup_days/365`. No compounding.
pub fn estimate_reward(principal: f64, apy: f64, lockup_days: u32) -> f64 {
    non_negative(principal) * (non_negative(apy) / 100.0) * (f64::from(lockup_days) / DAYS_PER_YEAR)
}

/// Highest tier whose minimum the stake reaches.
pub fn select_tier(stake: f64) -> Option<&'static RoyaltyTier> {
    let stake = non_negative(stake);
    ROYALTY_TIERS.iter().rev().find(|tier| stake >= tier.min_stake)
}

pub fn royalty_share(stake: f64) -> f64 {
    select_tier(stake)
        .map(|tier| tier.royalty_share)
        .unwrap_or(BASE_ROYALTY_SHARE)
}

pub fn estimate_royalty(stake: f64) -> f64 {
    let annual_revenue = non_negative(stake) * ASSUMED_REVENUE_RATIO;
    annual_revenue * royalty_share(stake) / 100.0
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RewardEstimate {
    pub principal: f64,
    pub apy: f64,
    pub lockup_days: u32,
    /// Pro-rated staking reward over the lockup period
    pub reward: f64,
    /// Name of the royalty tier the principal qualifies for, if any
    pub tier: Option<String>,
    pub royalty_share: f64,
    /// Estimated yearly royalty income
    pub royalty: f64,
}

pub fn estimate(principal: f64, apy: f64, lockup_days: u32) -> RewardEstimate {
    RewardEstimate {
        principal: non_negative(principal),
        apy: non_negative(apy),
        lockup_days,
        reward: estimate_reward(principal, apy, lockup_days),
        tier: select_tier(principal).map(|tier| tier.name.to_string()),
        royalty_share: royalty_share(principal),
        royalty: estimate_royalty(principal),
    }
}
