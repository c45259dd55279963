use serde::Serialize;
use utoipa::ToSchema;

use super::non_negative;

/// Recorded plus on-chain funding for one project.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct FundingSnapshot {
    /// Amount recorded in the database
    pub recorded: f64,
    /// Live balance read from the project's funding contract
    pub onchain: f64,
    /// `recorded + onchain`
    pub total: f64,
    pub target: f64,
    /// Unclamped; over-funded projects report more than 100
    pub percentage: f64,
    /// Percentage clamped to 0..=100 and truncated to one decimal
    pub display_percentage: f64,
}

impl FundingSnapshot {
    pub fn is_fully_funded(&self) -> bool {
        self.target > 0.0 && self.total >= self.target
    }
}

/// Combine the recorded amount with the live balance. A zero target yields 0%.
pub fn aggregate_funding(recorded: f64, onchain: f64, target: f64) -> FundingSnapshot {
    let recorded = non_negative(recorded);
    let onchain = non_negative(onchain);
    let total = recorded + onchain;
    let percentage = funding_percentage(total, target);

    FundingSnapshot {
        recorded,
        onchain,
        total,
        target: non_negative(target),
        percentage,
        display_percentage: display_percentage(percentage),
    }
}

/// `total / target * 100`, or 0 when the target is not positive.
pub fn funding_percentage(total: f64, target: f64) -> f64 {
    if !(target.is_finite() && target > 0.0) {
        return 0.0;
    }
    let pct = non_negative(total) * 100.0 / target;
    if pct.is_finite() {
        pct
    } else {
        0.0
    }
}

pub fn display_percentage(percentage: f64) -> f64 {
    let clamped = non_negative(percentage).min(100.0);
    (clamped * 10.0).trunc() / 10.0
}
