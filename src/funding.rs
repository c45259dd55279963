use crate::calc::{self, FundingSnapshot};
use crate::clients::ChainClient;
use crate::entities::projects;

/// Live balance of the project's funding contract. Unavailable reads count as zero.
pub async fn onchain_balance(chain: Option<&ChainClient>, project: &projects::Model) -> Option<f64> {
    let (chain, contract) = match (chain, project.funding_contract.as_deref()) {
        (Some(chain), Some(contract)) => (chain, contract),
        _ => return None,
    };

    match chain.get_balance(contract).await {
        Ok(balance) => Some(balance),
        Err(e) => {
            tracing::warn!("Balance read for project {} failed: {}", project.id, e);
            None
        }
    }
}

/// Recorded funding plus whatever the funding contract currently holds.
pub async fn project_funding(chain: Option<&ChainClient>, project: &projects::Model) -> (FundingSnapshot, bool) {
    let balance = onchain_balance(chain, project).await;
    let snapshot = calc::aggregate_funding(
        project.current_funding,
        balance.unwrap_or(0.0),
        project.funding_target,
    );
    (snapshot, balance.is_some())
}
