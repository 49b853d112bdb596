use std::collections::HashSet;

use anyhow::{Context, Result};
use futures::future::try_join_all;
use tracing::debug;

use crate::model::work_item::WorkItem;
use crate::providers::Provider;

pub async fn linked_work_item_ids(
    provider: &dyn Provider,
    repository_id: &str,
    pull_request_id: u64,
) -> Result<Vec<u64>> {
    let ids = provider
        .linked_work_item_ids(repository_id, pull_request_id)
        .await
        .with_context(|| {
            format!("Failed to list work items linked to pull request {pull_request_id}")
        })?;
    debug!(repository_id, pull_request_id, count = ids.len(), "linked work items");
    Ok(ids)
}

/// Fetches every id concurrently. The first failure aborts the whole batch.
pub async fn fetch_all(provider: &dyn Provider, ids: &[u64]) -> Result<Vec<WorkItem>> {
    let mut seen = HashSet::new();
    let unique: Vec<u64> = ids.iter().copied().filter(|id| seen.insert(*id)).collect();

    try_join_all(unique.into_iter().map(|id| async move {
        provider
            .fetch_work_item(id)
            .await
            .with_context(|| format!("Failed to fetch work item {id}"))
    }))
    .await
}
