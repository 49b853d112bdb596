pub mod azure_devops;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::config::AzureDevOpsConfig;
use crate::model::patch::TransitionRequest;
use crate::model::work_item::WorkItem;

/// Read and patch access to a work-tracking service.
#[async_trait]
pub trait Provider: Send + Sync {
    fn name(&self) -> &str;

    /// Ids of the work items linked to a pull request. Empty when nothing is linked.
    async fn linked_work_item_ids(&self, repository_id: &str, pull_request_id: u64)
        -> Result<Vec<u64>>;

    async fn fetch_work_item(&self, id: u64) -> Result<WorkItem>;

    /// Sends the conditional patch. An error means the provider did not apply it.
    async fn move_to_done(&self, request: &TransitionRequest) -> Result<()>;
}


pub fn create_provider(config: &AzureDevOpsConfig) -> Result<Arc<dyn Provider>> {
    let provider = azure_devops::AzureDevOpsProvider::new(
        config.base_url()?,
        &config.personal_access_token,
    );
    Ok(Arc::new(provider))
}
