use serde::Deserialize;
use tracing::{info, warn};

use crate::error::HandlerError;
use crate::filter;
use crate::linker;
use crate::model::event::PullRequestEvent;
use crate::model::summary::MoveSummary;
use crate::providers::Provider;
use crate::transition;

/// Query parameters of the service hook subscription URL.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MoveParams {
    /// Display name of the column, e.g. `Merge request`.
    #[serde(rename = "kanbanColumnName")]
    pub kanban_column_name: Option<String>,
    /// Field reference prefix of the column, e.g. `WEF_CB8F301F2BD24E83BDFE30BD10998325`.
    #[serde(rename = "kanbanColumnId")]
    pub kanban_column_id: Option<String>,
}

impl MoveParams {
    fn require(&self) -> Result<(&str, &str), HandlerError> {
        fn present(value: &Option<String>) -> Option<&str> {
            value.as_deref().filter(|s| !s.trim().is_empty())
        }

        match (
            present(&self.kanban_column_name),
            present(&self.kanban_column_id),
        ) {
            (Some(name), Some(id)) => Ok((name, id)),
            (None, Some(_)) => Err(HandlerError::invalid(
                "Missing kanbanColumnName query parameter",
            )),
            (Some(_), None) => Err(HandlerError::invalid(
                "Missing kanbanColumnId query parameter",
            )),
            (None, None) => Err(HandlerError::invalid(
                "Missing kanbanColumnName and kanbanColumnId query parameters",
            )),
        }
    }
}

/// Runs one webhook delivery end to end. Validation happens in a fixed order
/// and nothing is sent to the provider until all of it has passed.
pub async fn handle(
    provider: &dyn Provider,
    params: &MoveParams,
    body: &[u8],
) -> Result<MoveSummary, HandlerError> {
    let (column_name, column_id) = params.require()?;

    let event = PullRequestEvent::parse(body)
        .map_err(|e| HandlerError::invalid(format!("Malformed pull request payload: {e}")))?;

    if !event.is_merged_and_completed() {
        return Err(HandlerError::invalid(
            "Pull request is not merged or not completed",
        ));
    }

    let ids =
        linker::linked_work_item_ids(provider, &event.repository_id, event.pull_request_id).await?;
    let items = linker::fetch_all(provider, &ids).await?;
    let pending = filter::select_pending(&items, column_name);
    let outcomes = transition::move_all(provider, pending, column_name, column_id).await;

    let summary = MoveSummary::from_outcomes(&outcomes);
    for failed in &summary.failed {
        warn!(
            work_item_id = failed.id,
            column = column_name,
            reason = %failed.reason,
            "work item left in column"
        );
    }
    info!(
        provider = provider.name(),
        repository_id = %event.repository_id,
        pull_request_id = event.pull_request_id,
        "{summary}"
    );
    Ok(summary)
}
