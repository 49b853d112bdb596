use futures::future::join_all;
use tracing::info;

use crate::model::patch::TransitionRequest;
use crate::model::work_item::WorkItem;
use crate::providers::Provider;

#[derive(Debug, Clone)]
pub struct TransitionOutcome {
    pub item: WorkItem,
    pub result: Result<(), String>,
}

/// Patches every item concurrently and waits for all of them. Outcomes keep
/// the order of `items`.
pub async fn move_all(
    provider: &dyn Provider,
    items: Vec<WorkItem>,
    column_name: &str,
    column_id: &str,
) -> Vec<TransitionOutcome> {
    join_all(items.into_iter().map(|item| async move {
        let request = TransitionRequest::new(item.id, column_name, column_id);
        let result = match provider.move_to_done(&request).await {
            Ok(()) => {
                info!(
                    work_item_id = item.id,
                    column = column_name,
                    "moved {} to done",
                    item.label()
                );
                Ok(())
            }
            Err(e) => Err(format!("{e:#}")),
        };
        TransitionOutcome { item, result }
    }))
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::tests::{item, MockProvider};

    #[tokio::test]
    async fn sends_one_patch_per_item() {
        let provider = MockProvider::new();
        let items = vec![
            item(1, "A", Some("Merge request"), Some("False")),
            item(2, "B", Some("Merge request"), Some("False")),
        ];

        let outcomes = move_all(&provider, items, "Merge request", "WEF_ABC").await;

        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(|o| o.result.is_ok()));
        let mut patched = provider.patched();
        patched.sort_by_key(|r| r.work_item_id);
        assert_eq!(
            patched,
            vec![
                TransitionRequest::new(1, "Merge request", "WEF_ABC"),
                TransitionRequest::new(2, "Merge request", "WEF_ABC"),
            ]
        );
    }

    #[tokio::test]
    async fn failures_are_collected_not_raised() {
        let provider = MockProvider::new().with_patch_failure(2);
        let items = vec![
            item(1, "A", Some("Merge request"), Some("False")),
            item(2, "B", Some("Merge request"), Some("False")),
        ];

        let outcomes = move_all(&provider, items, "Merge request", "WEF_ABC").await;

        assert_eq!(outcomes[0].item.id, 1);
        assert!(outcomes[0].result.is_ok());
        assert_eq!(outcomes[1].item.id, 2);
        assert!(outcomes[1].result.as_ref().unwrap_err().contains("412"));
    }

    #[tokio::test]
    async fn nothing_selected_sends_nothing() {
        let provider = MockProvider::new();
        let outcomes = move_all(&provider, Vec::new(), "Merge request", "WEF_ABC").await;
        assert!(outcomes.is_empty());
        assert!(provider.patched().is_empty());
    }
}
