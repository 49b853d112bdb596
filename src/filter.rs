use crate::model::work_item::WorkItem;

const NOT_DONE: &str = "False";

/// Items sitting in `column_name` whose done flag is still "False".
/// Items without a board column or done flag never match.
pub fn select_pending(items: &[WorkItem], column_name: &str) -> Vec<WorkItem> {
    items
        .iter()
        .filter(|item| {
            item.board_column.as_deref() == Some(column_name)
                && item.board_column_done.as_deref() == Some(NOT_DONE)
        })
        .cloned()
        .collect()
}
