use serde::Serialize;

const BOARD_COLUMN_FIELD: &str = "System.BoardColumn";
const COLUMN_DONE_SUFFIX: &str = "_Kanban.Column.Done";
const DONE_VALUE: &str = "True";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchOp {
    Test,
    Replace,
}

/// One JSON Patch operation on a work item field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatchOperation {
    pub op: PatchOp,
    pub path: String,
    pub value: String,
}

/// Flip the done flag of `column_name` for one work item, provided the item
/// is still in that column when the provider applies the patch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionRequest {
    pub work_item_id: u64,
    pub column_name: String,
    pub column_id: String,
}

impl TransitionRequest {
    pub fn new(work_item_id: u64, column_name: &str, column_id: &str) -> Self {
        Self {
            work_item_id,
            column_name: column_name.to_string(),
            column_id: column_id.to_string(),
        }
    }

    /// Field reference of the column's done flag, e.g. `WEF_1A2B_Kanban.Column.Done`.
    pub fn done_field(&self) -> String {
        format!("{}{COLUMN_DONE_SUFFIX}", self.column_id)
    }

    /// The test must come first: the provider rejects the whole document when
    /// the item has left the column, so the replace is never applied on its own.
    pub fn patch_document(&self) -> Vec<PatchOperation> {
        vec![
            PatchOperation {
                op: PatchOp::Test,
                path: format!("/fields/{BOARD_COLUMN_FIELD}"),
                value: self.column_name.clone(),
            },
            PatchOperation {
                op: PatchOp::Replace,
                path: format!("/fields/{}", self.done_field()),
                value: DONE_VALUE.to_string(),
            },
        ]
    }
}
