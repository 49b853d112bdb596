use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    pub id: u64,
    pub title: String,
    /// Kanban column the item currently sits in. None when the item is not on a board.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub board_column: Option<String>,
    /// Done flag of the current column, as the provider's "True"/"False" strings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub board_column_done: Option<String>,
}

impl WorkItem {
    /// `Title (id)`, the form used in move summaries.
    pub fn label(&self) -> String {
        format!("{} ({})", self.title, self.id)
    }
}
