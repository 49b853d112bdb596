use std::fmt;

use crate::transition::TransitionOutcome;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovedItem {
    pub id: u64,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedItem {
    pub id: u64,
    pub title: String,
    pub reason: String,
}

/// What one webhook delivery did, in the order the items were selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveSummary {
    pub moved: Vec<MovedItem>,
    pub failed: Vec<FailedItem>,
}

impl MoveSummary {
    pub fn from_outcomes(outcomes: &[TransitionOutcome]) -> Self {
        let mut summary = Self::default();
        for outcome in outcomes {
            match &outcome.result {
                Ok(()) => summary.moved.push(MovedItem {
                    id: outcome.item.id,
                    title: outcome.item.title.clone(),
                }),
                Err(reason) => summary.failed.push(FailedItem {
                    id: outcome.item.id,
                    title: outcome.item.title.clone(),
                    reason: reason.clone(),
                }),
            }
        }
        summary
    }
}

impl fmt::Display for MoveSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.moved.is_empty() {
            write!(f, "No Work Items Moved!")?;
        } else {
            let moved: Vec<String> = self
                .moved
                .iter()
                .map(|m| format!("{} ({})", m.title, m.id))
                .collect();
            write!(f, "Work Items Moved: {}", moved.join(", "))?;
        }

        if !self.failed.is_empty() {
            let failed: Vec<String> = self
                .failed
                .iter()
                .map(|m| format!("{} ({})", m.title, m.id))
                .collect();
            write!(f, "; Failed to move: {}", failed.join(", "))?;
        }

        Ok(())
    }
}
