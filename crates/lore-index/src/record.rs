use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lore_core::models::{Conflict, ConflictStatus};

/// One audited status transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusChange {
    pub from: ConflictStatus,
    pub to: ConflictStatus,
    pub at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// A conflict plus its operator-controlled state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictRecord {
    pub conflict: Conflict,
    pub status: ConflictStatus,
    #[serde(default)]
    pub history: Vec<StatusChange>,
    /// Present in the latest detection run. Inactive records only keep
    /// their status in case the conflict comes back.
    pub active: bool,
}

impl ConflictRecord {
    pub fn new(conflict: Conflict) -> Self {
        Self {
            conflict,
            status: ConflictStatus::Unresolved,
            history: Vec::new(),
            active: true,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == ConflictStatus::Unresolved
    }

    pub(crate) fn transition(&mut self, to: ConflictStatus, note: Option<&str>) {
        self.history.push(StatusChange {
            from: self.status,
            to,
            at: Utc::now(),
            note: note.map(str::to_string),
        });
        self.status = to;
    }
}
