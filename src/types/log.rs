//! Activity log entries.
//!
//! Every successful mutation appends one JSONL line to
//! `activity/current.jsonl`. Reads return newest first.

use super::ids::ActorId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One recorded mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub at: DateTime<Utc>,
    pub actor: ActorId,
    /// Verb-noun operation name, e.g. `"sync items"`.
    pub op: String,
    /// Primary entity the operation touched, e.g. `"board:3"`.
    pub entity: String,
}

impl LogEntry {
    /// Create an entry stamped with the current time.
    pub fn new(actor: ActorId, op: impl Into<String>, entity: impl Into<String>) -> Self {
        Self {
            at: Utc::now(),
            actor,
            op: op.into(),
            entity: entity.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_entry_roundtrip() {
        let entry = LogEntry::new(ActorId::new(9), "create column", "column:4");
        let line = serde_json::to_string(&entry).unwrap();
        let back: LogEntry = serde_json::from_str(&line).unwrap();
        assert_eq!(back.op, "create column");
        assert_eq!(back.entity, "column:4");
        assert_eq!(back.actor, ActorId::new(9));
    }
}
