//! Item (card) type.

use super::ids::{ColumnId, GroupId, ItemId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A card. Always belongs to one column; optionally to one group within
/// that column.
///
/// `row_index` is scoped to the item's container: group-local when
/// `group_id` is set, otherwise the column's root-level entry space
/// (shared with groups' `order_index`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    #[serde(skip)]
    pub id: ItemId,
    pub column_id: ColumnId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<GroupId>,
    #[serde(default)]
    pub description: String,
    pub row_index: usize,
    pub created_at: DateTime<Utc>,
}

impl Item {
    /// Create an ungrouped item at the given root-level position.
    pub fn new(column_id: ColumnId, row_index: usize) -> Self {
        Self {
            id: ItemId::default(),
            column_id,
            group_id: None,
            description: String::new(),
            row_index,
            created_at: Utc::now(),
        }
    }

    /// Place the item inside a group of its column.
    pub fn in_group(mut self, group_id: GroupId) -> Self {
        self.group_id = Some(group_id);
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Whether the item sits in the column's root-level sequence.
    pub fn is_root_level(&self) -> bool {
        self.group_id.is_none()
    }
}
