//! Column and group types.
//!
//! A column's root-level sequence interleaves ungrouped items and groups:
//! a group's `order_index` and an ungrouped item's `row_index` share one
//! index space, gap-free `0..N-1` after any successful mutation.

use super::color::EntityColor;
use super::ids::{BoardId, ColumnId, GroupId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A column on a board.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    #[serde(skip)]
    pub id: ColumnId,
    pub board_id: BoardId,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub color: EntityColor,
    /// Position among sibling columns of the board.
    pub order_index: usize,
    pub created_at: DateTime<Utc>,
}

impl Column {
    /// Create a column at the given position.
    pub fn new(board_id: BoardId, order_index: usize, color: EntityColor) -> Self {
        Self {
            id: ColumnId::default(),
            board_id,
            name: String::new(),
            description: None,
            color,
            order_index,
            created_at: Utc::now(),
        }
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A group: a sub-container of items inside a column.
///
/// Groups cannot nest. Deleting a group does not delete its items; they
/// are spliced back into the column's root sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    #[serde(skip)]
    pub id: GroupId,
    pub column_id: ColumnId,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub color: EntityColor,
    /// Position in the column's root-level entry space.
    pub order_index: usize,
    pub created_at: DateTime<Utc>,
}

impl Group {
    /// Create a group at the given root-level position.
    pub fn new(column_id: ColumnId, order_index: usize, color: EntityColor) -> Self {
        Self {
            id: GroupId::default(),
            column_id,
            name: String::new(),
            description: None,
            color,
            order_index,
            created_at: Utc::now(),
        }
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
