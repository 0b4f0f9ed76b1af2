//! Response views: full remapped board objects.
//!
//! Storage types keep their id out of the serialized file (it lives in
//! the file stem); views carry ids explicitly and render a column's
//! root-level sequence as one interleaved entry list, which is what
//! clients consume after a mutation.

use crate::state::BoardState;
use crate::types::{
    BoardId, Column, ColumnId, EntityColor, Group, GroupId, Item, ItemId, TeamId,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// An item as emitted to clients.
#[derive(Debug, Clone, Serialize)]
pub struct ItemView {
    pub id: ItemId,
    pub column_id: ColumnId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<GroupId>,
    pub description: String,
    pub row_index: usize,
    pub created_at: DateTime<Utc>,
}

impl ItemView {
    pub fn from_item(item: &Item) -> Self {
        Self {
            id: item.id,
            column_id: item.column_id,
            group_id: item.group_id,
            description: item.description.clone(),
            row_index: item.row_index,
            created_at: item.created_at,
        }
    }
}

/// A group with its items in group-local order.
#[derive(Debug, Clone, Serialize)]
pub struct GroupView {
    pub id: GroupId,
    pub column_id: ColumnId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub color: EntityColor,
    pub order_index: usize,
    pub items: Vec<ItemView>,
    pub created_at: DateTime<Utc>,
}

impl GroupView {
    pub fn from_group(group: &Group, items: Vec<ItemView>) -> Self {
        Self {
            id: group.id,
            column_id: group.column_id,
            name: group.name.clone(),
            description: group.description.clone(),
            color: group.color.clone(),
            order_index: group.order_index,
            items,
            created_at: group.created_at,
        }
    }
}

/// One entry of a column's root-level sequence.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RootEntryView {
    Item(ItemView),
    Group(GroupView),
}

impl RootEntryView {
    /// The entry's position in the root-level index space.
    pub fn index(&self) -> usize {
        match self {
            RootEntryView::Item(item) => item.row_index,
            RootEntryView::Group(group) => group.order_index,
        }
    }
}

/// A column with its interleaved root-level entries.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnView {
    pub id: ColumnId,
    pub board_id: BoardId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub color: EntityColor,
    pub order_index: usize,
    pub entries: Vec<RootEntryView>,
    pub created_at: DateTime<Utc>,
}

/// A board with all of its columns.
#[derive(Debug, Clone, Serialize)]
pub struct BoardView {
    pub id: BoardId,
    pub team_id: TeamId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub columns: Vec<ColumnView>,
    pub created_at: DateTime<Utc>,
}

/// Result of a batch position sync.
#[derive(Debug, Clone, Serialize)]
pub struct SyncResult {
    pub board_id: BoardId,
    /// Count of changes applied.
    pub updated: usize,
    pub changed_column_ids: Vec<ColumnId>,
    /// Full remapped views of every changed column.
    pub columns: Vec<ColumnView>,
}

/// Acknowledgement of a delete.
#[derive(Debug, Clone, Serialize)]
pub struct Deleted {
    pub deleted: bool,
    pub id: i64,
}

impl Deleted {
    pub fn of(id: i64) -> Self {
        Self { deleted: true, id }
    }
}

/// Map one column of the working set to its view.
pub fn column_view(state: &BoardState, column: &Column) -> ColumnView {
    let mut entries: Vec<RootEntryView> = Vec::new();

    for item in state.root_items(column.id) {
        entries.push(RootEntryView::Item(ItemView::from_item(item)));
    }
    for group in state.column_groups(column.id) {
        let items = state
            .group_items(group.id)
            .into_iter()
            .map(ItemView::from_item)
            .collect();
        entries.push(RootEntryView::Group(GroupView::from_group(group, items)));
    }

    entries.sort_by_key(|e| e.index());

    ColumnView {
        id: column.id,
        board_id: column.board_id,
        name: column.name.clone(),
        description: column.description.clone(),
        color: column.color.clone(),
        order_index: column.order_index,
        entries,
        created_at: column.created_at,
    }
}

/// Map the whole working set to a board view, columns in order.
pub fn board_view(state: &BoardState) -> BoardView {
    let board = state.board();
    let columns = state
        .columns_ordered()
        .into_iter()
        .map(|c| column_view(state, c))
        .collect();

    BoardView {
        id: board.id,
        team_id: board.team_id,
        name: board.name.clone(),
        description: board.description.clone(),
        columns,
        created_at: board.created_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_view_serializes_with_type_tag() {
        let item = Item::new(ColumnId::new(1), 0).with_description("retro note");
        let view = RootEntryView::Item(ItemView::from_item(&item));
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["type"], "item");
        assert_eq!(json["row_index"], 0);
    }

    #[test]
    fn test_group_entry_carries_items() {
        let group = Group::new(ColumnId::new(1), 0, EntityColor::uniform("0e8a16"));
        let item = Item::new(ColumnId::new(1), 0).in_group(GroupId::default());
        let view = RootEntryView::Group(GroupView::from_group(
            &group,
            vec![ItemView::from_item(&item)],
        ));
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["type"], "group");
        assert_eq!(json["items"].as_array().unwrap().len(), 1);
    }
}
