//! Per-operation working set of one board's layout.
//!
//! Mutating operations load the board's columns, groups, and items once,
//! work on them in memory, and commit a single write set at the end. All
//! validation happens before the first staged mutation, so a failed
//! operation leaves the store untouched.

use crate::context::BoardContext;
use crate::error::Result;
use crate::order::{compact, renumber, EntryRef, PreferenceMap, RootEntry};
use crate::types::{Board, Column, ColumnId, Group, GroupId, Item, ItemId};
use std::collections::HashSet;

/// One board's layout, loaded for the duration of an operation.
pub struct BoardState {
    board: Board,
    columns: Vec<Column>,
    groups: Vec<Group>,
    items: Vec<Item>,
    dirty_columns: HashSet<ColumnId>,
    dirty_groups: HashSet<GroupId>,
    dirty_items: HashSet<ItemId>,
    removed_columns: Vec<ColumnId>,
    removed_groups: Vec<GroupId>,
    removed_items: Vec<ItemId>,
}

impl BoardState {
    /// Load the working set for a board.
    pub async fn load(ctx: &BoardContext, board: Board) -> Result<Self> {
        let columns: Vec<Column> = ctx
            .read_all_columns()
            .await?
            .into_iter()
            .filter(|c| c.board_id == board.id)
            .collect();
        let column_ids: HashSet<ColumnId> = columns.iter().map(|c| c.id).collect();

        let groups: Vec<Group> = ctx
            .read_all_groups()
            .await?
            .into_iter()
            .filter(|g| column_ids.contains(&g.column_id))
            .collect();
        let items: Vec<Item> = ctx
            .read_all_items()
            .await?
            .into_iter()
            .filter(|i| column_ids.contains(&i.column_id))
            .collect();

        Ok(Self {
            board,
            columns,
            groups,
            items,
            dirty_columns: HashSet::new(),
            dirty_groups: HashSet::new(),
            dirty_items: HashSet::new(),
            removed_columns: Vec::new(),
            removed_groups: Vec::new(),
            removed_items: Vec::new(),
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn column(&self, id: ColumnId) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == id)
    }

    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == id)
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Columns of the board ordered by `order_index`.
    pub fn columns_ordered(&self) -> Vec<&Column> {
        let mut columns: Vec<&Column> = self.columns.iter().collect();
        columns.sort_by_key(|c| (c.order_index, c.id));
        columns
    }

    /// Groups of one column ordered by their root-level index.
    pub fn column_groups(&self, column_id: ColumnId) -> Vec<&Group> {
        let mut groups: Vec<&Group> = self
            .groups
            .iter()
            .filter(|g| g.column_id == column_id)
            .collect();
        groups.sort_by_key(|g| (g.order_index, g.id));
        groups
    }

    /// Items of one group in group-local order.
    pub fn group_items(&self, group_id: GroupId) -> Vec<&Item> {
        let mut items: Vec<&Item> = self
            .items
            .iter()
            .filter(|i| i.group_id == Some(group_id))
            .collect();
        items.sort_by_key(|i| (i.row_index, i.id));
        items
    }

    /// Ungrouped items of one column in root order.
    pub fn root_items(&self, column_id: ColumnId) -> Vec<&Item> {
        let mut items: Vec<&Item> = self
            .items
            .iter()
            .filter(|i| i.column_id == column_id && i.group_id.is_none())
            .collect();
        items.sort_by_key(|i| (i.row_index, i.id));
        items
    }

    /// The column's root-level entry tokens (ungrouped items + groups),
    /// unordered.
    pub fn root_entries(&self, column_id: ColumnId) -> Vec<RootEntry> {
        let mut entries = Vec::new();
        for item in &self.items {
            if item.column_id == column_id && item.group_id.is_none() {
                entries.push(RootEntry::item(item.id, item.row_index));
            }
        }
        for group in &self.groups {
            if group.column_id == column_id {
                entries.push(RootEntry::group(group.id, group.order_index));
            }
        }
        entries
    }

    /// Group-local entry tokens for one group's items.
    pub fn group_entries(&self, group_id: GroupId) -> Vec<RootEntry> {
        self.items
            .iter()
            .filter(|i| i.group_id == Some(group_id))
            .map(|i| RootEntry::item(i.id, i.row_index))
            .collect()
    }

    /// Next free root-level index for a column, recomputed from current
    /// state: `max(last item row, last group order) + 1`.
    pub fn next_root_index(&self, column_id: ColumnId) -> usize {
        self.root_entries(column_id)
            .iter()
            .map(|e| e.index + 1)
            .max()
            .unwrap_or(0)
    }

    // =========================================================================
    // Mutators — every `_mut` access marks the entity dirty
    // =========================================================================

    pub fn column_mut(&mut self, id: ColumnId) -> Option<&mut Column> {
        let column = self.columns.iter_mut().find(|c| c.id == id)?;
        self.dirty_columns.insert(id);
        Some(column)
    }

    pub fn group_mut(&mut self, id: GroupId) -> Option<&mut Group> {
        let group = self.groups.iter_mut().find(|g| g.id == id)?;
        self.dirty_groups.insert(id);
        Some(group)
    }

    pub fn item_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        let item = self.items.iter_mut().find(|i| i.id == id)?;
        self.dirty_items.insert(id);
        Some(item)
    }

    pub fn insert_column(&mut self, column: Column) {
        self.dirty_columns.insert(column.id);
        self.columns.push(column);
    }

    pub fn insert_group(&mut self, group: Group) {
        self.dirty_groups.insert(group.id);
        self.groups.push(group);
    }

    pub fn insert_item(&mut self, item: Item) {
        self.dirty_items.insert(item.id);
        self.items.push(item);
    }

    pub fn remove_column(&mut self, id: ColumnId) -> Option<Column> {
        let position = self.columns.iter().position(|c| c.id == id)?;
        self.dirty_columns.remove(&id);
        self.removed_columns.push(id);
        Some(self.columns.remove(position))
    }

    pub fn remove_group(&mut self, id: GroupId) -> Option<Group> {
        let position = self.groups.iter().position(|g| g.id == id)?;
        self.dirty_groups.remove(&id);
        self.removed_groups.push(id);
        Some(self.groups.remove(position))
    }

    pub fn remove_item(&mut self, id: ItemId) -> Option<Item> {
        let position = self.items.iter().position(|i| i.id == id)?;
        self.dirty_items.remove(&id);
        self.removed_items.push(id);
        Some(self.items.remove(position))
    }

    // =========================================================================
    // Renumbering
    // =========================================================================

    /// Write a computed ordering back to the entities, marking only the
    /// entries whose index actually changed.
    pub fn apply_order(&mut self, entries: &[RootEntry]) {
        for entry in entries {
            match entry.entry {
                EntryRef::Item(id) => {
                    let current = self.item(id).map(|i| i.row_index);
                    if current != Some(entry.index) {
                        if let Some(item) = self.item_mut(id) {
                            item.row_index = entry.index;
                        }
                    }
                }
                EntryRef::Group(id) => {
                    let current = self.group(id).map(|g| g.order_index);
                    if current != Some(entry.index) {
                        if let Some(group) = self.group_mut(id) {
                            group.order_index = entry.index;
                        }
                    }
                }
            }
        }
    }

    /// Renumber a column's root-level sequence.
    pub fn renumber_root(&mut self, column_id: ColumnId, prefs: &PreferenceMap) {
        let mut entries = self.root_entries(column_id);
        renumber(&mut entries, prefs);
        self.apply_order(&entries);
    }

    /// Compact one group's item sequence (no move hints).
    pub fn compact_group(&mut self, group_id: GroupId) {
        let mut entries = self.group_entries(group_id);
        compact(&mut entries);
        self.apply_order(&entries);
    }

    // =========================================================================
    // Commit
    // =========================================================================

    /// Flush the write set: deletions first, then every dirty entity.
    pub async fn commit(self, ctx: &BoardContext) -> Result<()> {
        tracing::debug!(
            board = %self.board.id,
            dirty_columns = self.dirty_columns.len(),
            dirty_groups = self.dirty_groups.len(),
            dirty_items = self.dirty_items.len(),
            removed = self.removed_columns.len()
                + self.removed_groups.len()
                + self.removed_items.len(),
            "committing board write set"
        );

        for id in &self.removed_items {
            ctx.delete_item_file(*id).await?;
        }
        for id in &self.removed_groups {
            ctx.delete_group_file(*id).await?;
        }
        for id in &self.removed_columns {
            ctx.delete_column_file(*id).await?;
        }

        for column in &self.columns {
            if self.dirty_columns.contains(&column.id) {
                ctx.write_column(column).await?;
            }
        }
        for group in &self.groups {
            if self.dirty_groups.contains(&group.id) {
                ctx.write_group(group).await?;
            }
        }
        for item in &self.items {
            if self.dirty_items.contains(&item.id) {
                ctx.write_item(item).await?;
            }
        }

        Ok(())
    }
}
