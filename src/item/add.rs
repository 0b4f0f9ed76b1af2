//! AddItem operation.

use crate::context::BoardContext;
use crate::error::{BoardError, Result};
use crate::operation::{async_trait, Execute};
use crate::state::BoardState;
use crate::types::{ActorId, ColumnId, GroupId, Item, ItemId, LogEntry};
use crate::view::ItemView;
use serde::Deserialize;

/// Add an item at the top of a column (or of a group within it).
///
/// Prepend semantics: existing siblings shift down one slot first and the
/// new item takes index 0, so the newest card is always on top.
#[derive(Debug, Clone, Deserialize)]
pub struct AddItem {
    pub column_id: ColumnId,
    pub actor: ActorId,
    pub description: Option<String>,
    pub group_id: Option<GroupId>,
}

impl AddItem {
    /// Create a new AddItem operation.
    pub fn new(column_id: ColumnId, actor: ActorId) -> Self {
        Self {
            column_id,
            actor,
            description: None,
            group_id: None,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add the item inside a group of the column.
    pub fn into_group(mut self, group_id: GroupId) -> Self {
        self.group_id = Some(group_id);
        self
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for AddItem {
    type Output = ItemView;

    async fn execute(&self, ctx: &BoardContext) -> Result<ItemView> {
        let _lock = ctx.lock().await?;
        let resolved = ctx.resolve_column(self.column_id, self.actor).await?;

        let board = ctx.read_board(resolved.board_id).await?;
        let mut state = BoardState::load(ctx, board).await?;

        if state.column(self.column_id).is_none() {
            return Err(BoardError::ColumnNotFound { id: self.column_id });
        }
        if let Some(group_id) = self.group_id {
            match state.group(group_id) {
                None => {
                    return Err(BoardError::bad_request(format!(
                        "unknown group {} for new item",
                        group_id
                    )))
                }
                Some(group) if group.column_id != self.column_id => {
                    return Err(BoardError::bad_request(format!(
                        "group {} does not belong to column {}",
                        group_id, self.column_id
                    )))
                }
                Some(_) => {}
            }
        }

        // Shift siblings down, then take slot 0.
        match self.group_id {
            Some(group_id) => {
                let mut entries = state.group_entries(group_id);
                for entry in &mut entries {
                    entry.index += 1;
                }
                state.apply_order(&entries);
            }
            None => {
                let mut entries = state.root_entries(self.column_id);
                for entry in &mut entries {
                    entry.index += 1;
                }
                state.apply_order(&entries);
            }
        }

        let id = ItemId::new(ctx.allocate_id().await?);
        let mut item = Item::new(self.column_id, 0);
        item.id = id;
        if let Some(group_id) = self.group_id {
            item = item.in_group(group_id);
        }
        if let Some(description) = &self.description {
            item = item.with_description(description.clone());
        }
        state.insert_item(item);

        let view = state
            .item(id)
            .map(ItemView::from_item)
            .ok_or(BoardError::ItemNotFound { id })?;
        state.commit(ctx).await?;

        ctx.append_activity(&LogEntry::new(
            self.actor,
            "add item",
            format!("item:{}", id),
        ))
        .await?;

        Ok(view)
    }
}
