//! DeleteColumn operation.

use crate::context::BoardContext;
use crate::error::{BoardError, Result};
use crate::operation::{async_trait, Execute};
use crate::state::BoardState;
use crate::types::{ActorId, ColumnId, GroupId, ItemId, LogEntry};
use crate::view::Deleted;
use serde::Deserialize;

/// Delete a column together with its groups and items.
///
/// Dependents are removed in the same commit (owner-removes-dependents);
/// sibling columns with a greater `order_index` shift down to close the
/// gap.
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteColumn {
    pub column_id: ColumnId,
    pub actor: ActorId,
}

impl DeleteColumn {
    pub fn new(column_id: ColumnId, actor: ActorId) -> Self {
        Self { column_id, actor }
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for DeleteColumn {
    type Output = Deleted;

    async fn execute(&self, ctx: &BoardContext) -> Result<Deleted> {
        let _lock = ctx.lock().await?;
        let resolved = ctx.resolve_column(self.column_id, self.actor).await?;

        let board = ctx.read_board(resolved.board_id).await?;
        let mut state = BoardState::load(ctx, board).await?;

        let deleted_order = state
            .column(self.column_id)
            .map(|c| c.order_index)
            .ok_or(BoardError::ColumnNotFound { id: self.column_id })?;

        let group_ids: Vec<GroupId> = state
            .column_groups(self.column_id)
            .iter()
            .map(|g| g.id)
            .collect();
        let item_ids: Vec<ItemId> = state
            .root_items(self.column_id)
            .iter()
            .map(|i| i.id)
            .chain(
                group_ids
                    .iter()
                    .flat_map(|g| state.group_items(*g))
                    .map(|i| i.id),
            )
            .collect();

        for id in item_ids {
            state.remove_item(id);
        }
        for id in group_ids {
            state.remove_group(id);
        }
        state.remove_column(self.column_id);

        let shifted: Vec<ColumnId> = state
            .columns_ordered()
            .iter()
            .filter(|c| c.order_index > deleted_order)
            .map(|c| c.id)
            .collect();
        for id in shifted {
            if let Some(column) = state.column_mut(id) {
                column.order_index -= 1;
            }
        }

        state.commit(ctx).await?;

        ctx.append_activity(&LogEntry::new(
            self.actor,
            "delete column",
            format!("column:{}", self.column_id),
        ))
        .await?;

        Ok(Deleted::of(self.column_id.value()))
    }
}
