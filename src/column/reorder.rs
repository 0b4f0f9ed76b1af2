//! ReorderColumns operation.

use crate::context::BoardContext;
use crate::error::{BoardError, Result};
use crate::operation::{async_trait, Execute};
use crate::state::BoardState;
use crate::types::{ActorId, BoardId, ColumnId, LogEntry};
use crate::view::{column_view, ColumnView};
use serde::Deserialize;

/// Single-step column reorder: splice the column at `old_index` out and
/// reinsert it at `new_index`, then renumber all columns `0..N-1`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReorderColumns {
    pub board_id: BoardId,
    pub actor: ActorId,
    pub old_index: usize,
    pub new_index: usize,
}

impl ReorderColumns {
    pub fn new(board_id: BoardId, actor: ActorId, old_index: usize, new_index: usize) -> Self {
        Self {
            board_id,
            actor,
            old_index,
            new_index,
        }
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for ReorderColumns {
    type Output = Vec<ColumnView>;

    async fn execute(&self, ctx: &BoardContext) -> Result<Vec<ColumnView>> {
        let _lock = ctx.lock().await?;
        ctx.resolve_board(self.board_id, self.actor).await?;

        let board = ctx.read_board(self.board_id).await?;
        let mut state = BoardState::load(ctx, board).await?;

        let mut ordered: Vec<ColumnId> = state.columns_ordered().iter().map(|c| c.id).collect();
        if self.old_index >= ordered.len() || self.new_index >= ordered.len() {
            return Err(BoardError::bad_request(format!(
                "reorder indices ({}, {}) out of range for {} columns",
                self.old_index,
                self.new_index,
                ordered.len()
            )));
        }

        let moved = ordered.remove(self.old_index);
        ordered.insert(self.new_index, moved);

        for (position, id) in ordered.iter().enumerate() {
            let current = state.column(*id).map(|c| c.order_index);
            if current != Some(position) {
                if let Some(column) = state.column_mut(*id) {
                    column.order_index = position;
                }
            }
        }

        let views: Vec<ColumnView> = ordered
            .iter()
            .filter_map(|id| state.column(*id).map(|c| column_view(&state, c)))
            .collect();
        state.commit(ctx).await?;

        ctx.append_activity(&LogEntry::new(
            self.actor,
            "reorder columns",
            format!("board:{}", self.board_id),
        ))
        .await?;

        Ok(views)
    }
}
