//! CreateColumn operation.

use crate::auto_color;
use crate::context::BoardContext;
use crate::error::{BoardError, Result};
use crate::operation::{async_trait, Execute};
use crate::state::BoardState;
use crate::types::{ActorId, BoardId, Column, ColumnId, EntityColor, LogEntry};
use crate::view::{column_view, ColumnView};
use serde::Deserialize;

/// Add a column to a board, appended after the existing columns.
///
/// Appending is monotonic (`max + 1`), so no sibling renumbering runs.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateColumn {
    pub board_id: BoardId,
    pub actor: ActorId,
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<EntityColor>,
}

impl CreateColumn {
    /// Create a new CreateColumn operation.
    pub fn new(board_id: BoardId, actor: ActorId) -> Self {
        Self {
            board_id,
            actor,
            name: None,
            description: None,
            color: None,
        }
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the color record (auto-picked from the palette when omitted).
    pub fn with_color(mut self, color: EntityColor) -> Self {
        self.color = Some(color);
        self
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for CreateColumn {
    type Output = ColumnView;

    async fn execute(&self, ctx: &BoardContext) -> Result<ColumnView> {
        let _lock = ctx.lock().await?;
        ctx.resolve_board(self.board_id, self.actor).await?;

        let board = ctx.read_board(self.board_id).await?;
        let mut state = BoardState::load(ctx, board).await?;

        let order_index = state
            .columns_ordered()
            .last()
            .map(|c| c.order_index + 1)
            .unwrap_or(0);

        let id = ColumnId::new(ctx.allocate_id().await?);
        let color = self
            .color
            .clone()
            .unwrap_or_else(|| auto_color::column_color(&id.to_string()));

        let mut column = Column::new(self.board_id, order_index, color);
        column.id = id;
        if let Some(name) = &self.name {
            column = column.with_name(name.clone());
        }
        if let Some(description) = &self.description {
            column = column.with_description(description.clone());
        }
        state.insert_column(column);

        let view = state
            .column(id)
            .map(|c| column_view(&state, c))
            .ok_or(BoardError::ColumnNotFound { id })?;
        state.commit(ctx).await?;

        ctx.append_activity(&LogEntry::new(
            self.actor,
            "create column",
            format!("column:{}", id),
        ))
        .await?;

        Ok(view)
    }
}
