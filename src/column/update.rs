//! UpdateColumn operation.

use crate::context::BoardContext;
use crate::error::{BoardError, Result};
use crate::operation::{async_trait, Execute};
use crate::state::BoardState;
use crate::types::{ActorId, ColumnId, EntityColor, LogEntry};
use crate::view::{column_view, ColumnView};
use serde::Deserialize;

/// Rename, re-describe, or re-color a column. Ordering is untouched.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateColumn {
    pub column_id: ColumnId,
    pub actor: ActorId,
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<EntityColor>,
}

impl UpdateColumn {
    pub fn new(column_id: ColumnId, actor: ActorId) -> Self {
        Self {
            column_id,
            actor,
            name: None,
            description: None,
            color: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_color(mut self, color: EntityColor) -> Self {
        self.color = Some(color);
        self
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for UpdateColumn {
    type Output = ColumnView;

    async fn execute(&self, ctx: &BoardContext) -> Result<ColumnView> {
        let _lock = ctx.lock().await?;
        let resolved = ctx.resolve_column(self.column_id, self.actor).await?;

        let board = ctx.read_board(resolved.board_id).await?;
        let mut state = BoardState::load(ctx, board).await?;

        {
            let column = state
                .column_mut(self.column_id)
                .ok_or(BoardError::ColumnNotFound { id: self.column_id })?;
            if let Some(name) = &self.name {
                column.name = name.clone();
            }
            if let Some(description) = &self.description {
                column.description = Some(description.clone());
            }
            if let Some(color) = &self.color {
                column.color = color.clone();
            }
        }

        let view = state
            .column(self.column_id)
            .map(|c| column_view(&state, c))
            .ok_or(BoardError::ColumnNotFound { id: self.column_id })?;
        state.commit(ctx).await?;

        ctx.append_activity(&LogEntry::new(
            self.actor,
            "update column",
            format!("column:{}", self.column_id),
        ))
        .await?;

        Ok(view)
    }
}
