//! CreateGroup operation.

use crate::auto_color;
use crate::context::BoardContext;
use crate::error::{BoardError, Result};
use crate::operation::{async_trait, Execute};
use crate::state::BoardState;
use crate::types::{ActorId, ColumnId, Group, GroupId, LogEntry};
use crate::view::GroupView;
use serde::Deserialize;

/// Add a group to a column, appended at the next free root-level index.
///
/// The group's color is picked to differ from the column's, so it stays
/// visually separable from its background.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateGroup {
    pub column_id: ColumnId,
    pub actor: ActorId,
    pub name: Option<String>,
    pub description: Option<String>,
}

impl CreateGroup {
    pub fn new(column_id: ColumnId, actor: ActorId) -> Self {
        Self {
            column_id,
            actor,
            name: None,
            description: None,
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
}

#[async_trait]
impl Execute<BoardContext, BoardError> for CreateGroup {
    type Output = GroupView;

    async fn execute(&self, ctx: &BoardContext) -> Result<GroupView> {
        let _lock = ctx.lock().await?;
        let resolved = ctx.resolve_column(self.column_id, self.actor).await?;

        let board = ctx.read_board(resolved.board_id).await?;
        let mut state = BoardState::load(ctx, board).await?;

        let column_color = state
            .column(self.column_id)
            .map(|c| c.color.clone())
            .ok_or(BoardError::ColumnNotFound { id: self.column_id })?;
        let order_index = state.next_root_index(self.column_id);

        let id = GroupId::new(ctx.allocate_id().await?);
        let color = auto_color::group_color(&id.to_string(), &column_color);

        let mut group = Group::new(self.column_id, order_index, color);
        group.id = id;
        if let Some(name) = &self.name {
            group = group.with_name(name.clone());
        }
        if let Some(description) = &self.description {
            group = group.with_description(description.clone());
        }
        state.insert_group(group);

        let view = state
            .group(id)
            .map(|g| GroupView::from_group(g, Vec::new()))
            .ok_or(BoardError::GroupNotFound { id })?;
        state.commit(ctx).await?;

        ctx.append_activity(&LogEntry::new(
            self.actor,
            "create group",
            format!("group:{}", id),
        ))
        .await?;

        Ok(view)
    }
}
