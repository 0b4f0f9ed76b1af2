//! UpdateGroup operation.

use crate::context::BoardContext;
use crate::error::{BoardError, Result};
use crate::operation::{async_trait, Execute};
use crate::state::BoardState;
use crate::types::{ActorId, GroupId, LogEntry};
use crate::view::{GroupView, ItemView};
use serde::Deserialize;

/// Rename or re-describe a group. Ordering and membership are untouched.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateGroup {
    pub group_id: GroupId,
    pub actor: ActorId,
    pub name: Option<String>,
    pub description: Option<String>,
}

impl UpdateGroup {
    pub fn new(group_id: GroupId, actor: ActorId) -> Self {
        Self {
            group_id,
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
impl Execute<BoardContext, BoardError> for UpdateGroup {
    type Output = GroupView;

    async fn execute(&self, ctx: &BoardContext) -> Result<GroupView> {
        let _lock = ctx.lock().await?;
        let resolved = ctx.resolve_group(self.group_id, self.actor).await?;

        let board = ctx.read_board(resolved.board_id).await?;
        let mut state = BoardState::load(ctx, board).await?;

        {
            let group = state
                .group_mut(self.group_id)
                .ok_or(BoardError::GroupNotFound { id: self.group_id })?;
            if let Some(name) = &self.name {
                group.name = name.clone();
            }
            if let Some(description) = &self.description {
                group.description = Some(description.clone());
            }
        }

        let items: Vec<ItemView> = state
            .group_items(self.group_id)
            .into_iter()
            .map(ItemView::from_item)
            .collect();
        let view = state
            .group(self.group_id)
            .map(|g| GroupView::from_group(g, items))
            .ok_or(BoardError::GroupNotFound { id: self.group_id })?;
        state.commit(ctx).await?;

        ctx.append_activity(&LogEntry::new(
            self.actor,
            "update group",
            format!("group:{}", self.group_id),
        ))
        .await?;

        Ok(view)
    }
}
