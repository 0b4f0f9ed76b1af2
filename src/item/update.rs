//! UpdateItem operation.

use crate::context::BoardContext;
use crate::error::{BoardError, Result};
use crate::operation::{async_trait, Execute};
use crate::state::BoardState;
use crate::types::{ActorId, ItemId, LogEntry};
use crate::view::ItemView;
use serde::Deserialize;

/// Rewrite an item's description. Placement is untouched.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateItem {
    pub item_id: ItemId,
    pub actor: ActorId,
    pub description: Option<String>,
}

impl UpdateItem {
    pub fn new(item_id: ItemId, actor: ActorId) -> Self {
        Self {
            item_id,
            actor,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for UpdateItem {
    type Output = ItemView;

    async fn execute(&self, ctx: &BoardContext) -> Result<ItemView> {
        let _lock = ctx.lock().await?;
        let resolved = ctx.resolve_item(self.item_id, self.actor).await?;

        let board = ctx.read_board(resolved.board_id).await?;
        let mut state = BoardState::load(ctx, board).await?;

        {
            let item = state
                .item_mut(self.item_id)
                .ok_or(BoardError::ItemNotFound { id: self.item_id })?;
            if let Some(description) = &self.description {
                item.description = description.clone();
            }
        }

        let view = state
            .item(self.item_id)
            .map(ItemView::from_item)
            .ok_or(BoardError::ItemNotFound { id: self.item_id })?;
        state.commit(ctx).await?;

        ctx.append_activity(&LogEntry::new(
            self.actor,
            "update item",
            format!("item:{}", self.item_id),
        ))
        .await?;

        Ok(view)
    }
}
