//! DeleteItem operation.

use crate::context::BoardContext;
use crate::error::{BoardError, Result};
use crate::operation::{async_trait, Execute};
use crate::order::PreferenceMap;
use crate::state::BoardState;
use crate::types::{ActorId, ItemId, LogEntry};
use crate::view::Deleted;
use serde::Deserialize;

/// Delete an item; its former container compacts to close the gap.
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteItem {
    pub item_id: ItemId,
    pub actor: ActorId,
}

impl DeleteItem {
    pub fn new(item_id: ItemId, actor: ActorId) -> Self {
        Self { item_id, actor }
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for DeleteItem {
    type Output = Deleted;

    async fn execute(&self, ctx: &BoardContext) -> Result<Deleted> {
        let _lock = ctx.lock().await?;
        let resolved = ctx.resolve_item(self.item_id, self.actor).await?;

        let board = ctx.read_board(resolved.board_id).await?;
        let mut state = BoardState::load(ctx, board).await?;

        let (column_id, group_id) = state
            .item(self.item_id)
            .map(|i| (i.column_id, i.group_id))
            .ok_or(BoardError::ItemNotFound { id: self.item_id })?;

        state.remove_item(self.item_id);
        match group_id {
            Some(group_id) => state.compact_group(group_id),
            None => state.renumber_root(column_id, &PreferenceMap::new()),
        }

        state.commit(ctx).await?;

        ctx.append_activity(&LogEntry::new(
            self.actor,
            "delete item",
            format!("item:{}", self.item_id),
        ))
        .await?;

        Ok(Deleted::of(self.item_id.value()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::CreateBoard;
    use crate::column::CreateColumn;
    use crate::item::AddItem;
    use crate::types::{BoardId, ColumnId, Role, Team, TeamId};
    use tempfile::TempDir;

    async fn setup() -> (TempDir, BoardContext, BoardId, ColumnId) {
        let temp = TempDir::new().unwrap();
        let ctx = BoardContext::new(temp.path().join("board-data"));
        ctx.ensure_directories().await.unwrap();

        let mut team = Team::new("Crew").with_member(ActorId::new(1), Role::Admin);
        team.id = TeamId::new(1);
        ctx.write_team(&team).await.unwrap();

        let board = CreateBoard::new(TeamId::new(1), ActorId::new(1), "Retro")
            .execute(&ctx)
            .await
            .unwrap();
        let column = CreateColumn::new(board.id, ActorId::new(1))
            .execute(&ctx)
            .await
            .unwrap();
        (temp, ctx, board.id, column.id)
    }

    #[tokio::test]
    async fn test_delete_compacts_root() {
        let (_temp, ctx, _board_id, column_id) = setup().await;
        let actor = ActorId::new(1);

        // Prepends produce: c(0), b(1), a(2).
        let a = AddItem::new(column_id, actor).execute(&ctx).await.unwrap();
        let b = AddItem::new(column_id, actor).execute(&ctx).await.unwrap();
        let c = AddItem::new(column_id, actor).execute(&ctx).await.unwrap();

        DeleteItem::new(b.id, actor).execute(&ctx).await.unwrap();

        assert_eq!(ctx.read_item(c.id).await.unwrap().row_index, 0);
        assert_eq!(ctx.read_item(a.id).await.unwrap().row_index, 1);
        assert!(matches!(
            ctx.read_item(b.id).await,
            Err(BoardError::ItemNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_twice_reports_not_found() {
        let (_temp, ctx, _board_id, column_id) = setup().await;
        let actor = ActorId::new(1);

        let item = AddItem::new(column_id, actor).execute(&ctx).await.unwrap();
        DeleteItem::new(item.id, actor).execute(&ctx).await.unwrap();

        let result = DeleteItem::new(item.id, actor).execute(&ctx).await;
        assert!(matches!(result, Err(BoardError::ItemNotFound { .. })));
    }
}
