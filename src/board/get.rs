//! GetBoard operation.

use crate::context::BoardContext;
use crate::error::{BoardError, Result};
use crate::operation::{async_trait, Execute};
use crate::state::BoardState;
use crate::types::{ActorId, BoardId};
use crate::view::{board_view, BoardView};
use serde::Deserialize;

/// Retrieve a board with all columns and their interleaved entries.
#[derive(Debug, Clone, Deserialize)]
pub struct GetBoard {
    pub board_id: BoardId,
    pub actor: ActorId,
}

impl GetBoard {
    pub fn new(board_id: BoardId, actor: ActorId) -> Self {
        Self { board_id, actor }
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for GetBoard {
    type Output = BoardView;

    async fn execute(&self, ctx: &BoardContext) -> Result<BoardView> {
        ctx.resolve_board(self.board_id, self.actor).await?;
        let board = ctx.read_board(self.board_id).await?;
        let state = BoardState::load(ctx, board).await?;
        Ok(board_view(&state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::CreateBoard;
    use crate::column::CreateColumn;
    use crate::types::{Role, Team, TeamId};
    use tempfile::TempDir;

    async fn setup() -> (TempDir, BoardContext, BoardId) {
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
        (temp, ctx, board.id)
    }

    #[tokio::test]
    async fn test_get_board_maps_columns() {
        let (_temp, ctx, board_id) = setup().await;

        CreateColumn::new(board_id, ActorId::new(1))
            .with_name("Went well")
            .execute(&ctx)
            .await
            .unwrap();
        CreateColumn::new(board_id, ActorId::new(1))
            .with_name("To improve")
            .execute(&ctx)
            .await
            .unwrap();

        let view = GetBoard::new(board_id, ActorId::new(1))
            .execute(&ctx)
            .await
            .unwrap();

        assert_eq!(view.columns.len(), 2);
        assert_eq!(view.columns[0].name, "Went well");
        assert_eq!(view.columns[0].order_index, 0);
        assert_eq!(view.columns[1].order_index, 1);
    }

    #[tokio::test]
    async fn test_get_board_denied_for_outsider() {
        let (_temp, ctx, board_id) = setup().await;
        let result = GetBoard::new(board_id, ActorId::new(50)).execute(&ctx).await;
        assert!(matches!(result, Err(BoardError::BoardNotFound { .. })));
    }
}
