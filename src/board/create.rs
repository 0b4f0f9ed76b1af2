//! CreateBoard operation.

use crate::context::BoardContext;
use crate::error::{BoardError, Result};
use crate::operation::{async_trait, Execute};
use crate::types::{ActorId, Board, BoardId, LogEntry, TeamId};
use crate::view::BoardView;
use serde::Deserialize;

/// Create a new board for a team. Requires the admin role.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBoard {
    pub team_id: TeamId,
    pub actor: ActorId,
    pub name: String,
    pub description: Option<String>,
}

impl CreateBoard {
    /// Create a new CreateBoard operation.
    pub fn new(team_id: TeamId, actor: ActorId, name: impl Into<String>) -> Self {
        Self {
            team_id,
            actor,
            name: name.into(),
            description: None,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for CreateBoard {
    type Output = BoardView;

    async fn execute(&self, ctx: &BoardContext) -> Result<BoardView> {
        let role = ctx.resolve_team(self.team_id, self.actor).await?;
        if !role.can_create_board() {
            return Err(BoardError::forbidden("only team admins may create boards"));
        }

        let _lock = ctx.lock().await?;

        let mut board = Board::new(self.team_id, self.name.clone());
        if let Some(description) = &self.description {
            board = board.with_description(description.clone());
        }
        board.id = BoardId::new(ctx.allocate_id().await?);
        ctx.write_board(&board).await?;

        ctx.append_activity(&LogEntry::new(
            self.actor,
            "create board",
            format!("board:{}", board.id),
        ))
        .await?;

        Ok(BoardView {
            id: board.id,
            team_id: board.team_id,
            name: board.name,
            description: board.description,
            columns: Vec::new(),
            created_at: board.created_at,
        })
    }
}
