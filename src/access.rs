//! Access and context resolution.
//!
//! The core walks the entity chain (item → column → board → team) itself;
//! the allow/deny decision is delegated to the [`AccessResolver`]
//! collaborator. A missing entity and a denied actor surface as the same
//! not-found error, so unauthorized actors cannot probe for existence.

use crate::context::BoardContext;
use crate::error::{BoardError, Result};
use crate::types::{ActorId, BoardId, ColumnId, GroupId, ItemId, Role, TeamId};
use async_trait::async_trait;
use std::path::PathBuf;

/// Capability check collaborator: who is what within a team.
#[async_trait]
pub trait AccessResolver: Send + Sync {
    /// Role of `actor` in `team`, or `None` when the actor is not a
    /// member (or the team does not exist).
    async fn role_of(&self, team: TeamId, actor: ActorId) -> Result<Option<Role>>;
}

/// Resolved routing and authorization context for one request.
///
/// `team_id` doubles as the broadcast scope the transport layer emits
/// results to after a successful mutation.
#[derive(Debug, Clone)]
pub struct ResolvedContext {
    pub team_id: TeamId,
    pub board_id: BoardId,
    pub column_id: Option<ColumnId>,
    pub group_id: Option<GroupId>,
    pub item_id: Option<ItemId>,
    pub role: Role,
}

/// Default resolver: membership read from the data directory's own
/// `teams/{id}.json` records.
pub struct TeamRoster {
    root: PathBuf,
}

impl TeamRoster {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl AccessResolver for TeamRoster {
    async fn role_of(&self, team: TeamId, actor: ActorId) -> Result<Option<Role>> {
        let path = self.root.join("teams").join(format!("{}.json", team));
        if !path.exists() {
            return Ok(None);
        }

        let content = tokio::fs::read_to_string(&path).await?;
        let roster: crate::types::Team = serde_json::from_str(&content)?;
        Ok(roster.role_of(actor))
    }
}

impl BoardContext {
    /// Resolve a team and the actor's role in it.
    ///
    /// Absent team and non-member actor are indistinguishable.
    pub async fn resolve_team(&self, team_id: TeamId, actor: ActorId) -> Result<Role> {
        match self.access().role_of(team_id, actor).await? {
            Some(role) => Ok(role),
            None => Err(BoardError::TeamNotFound { id: team_id }),
        }
    }

    /// Resolve a board for an actor.
    pub async fn resolve_board(&self, board_id: BoardId, actor: ActorId) -> Result<ResolvedContext> {
        let board = self.read_board(board_id).await?;
        let role = match self.access().role_of(board.team_id, actor).await? {
            Some(role) => role,
            None => return Err(BoardError::BoardNotFound { id: board_id }),
        };

        Ok(ResolvedContext {
            team_id: board.team_id,
            board_id,
            column_id: None,
            group_id: None,
            item_id: None,
            role,
        })
    }

    /// Resolve a column for an actor.
    pub async fn resolve_column(
        &self,
        column_id: ColumnId,
        actor: ActorId,
    ) -> Result<ResolvedContext> {
        let column = self.read_column(column_id).await?;
        let mut resolved = self
            .resolve_board(column.board_id, actor)
            .await
            .map_err(|err| hide_parent(err, BoardError::ColumnNotFound { id: column_id }))?;
        resolved.column_id = Some(column_id);
        Ok(resolved)
    }

    /// Resolve a group for an actor.
    pub async fn resolve_group(&self, group_id: GroupId, actor: ActorId) -> Result<ResolvedContext> {
        let group = self.read_group(group_id).await?;
        let mut resolved = self
            .resolve_column(group.column_id, actor)
            .await
            .map_err(|err| hide_parent(err, BoardError::GroupNotFound { id: group_id }))?;
        resolved.group_id = Some(group_id);
        Ok(resolved)
    }

    /// Resolve an item for an actor.
    pub async fn resolve_item(&self, item_id: ItemId, actor: ActorId) -> Result<ResolvedContext> {
        let item = self.read_item(item_id).await?;
        let mut resolved = self
            .resolve_column(item.column_id, actor)
            .await
            .map_err(|err| hide_parent(err, BoardError::ItemNotFound { id: item_id }))?;
        resolved.item_id = Some(item_id);
        resolved.group_id = item.group_id;
        Ok(resolved)
    }
}

/// Rewrite a not-found failure anywhere up the chain as not-found for the
/// entity the caller actually asked about; infrastructure errors pass
/// through unchanged.
fn hide_parent(err: BoardError, not_found: BoardError) -> BoardError {
    match err {
        BoardError::TeamNotFound { .. }
        | BoardError::BoardNotFound { .. }
        | BoardError::ColumnNotFound { .. }
        | BoardError::GroupNotFound { .. }
        | BoardError::ItemNotFound { .. } => not_found,
        other => other,
    }
}
