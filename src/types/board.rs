//! Board-level types: Board, Team, membership roles.

use super::ids::{ActorId, BoardId, TeamId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A board owned by exactly one team.
///
/// Layout (columns, groups, items) is stored as individual entity files;
/// the board file carries metadata only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    /// Restored from the file stem after deserialization.
    #[serde(skip)]
    pub id: BoardId,
    pub team_id: TeamId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Board {
    /// Create a new board for a team.
    pub fn new(team_id: TeamId, name: impl Into<String>) -> Self {
        Self {
            id: BoardId::default(),
            team_id,
            name: name.into(),
            description: None,
            created_at: Utc::now(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Membership role within a team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Member,
    Admin,
}

impl Role {
    /// Board creation is restricted to elevated roles.
    pub fn can_create_board(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// One team member with their role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamMember {
    pub actor_id: ActorId,
    pub role: Role,
}

/// A team: the ownership and broadcast scope for boards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    #[serde(skip)]
    pub id: TeamId,
    pub name: String,
    #[serde(default)]
    pub members: Vec<TeamMember>,
}

impl Team {
    /// Create a team with no members.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: TeamId::default(),
            name: name.into(),
            members: Vec::new(),
        }
    }

    /// Add a member with the given role.
    pub fn with_member(mut self, actor_id: ActorId, role: Role) -> Self {
        self.members.push(TeamMember { actor_id, role });
        self
    }

    /// Role of an actor in this team, if they are a member.
    pub fn role_of(&self, actor_id: ActorId) -> Option<Role> {
        self.members
            .iter()
            .find(|m| m.actor_id == actor_id)
            .map(|m| m.role)
    }
}
