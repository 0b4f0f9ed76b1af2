//! DeleteGroup operation.

use crate::context::BoardContext;
use crate::error::{BoardError, Result};
use crate::operation::{async_trait, Execute};
use crate::state::BoardState;
use crate::types::{ActorId, GroupId, ItemId, LogEntry};
use crate::view::Deleted;
use serde::Deserialize;

/// Delete a group without deleting its items.
///
/// The items become ungrouped, spliced into the column's root sequence at
/// the group's former root position in their existing group-local order;
/// the whole root sequence then renumbers `0..N-1`.
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteGroup {
    pub group_id: GroupId,
    pub actor: ActorId,
}

impl DeleteGroup {
    pub fn new(group_id: GroupId, actor: ActorId) -> Self {
        Self { group_id, actor }
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for DeleteGroup {
    type Output = Deleted;

    async fn execute(&self, ctx: &BoardContext) -> Result<Deleted> {
        let _lock = ctx.lock().await?;
        let resolved = ctx.resolve_group(self.group_id, self.actor).await?;

        let board = ctx.read_board(resolved.board_id).await?;
        let mut state = BoardState::load(ctx, board).await?;

        let (column_id, former_index) = state
            .group(self.group_id)
            .map(|g| (g.column_id, g.order_index))
            .ok_or(BoardError::GroupNotFound { id: self.group_id })?;
        let members: Vec<ItemId> = state
            .group_items(self.group_id)
            .iter()
            .map(|i| i.id)
            .collect();

        state.remove_group(self.group_id);
        for id in &members {
            if let Some(item) = state.item_mut(*id) {
                item.group_id = None;
            }
        }

        // Splice: remaining root entries in order, the freed items taking
        // the group's former slot, then sequential indices.
        let mut entries = state.root_entries(column_id);
        entries.retain(|e| {
            !members
                .iter()
                .any(|id| e.entry == crate::order::EntryRef::Item(*id))
        });
        entries.sort_by(|a, b| a.index.cmp(&b.index).then_with(|| a.entry.cmp(&b.entry)));

        let splice_at = entries
            .iter()
            .position(|e| e.index > former_index)
            .unwrap_or(entries.len());
        for (offset, id) in members.iter().enumerate() {
            entries.insert(
                splice_at + offset,
                crate::order::RootEntry::item(*id, former_index),
            );
        }
        for (position, entry) in entries.iter_mut().enumerate() {
            entry.index = position;
        }
        state.apply_order(&entries);

        state.commit(ctx).await?;

        ctx.append_activity(&LogEntry::new(
            self.actor,
            "delete group",
            format!("group:{}", self.group_id),
        ))
        .await?;

        Ok(Deleted::of(self.group_id.value()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{CreateBoard, GetBoard};
    use crate::column::CreateColumn;
    use crate::group::CreateGroup;
    use crate::item::AddItem;
    use crate::types::{BoardId, ColumnId, Role, Team, TeamId};
    use crate::view::RootEntryView;
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
    async fn test_items_splice_into_former_slot() {
        let (_temp, ctx, board_id, column_id) = setup().await;
        let actor = ActorId::new(1);

        // Root: item2(0), item1(1) — AddItem prepends.
        let item1 = AddItem::new(column_id, actor).execute(&ctx).await.unwrap();
        let item2 = AddItem::new(column_id, actor).execute(&ctx).await.unwrap();
        // Group lands at root index 2, holding two items.
        let group = CreateGroup::new(column_id, actor).execute(&ctx).await.unwrap();
        let in_a = AddItem::new(column_id, actor)
            .into_group(group.id)
            .execute(&ctx)
            .await
            .unwrap();
        let in_b = AddItem::new(column_id, actor)
            .into_group(group.id)
            .execute(&ctx)
            .await
            .unwrap();
        // Group-local order after two prepends: in_b(0), in_a(1).

        DeleteGroup::new(group.id, actor).execute(&ctx).await.unwrap();

        let view = GetBoard::new(board_id, actor).execute(&ctx).await.unwrap();
        let ids: Vec<i64> = view.columns[0]
            .entries
            .iter()
            .map(|e| match e {
                RootEntryView::Item(i) => i.id.value(),
                RootEntryView::Group(g) => g.id.value(),
            })
            .collect();

        assert_eq!(
            ids,
            vec![
                item2.id.value(),
                item1.id.value(),
                in_b.id.value(),
                in_a.id.value(),
            ]
        );

        let freed = ctx.read_item(in_b.id).await.unwrap();
        assert!(freed.is_root_level());
        assert_eq!(freed.row_index, 2);
    }

    #[tokio::test]
    async fn test_delete_missing_group() {
        let (_temp, ctx, _board_id, _column_id) = setup().await;
        let result = DeleteGroup::new(GroupId::new(404), ActorId::new(1))
            .execute(&ctx)
            .await;
        assert!(matches!(result, Err(BoardError::GroupNotFound { .. })));
    }
}
