//! SyncGroupPositions operation: batch-apply group moves across columns.

use crate::context::BoardContext;
use crate::error::{BoardError, Result};
use crate::operation::{async_trait, Execute};
use crate::order::{EntryRef, MovePreference, PreferenceMap};
use crate::state::BoardState;
use crate::types::{ActorId, BoardId, ColumnId, GroupId, ItemId, LogEntry};
use crate::view::{column_view, ColumnView, SyncResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// One client-proposed group move.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupPositionChange {
    pub group_id: GroupId,
    pub new_column_id: ColumnId,
    pub new_order_index: usize,
}

/// Atomically relocate a set of groups to new `(column, index)` targets.
///
/// Moving a group across columns re-parents all of its items' `column_id`;
/// their `group_id` and `row_index` stay untouched, so the group's
/// internal order survives the move. Every column that lost or gained a
/// group (or whose root ordering was targeted) renumbers with the batch's
/// preference map.
#[derive(Debug, Clone, Deserialize)]
pub struct SyncGroupPositions {
    pub board_id: BoardId,
    pub actor: ActorId,
    pub changes: Vec<GroupPositionChange>,
}

impl SyncGroupPositions {
    pub fn new(board_id: BoardId, actor: ActorId, changes: Vec<GroupPositionChange>) -> Self {
        Self {
            board_id,
            actor,
            changes,
        }
    }
}

struct PriorPlacement {
    column_id: ColumnId,
    order_index: usize,
}

#[async_trait]
impl Execute<BoardContext, BoardError> for SyncGroupPositions {
    type Output = SyncResult;

    async fn execute(&self, ctx: &BoardContext) -> Result<SyncResult> {
        let _lock = ctx.lock().await?;
        ctx.resolve_board(self.board_id, self.actor).await?;

        if self.changes.is_empty() {
            return Ok(SyncResult {
                board_id: self.board_id,
                updated: 0,
                changed_column_ids: Vec::new(),
                columns: Vec::new(),
            });
        }

        let board = ctx.read_board(self.board_id).await?;
        let mut state = BoardState::load(ctx, board).await?;

        // Validate the whole batch before any write.
        let mut previous: HashMap<GroupId, PriorPlacement> = HashMap::new();
        for change in &self.changes {
            if previous.contains_key(&change.group_id) {
                return Err(BoardError::bad_request(format!(
                    "duplicate group id {} in batch",
                    change.group_id
                )));
            }
            if state.column(change.new_column_id).is_none() {
                return Err(BoardError::bad_request(format!(
                    "column {} does not belong to board {}",
                    change.new_column_id, self.board_id
                )));
            }
            let group = state
                .group(change.group_id)
                .ok_or(BoardError::GroupNotFound {
                    id: change.group_id,
                })?;
            previous.insert(
                group.id,
                PriorPlacement {
                    column_id: group.column_id,
                    order_index: group.order_index,
                },
            );
        }

        // Apply membership and index changes; re-parent the items.
        for change in &self.changes {
            let members: Vec<ItemId> = state
                .group_items(change.group_id)
                .iter()
                .map(|i| i.id)
                .collect();

            if let Some(group) = state.group_mut(change.group_id) {
                group.column_id = change.new_column_id;
                group.order_index = change.new_order_index;
            }
            for id in members {
                if let Some(item) = state.item_mut(id) {
                    item.column_id = change.new_column_id;
                }
            }
        }

        // Renumber every affected root sequence with the batch hints.
        let mut affected: BTreeSet<ColumnId> = BTreeSet::new();
        let mut prefs = PreferenceMap::new();
        for (order, change) in self.changes.iter().enumerate() {
            affected.insert(change.new_column_id);
            if let Some(prior) = previous.get(&change.group_id) {
                if prior.column_id != change.new_column_id {
                    affected.insert(prior.column_id);
                }
                prefs.insert(
                    EntryRef::Group(change.group_id),
                    MovePreference {
                        old_index: (prior.column_id == change.new_column_id)
                            .then_some(prior.order_index),
                        new_index: change.new_order_index,
                        change_order: order,
                    },
                );
            }
        }
        for column_id in &affected {
            state.renumber_root(*column_id, &prefs);
        }

        let changed_column_ids: Vec<ColumnId> = affected.iter().copied().collect();
        let columns: Vec<ColumnView> = changed_column_ids
            .iter()
            .filter_map(|id| state.column(*id).map(|c| column_view(&state, c)))
            .collect();

        state.commit(ctx).await?;
        tracing::debug!(
            board = %self.board_id,
            moves = self.changes.len(),
            columns = changed_column_ids.len(),
            "group positions synced"
        );

        ctx.append_activity(&LogEntry::new(
            self.actor,
            "sync groups",
            format!("board:{}", self.board_id),
        ))
        .await?;

        Ok(SyncResult {
            board_id: self.board_id,
            updated: self.changes.len(),
            changed_column_ids,
            columns,
        })
    }
}
