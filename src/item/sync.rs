//! SyncItemPositions operation: batch-apply item moves.

use crate::context::BoardContext;
use crate::error::{BoardError, Result};
use crate::operation::{async_trait, Execute};
use crate::order::{EntryRef, MovePreference, PreferenceMap};
use crate::state::BoardState;
use crate::types::{ActorId, BoardId, ColumnId, GroupId, ItemId, LogEntry};
use crate::view::{column_view, ColumnView, SyncResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// One client-proposed item move: target column, optional group within
/// that column, and the desired index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemPositionChange {
    pub item_id: ItemId,
    pub new_column_id: ColumnId,
    pub new_row_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_group_id: Option<GroupId>,
}

/// Atomically relocate a set of items to new `(column, group, index)`
/// targets.
///
/// The whole batch validates before anything is written; a single bad
/// change rejects the batch with every item still at its pre-call
/// position. After the writes, every disturbed container renumbers:
/// groups whose membership changed (or that were targeted) compact, and
/// every root sequence that lost, gained, or re-ordered an entry
/// renumbers with the batch's preference map, so colliding targets
/// resolve deterministically.
#[derive(Debug, Clone, Deserialize)]
pub struct SyncItemPositions {
    pub board_id: BoardId,
    pub actor: ActorId,
    pub changes: Vec<ItemPositionChange>,
}

impl SyncItemPositions {
    pub fn new(board_id: BoardId, actor: ActorId, changes: Vec<ItemPositionChange>) -> Self {
        Self {
            board_id,
            actor,
            changes,
        }
    }
}

struct PriorPlacement {
    column_id: ColumnId,
    group_id: Option<GroupId>,
    row_index: usize,
}

#[async_trait]
impl Execute<BoardContext, BoardError> for SyncItemPositions {
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
        let mut previous: HashMap<ItemId, PriorPlacement> = HashMap::new();
        for change in &self.changes {
            if previous.contains_key(&change.item_id) {
                return Err(BoardError::bad_request(format!(
                    "duplicate item id {} in batch",
                    change.item_id
                )));
            }
            if state.column(change.new_column_id).is_none() {
                return Err(BoardError::bad_request(format!(
                    "column {} does not belong to board {}",
                    change.new_column_id, self.board_id
                )));
            }
            if let Some(group_id) = change.new_group_id {
                match state.group(group_id) {
                    None => {
                        return Err(BoardError::bad_request(format!(
                            "unknown group {} for item {}",
                            group_id, change.item_id
                        )))
                    }
                    Some(group) if group.column_id != change.new_column_id => {
                        return Err(BoardError::bad_request(format!(
                            "group {} does not belong to column {}",
                            group_id, change.new_column_id
                        )))
                    }
                    Some(_) => {}
                }
            }
            let item = state.item(change.item_id).ok_or(BoardError::ItemNotFound {
                id: change.item_id,
            })?;
            previous.insert(
                item.id,
                PriorPlacement {
                    column_id: item.column_id,
                    group_id: item.group_id,
                    row_index: item.row_index,
                },
            );
        }

        // Apply membership and index changes.
        for change in &self.changes {
            if let Some(item) = state.item_mut(change.item_id) {
                item.column_id = change.new_column_id;
                item.group_id = change.new_group_id;
                item.row_index = change.new_row_index;
            }
        }

        // Compact every group whose membership changed or that was
        // explicitly targeted.
        let mut affected_groups: BTreeSet<GroupId> = BTreeSet::new();
        for change in &self.changes {
            if let Some(prior) = previous.get(&change.item_id) {
                if prior.group_id != change.new_group_id {
                    if let Some(group_id) = prior.group_id {
                        affected_groups.insert(group_id);
                    }
                }
            }
            if let Some(group_id) = change.new_group_id {
                affected_groups.insert(group_id);
            }
        }
        for group_id in &affected_groups {
            state.compact_group(*group_id);
        }

        // Renumber every affected root sequence with the batch hints
        // (root-level-only subset of the changes).
        let mut affected_columns: BTreeSet<ColumnId> = BTreeSet::new();
        let mut prefs = PreferenceMap::new();
        for (order, change) in self.changes.iter().enumerate() {
            let prior = match previous.get(&change.item_id) {
                Some(prior) => prior,
                None => continue,
            };
            if prior.group_id.is_none() {
                affected_columns.insert(prior.column_id);
            }
            if change.new_group_id.is_none() {
                affected_columns.insert(change.new_column_id);
                prefs.insert(
                    EntryRef::Item(change.item_id),
                    MovePreference {
                        old_index: (prior.group_id.is_none()
                            && prior.column_id == change.new_column_id)
                            .then_some(prior.row_index),
                        new_index: change.new_row_index,
                        change_order: order,
                    },
                );
            }
        }
        for column_id in &affected_columns {
            state.renumber_root(*column_id, &prefs);
        }

        // Changed columns: every renumbered root plus the column of every
        // compacted group.
        let mut changed: BTreeSet<ColumnId> = affected_columns;
        for group_id in &affected_groups {
            if let Some(group) = state.group(*group_id) {
                changed.insert(group.column_id);
            }
        }
        let changed_column_ids: Vec<ColumnId> = changed.iter().copied().collect();
        let columns: Vec<ColumnView> = changed_column_ids
            .iter()
            .filter_map(|id| state.column(*id).map(|c| column_view(&state, c)))
            .collect();

        state.commit(ctx).await?;
        tracing::debug!(
            board = %self.board_id,
            moves = self.changes.len(),
            columns = changed_column_ids.len(),
            "item positions synced"
        );

        ctx.append_activity(&LogEntry::new(
            self.actor,
            "sync items",
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
