//! Integration tests for batch position sync: atomicity, convergence,
//! and deterministic tie-breaking.

use retroboard::board::{CreateBoard, GetBoard};
use retroboard::column::CreateColumn;
use retroboard::group::{CreateGroup, GroupPositionChange, SyncGroupPositions};
use retroboard::item::{AddItem, ItemPositionChange, SyncItemPositions};
use retroboard::types::{ActorId, BoardId, ColumnId, GroupId, ItemId, Role, Team, TeamId};
use retroboard::view::RootEntryView;
use retroboard::{BoardContext, BoardError, Execute};
use tempfile::TempDir;

const ADMIN: ActorId = ActorId::new(1);

async fn setup() -> (TempDir, BoardContext, BoardId, ColumnId, ColumnId) {
    let temp = TempDir::new().unwrap();
    let ctx = BoardContext::new(temp.path().join("board-data"));
    ctx.ensure_directories().await.unwrap();

    let mut team = Team::new("Crew").with_member(ADMIN, Role::Admin);
    team.id = TeamId::new(1);
    ctx.write_team(&team).await.unwrap();

    let board = CreateBoard::new(TeamId::new(1), ADMIN, "Retro")
        .execute(&ctx)
        .await
        .unwrap();
    let a = CreateColumn::new(board.id, ADMIN)
        .with_name("A")
        .execute(&ctx)
        .await
        .unwrap();
    let b = CreateColumn::new(board.id, ADMIN)
        .with_name("B")
        .execute(&ctx)
        .await
        .unwrap();
    (temp, ctx, board.id, a.id, b.id)
}

fn to_root(item: ItemId, column: ColumnId, row: usize) -> ItemPositionChange {
    ItemPositionChange {
        item_id: item,
        new_column_id: column,
        new_row_index: row,
        new_group_id: None,
    }
}

#[tokio::test]
async fn incoming_item_displaces_resident() {
    let (_temp, ctx, board_id, col_a, col_b) = setup().await;

    let resident = AddItem::new(col_b, ADMIN).execute(&ctx).await.unwrap();
    let mover = AddItem::new(col_a, ADMIN).execute(&ctx).await.unwrap();

    let result = SyncItemPositions::new(board_id, ADMIN, vec![to_root(mover.id, col_b, 0)])
        .execute(&ctx)
        .await
        .unwrap();

    assert_eq!(result.board_id, board_id);
    assert_eq!(result.updated, 1);
    // Source column lost a root entry, target gained one.
    assert_eq!(result.changed_column_ids, vec![col_a, col_b]);

    assert_eq!(ctx.read_item(mover.id).await.unwrap().row_index, 0);
    assert_eq!(ctx.read_item(resident.id).await.unwrap().row_index, 1);

    // The response carries full remapped columns.
    let remapped_b = result.columns.iter().find(|c| c.id == col_b).unwrap();
    let rows: Vec<i64> = remapped_b
        .entries
        .iter()
        .map(|e| match e {
            RootEntryView::Item(i) => i.id.value(),
            RootEntryView::Group(g) => g.id.value(),
        })
        .collect();
    assert_eq!(rows, vec![mover.id.value(), resident.id.value()]);
}

#[tokio::test]
async fn colliding_targets_resolve_by_submission_order() {
    let (_temp, ctx, board_id, col_a, col_b) = setup().await;

    let first = AddItem::new(col_a, ADMIN).execute(&ctx).await.unwrap();
    let second = AddItem::new(col_a, ADMIN).execute(&ctx).await.unwrap();

    // Both items are new to column B and both ask for index 0: the one
    // listed first in the batch wins, regardless of prior positions.
    SyncItemPositions::new(
        board_id,
        ADMIN,
        vec![to_root(first.id, col_b, 0), to_root(second.id, col_b, 0)],
    )
    .execute(&ctx)
    .await
    .unwrap();

    assert_eq!(ctx.read_item(first.id).await.unwrap().row_index, 0);
    assert_eq!(ctx.read_item(second.id).await.unwrap().row_index, 1);
}

#[tokio::test]
async fn failed_batch_leaves_every_item_in_place() {
    let (_temp, ctx, board_id, col_a, col_b) = setup().await;

    let one = AddItem::new(col_a, ADMIN).execute(&ctx).await.unwrap();
    let two = AddItem::new(col_a, ADMIN).execute(&ctx).await.unwrap();

    // A group living in column A; referencing it from column B is invalid.
    let foreign_group = CreateGroup::new(col_a, ADMIN).execute(&ctx).await.unwrap();

    let before = GetBoard::new(board_id, ADMIN).execute(&ctx).await.unwrap();

    let result = SyncItemPositions::new(
        board_id,
        ADMIN,
        vec![
            to_root(one.id, col_b, 0),
            ItemPositionChange {
                item_id: two.id,
                new_column_id: col_b,
                new_row_index: 1,
                new_group_id: Some(foreign_group.id),
            },
        ],
    )
    .execute(&ctx)
    .await;
    assert!(matches!(result, Err(BoardError::BadRequest { .. })));

    let after = GetBoard::new(board_id, ADMIN).execute(&ctx).await.unwrap();
    assert_eq!(
        serde_json::to_value(&after).unwrap()["columns"],
        serde_json::to_value(&before).unwrap()["columns"],
        "rejected batch must not move anything"
    );
}

#[tokio::test]
async fn restating_current_positions_changes_nothing() {
    let (_temp, ctx, board_id, col_a, _col_b) = setup().await;

    let bottom = AddItem::new(col_a, ADMIN).execute(&ctx).await.unwrap();
    let top = AddItem::new(col_a, ADMIN).execute(&ctx).await.unwrap();

    let before = GetBoard::new(board_id, ADMIN).execute(&ctx).await.unwrap();

    // A stationary move (old == new) carries no effective preference;
    // re-running the renumbering reproduces the same order.
    SyncItemPositions::new(
        board_id,
        ADMIN,
        vec![to_root(top.id, col_a, 0), to_root(bottom.id, col_a, 1)],
    )
    .execute(&ctx)
    .await
    .unwrap();

    let after = GetBoard::new(board_id, ADMIN).execute(&ctx).await.unwrap();
    assert_eq!(
        serde_json::to_value(&after).unwrap()["columns"],
        serde_json::to_value(&before).unwrap()["columns"],
    );
}

#[tokio::test]
async fn group_move_carries_items_and_compacts_source() {
    let (_temp, ctx, board_id, col_a, col_b) = setup().await;

    // Column A: root item above a 3-item group.
    let group = CreateGroup::new(col_a, ADMIN).execute(&ctx).await.unwrap();
    let mut members = Vec::new();
    for text in ["first", "second", "third"] {
        let item = AddItem::new(col_a, ADMIN)
            .into_group(group.id)
            .with_description(text)
            .execute(&ctx)
            .await
            .unwrap();
        members.push(item.id);
    }
    let loose = AddItem::new(col_a, ADMIN).execute(&ctx).await.unwrap();

    let rows_before: Vec<usize> = {
        let mut rows = Vec::new();
        for id in &members {
            rows.push(ctx.read_item(*id).await.unwrap().row_index);
        }
        rows
    };

    SyncGroupPositions::new(
        board_id,
        ADMIN,
        vec![GroupPositionChange {
            group_id: group.id,
            new_column_id: col_b,
            new_order_index: 0,
        }],
    )
    .execute(&ctx)
    .await
    .unwrap();

    // All members report the new column; group-local order unchanged.
    for (id, row) in members.iter().zip(&rows_before) {
        let item = ctx.read_item(*id).await.unwrap();
        assert_eq!(item.column_id, col_b);
        assert_eq!(item.group_id, Some(group.id));
        assert_eq!(item.row_index, *row);
    }

    // Column A compacted: the loose item is its only root entry.
    assert_eq!(ctx.read_item(loose.id).await.unwrap().row_index, 0);
    assert_eq!(ctx.read_group(group.id).await.unwrap().order_index, 0);
}

#[tokio::test]
async fn empty_batch_reports_zero_updates() {
    let (_temp, ctx, board_id, _col_a, _col_b) = setup().await;

    let result = SyncItemPositions::new(board_id, ADMIN, Vec::new())
        .execute(&ctx)
        .await
        .unwrap();
    assert_eq!(result.updated, 0);
    assert!(result.changed_column_ids.is_empty());
    assert!(result.columns.is_empty());
}

#[tokio::test]
async fn outsiders_cannot_probe_boards() {
    let (_temp, ctx, board_id, col_a, _col_b) = setup().await;
    let outsider = ActorId::new(77);

    let item = AddItem::new(col_a, ADMIN).execute(&ctx).await.unwrap();

    // Denied access and a missing board read identically.
    let denied = SyncItemPositions::new(board_id, outsider, vec![to_root(item.id, col_a, 0)])
        .execute(&ctx)
        .await;
    assert!(matches!(denied, Err(BoardError::BoardNotFound { .. })));

    let missing = SyncItemPositions::new(
        BoardId::new(40404),
        ADMIN,
        vec![to_root(item.id, col_a, 0)],
    )
    .execute(&ctx)
    .await;
    assert!(matches!(missing, Err(BoardError::BoardNotFound { .. })));
}

#[tokio::test]
async fn unknown_group_in_batch_is_bad_request() {
    let (_temp, ctx, board_id, col_a, _col_b) = setup().await;

    let item = AddItem::new(col_a, ADMIN).execute(&ctx).await.unwrap();
    let result = SyncItemPositions::new(
        board_id,
        ADMIN,
        vec![ItemPositionChange {
            item_id: item.id,
            new_column_id: col_a,
            new_row_index: 0,
            new_group_id: Some(GroupId::new(999)),
        }],
    )
    .execute(&ctx)
    .await;
    assert!(matches!(result, Err(BoardError::BadRequest { .. })));
}
