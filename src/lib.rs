//! Board layout ordering engine with file-backed storage.
//!
//! This crate is the ordering core of a collaborative board: columns hold
//! an interleaved sequence of groups and items (cards), items can live
//! inside a group, and concurrent drag-and-drop converges to one
//! consistent, gap-free order per container. Every structural edit
//! (create, delete, move, batch position sync) renumbers exactly the
//! containers it disturbed, with a deterministic tie-break so two moves
//! targeting the same slot resolve the same way on every replica.
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use retroboard::{BoardContext, Execute};
//! use retroboard::board::CreateBoard;
//! use retroboard::column::CreateColumn;
//! use retroboard::item::AddItem;
//! use retroboard::types::{ActorId, TeamId};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let ctx = BoardContext::new("/path/to/data");
//! let actor = ActorId::new(1);
//!
//! let board = CreateBoard::new(TeamId::new(1), actor, "Sprint retro")
//!     .execute(&ctx)
//!     .await?;
//! let column = CreateColumn::new(board.id, actor)
//!     .with_name("Went well")
//!     .execute(&ctx)
//!     .await?;
//! AddItem::new(column.id, actor)
//!     .with_description("Pairing on the migration")
//!     .execute(&ctx)
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Storage Structure
//!
//! ```text
//! data/
//! ├── boards/
//! │   └── {id}.json        # Board metadata
//! ├── columns/
//! │   └── {id}.json        # Column state (order among siblings)
//! ├── groups/
//! │   └── {id}.json        # Group state (index in the root sequence)
//! ├── items/
//! │   └── {id}.json        # Item state (container + index)
//! ├── teams/
//! │   └── {id}.json        # Team roster consulted for access
//! ├── activity/
//! │   └── current.jsonl    # Mutation log, one JSON object per line
//! ├── sequence.json        # Persisted id sequence
//! └── .lock                # Exclusive lock taken for each mutation
//! ```
//!
//! Mutating operations take the store lock for their duration, validate
//! the full request before the first write, and flush one write set at
//! the end, so a rejected request leaves the store untouched.

pub mod access;
pub mod auto_color;
mod context;
mod error;
mod operation;
pub mod order;
mod state;
pub mod types;
pub mod view;

// Operation modules
pub mod board;
pub mod column;
pub mod group;
pub mod item;

pub use access::{AccessResolver, ResolvedContext, TeamRoster};
pub use context::{BoardContext, BoardLock, DATA_DIR_NAME};
pub use error::{BoardError, Result};
pub use operation::{async_trait, Execute};
pub use state::BoardState;

// Re-export commonly used types
pub use types::{
    ActorId, Board, BoardId, Column, ColumnId, EntityColor, Group, GroupId, Item, ItemId,
    LogEntry, Role, Team, TeamId,
};
pub use view::{
    BoardView, ColumnView, Deleted, GroupView, ItemView, RootEntryView, SyncResult,
};
