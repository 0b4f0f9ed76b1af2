//! BoardContext - I/O primitives for board storage.
//!
//! The context provides access, not logic: one JSON file per entity under
//! the data directory, atomic writes via temp file + rename, an exclusive
//! lock file as the mutation transaction boundary, a persisted id
//! sequence, and the activity log. Operations do all the work.

use crate::access::{AccessResolver, TeamRoster};
use crate::error::{BoardError, Result};
use crate::types::{
    Board, BoardId, Column, ColumnId, Group, GroupId, Item, ItemId, LogEntry, Team, TeamId,
};
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Directory name searched for by [`BoardContext::find`].
pub const DATA_DIR_NAME: &str = ".retroboard";

/// Persisted id sequence. Ids are shared across all entity kinds.
#[derive(Debug, Serialize, Deserialize)]
struct Sequence {
    next: i64,
}

/// Context passed to every operation.
pub struct BoardContext {
    /// Path to the data directory.
    root: PathBuf,
    /// Capability check collaborator.
    access: Arc<dyn AccessResolver>,
}

impl BoardContext {
    /// Create a context for the given data directory, with membership
    /// resolved from the directory's own `teams/` records.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let access = Arc::new(TeamRoster::new(root.clone()));
        Self { root, access }
    }

    /// Create a context with a custom access resolver.
    pub fn with_resolver(root: impl Into<PathBuf>, access: Arc<dyn AccessResolver>) -> Self {
        Self {
            root: root.into(),
            access,
        }
    }

    /// Create a context by finding the data directory upward from a
    /// starting path.
    pub fn find(start: impl AsRef<Path>) -> Result<Self> {
        let mut current = start.as_ref().to_path_buf();

        loop {
            let data_dir = current.join(DATA_DIR_NAME);
            if data_dir.is_dir() {
                return Ok(Self::new(data_dir));
            }

            if !current.pop() {
                return Err(BoardError::NotInitialized {
                    path: start.as_ref().to_path_buf(),
                });
            }
        }
    }

    /// The access resolver in use.
    pub fn access(&self) -> &dyn AccessResolver {
        self.access.as_ref()
    }

    // =========================================================================
    // Path helpers
    // =========================================================================

    /// Get the root data directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn boards_dir(&self) -> PathBuf {
        self.root.join("boards")
    }

    pub fn board_path(&self, id: BoardId) -> PathBuf {
        self.boards_dir().join(format!("{}.json", id))
    }

    pub fn columns_dir(&self) -> PathBuf {
        self.root.join("columns")
    }

    pub fn column_path(&self, id: ColumnId) -> PathBuf {
        self.columns_dir().join(format!("{}.json", id))
    }

    pub fn groups_dir(&self) -> PathBuf {
        self.root.join("groups")
    }

    pub fn group_path(&self, id: GroupId) -> PathBuf {
        self.groups_dir().join(format!("{}.json", id))
    }

    pub fn items_dir(&self) -> PathBuf {
        self.root.join("items")
    }

    pub fn item_path(&self, id: ItemId) -> PathBuf {
        self.items_dir().join(format!("{}.json", id))
    }

    pub fn teams_dir(&self) -> PathBuf {
        self.root.join("teams")
    }

    pub fn team_path(&self, id: TeamId) -> PathBuf {
        self.teams_dir().join(format!("{}.json", id))
    }

    pub fn activity_dir(&self) -> PathBuf {
        self.root.join("activity")
    }

    pub fn activity_path(&self) -> PathBuf {
        self.activity_dir().join("current.jsonl")
    }

    fn sequence_path(&self) -> PathBuf {
        self.root.join("sequence.json")
    }

    fn lock_path(&self) -> PathBuf {
        self.root.join(".lock")
    }

    // =========================================================================
    // Directory initialization
    // =========================================================================

    /// Check if all required directories exist.
    pub fn directories_exist(&self) -> bool {
        self.root.exists()
            && self.boards_dir().exists()
            && self.columns_dir().exists()
            && self.groups_dir().exists()
            && self.items_dir().exists()
            && self.teams_dir().exists()
            && self.activity_dir().exists()
    }

    /// Create the data directory tree.
    pub async fn create_directories(&self) -> Result<()> {
        fs::create_dir_all(&self.root).await?;
        fs::create_dir_all(self.boards_dir()).await?;
        fs::create_dir_all(self.columns_dir()).await?;
        fs::create_dir_all(self.groups_dir()).await?;
        fs::create_dir_all(self.items_dir()).await?;
        fs::create_dir_all(self.teams_dir()).await?;
        fs::create_dir_all(self.activity_dir()).await?;
        Ok(())
    }

    /// Ensure directories exist, creating them if needed. Idempotent.
    pub async fn ensure_directories(&self) -> Result<()> {
        if !self.directories_exist() {
            self.create_directories().await?;
        }
        Ok(())
    }

    // =========================================================================
    // Generic entity I/O
    // =========================================================================

    async fn read_json<T: DeserializeOwned>(&self, path: &Path) -> Result<Option<T>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path).await?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    async fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> Result<()> {
        let content = serde_json::to_string_pretty(value)?;
        atomic_write(path, content.as_bytes()).await
    }

    async fn remove_file(&self, path: &Path) -> Result<()> {
        if path.exists() {
            fs::remove_file(path).await?;
        }
        Ok(())
    }

    /// List entity ids in a directory by parsing numeric file stems.
    async fn list_ids(&self, dir: &Path) -> Result<Vec<i64>> {
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut ids = Vec::new();
        let mut entries = fs::read_dir(dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if let Ok(raw) = stem.parse::<i64>() {
                    ids.push(raw);
                }
            }
        }

        ids.sort_unstable();
        Ok(ids)
    }

    // =========================================================================
    // Board I/O
    // =========================================================================

    pub async fn read_board(&self, id: BoardId) -> Result<Board> {
        let mut board: Board = self
            .read_json(&self.board_path(id))
            .await?
            .ok_or(BoardError::BoardNotFound { id })?;
        board.id = id;
        Ok(board)
    }

    pub async fn write_board(&self, board: &Board) -> Result<()> {
        self.write_json(&self.board_path(board.id), board).await
    }

    pub async fn delete_board_file(&self, id: BoardId) -> Result<()> {
        self.remove_file(&self.board_path(id)).await
    }

    pub async fn list_board_ids(&self) -> Result<Vec<BoardId>> {
        let raw = self.list_ids(&self.boards_dir()).await?;
        Ok(raw.into_iter().map(BoardId::new).collect())
    }

    // =========================================================================
    // Column I/O
    // =========================================================================

    pub async fn read_column(&self, id: ColumnId) -> Result<Column> {
        let mut column: Column = self
            .read_json(&self.column_path(id))
            .await?
            .ok_or(BoardError::ColumnNotFound { id })?;
        column.id = id;
        Ok(column)
    }

    pub async fn write_column(&self, column: &Column) -> Result<()> {
        self.write_json(&self.column_path(column.id), column).await
    }

    pub async fn delete_column_file(&self, id: ColumnId) -> Result<()> {
        self.remove_file(&self.column_path(id)).await
    }

    pub async fn read_all_columns(&self) -> Result<Vec<Column>> {
        let ids = self.list_ids(&self.columns_dir()).await?;
        let mut columns = Vec::with_capacity(ids.len());
        for raw in ids {
            columns.push(self.read_column(ColumnId::new(raw)).await?);
        }
        Ok(columns)
    }

    // =========================================================================
    // Group I/O
    // =========================================================================

    pub async fn read_group(&self, id: GroupId) -> Result<Group> {
        let mut group: Group = self
            .read_json(&self.group_path(id))
            .await?
            .ok_or(BoardError::GroupNotFound { id })?;
        group.id = id;
        Ok(group)
    }

    pub async fn write_group(&self, group: &Group) -> Result<()> {
        self.write_json(&self.group_path(group.id), group).await
    }

    pub async fn delete_group_file(&self, id: GroupId) -> Result<()> {
        self.remove_file(&self.group_path(id)).await
    }

    pub async fn read_all_groups(&self) -> Result<Vec<Group>> {
        let ids = self.list_ids(&self.groups_dir()).await?;
        let mut groups = Vec::with_capacity(ids.len());
        for raw in ids {
            groups.push(self.read_group(GroupId::new(raw)).await?);
        }
        Ok(groups)
    }

    // =========================================================================
    // Item I/O
    // =========================================================================

    pub async fn read_item(&self, id: ItemId) -> Result<Item> {
        let mut item: Item = self
            .read_json(&self.item_path(id))
            .await?
            .ok_or(BoardError::ItemNotFound { id })?;
        item.id = id;
        Ok(item)
    }

    pub async fn write_item(&self, item: &Item) -> Result<()> {
        self.write_json(&self.item_path(item.id), item).await
    }

    pub async fn delete_item_file(&self, id: ItemId) -> Result<()> {
        self.remove_file(&self.item_path(id)).await
    }

    pub async fn read_all_items(&self) -> Result<Vec<Item>> {
        let ids = self.list_ids(&self.items_dir()).await?;
        let mut items = Vec::with_capacity(ids.len());
        for raw in ids {
            items.push(self.read_item(ItemId::new(raw)).await?);
        }
        Ok(items)
    }

    // =========================================================================
    // Team I/O
    // =========================================================================

    pub async fn read_team(&self, id: TeamId) -> Result<Team> {
        let mut team: Team = self
            .read_json(&self.team_path(id))
            .await?
            .ok_or(BoardError::TeamNotFound { id })?;
        team.id = id;
        Ok(team)
    }

    pub async fn write_team(&self, team: &Team) -> Result<()> {
        self.write_json(&self.team_path(team.id), team).await
    }

    // =========================================================================
    // Id allocation
    // =========================================================================

    /// Allocate the next entity id from the persisted sequence.
    ///
    /// Callers hold the store lock, so read-increment-write is safe.
    pub async fn allocate_id(&self) -> Result<i64> {
        let path = self.sequence_path();
        let sequence: Sequence = self
            .read_json(&path)
            .await?
            .unwrap_or(Sequence { next: 1 });
        let allocated = sequence.next;
        self.write_json(
            &path,
            &Sequence {
                next: allocated + 1,
            },
        )
        .await?;
        Ok(allocated)
    }

    // =========================================================================
    // Activity log
    // =========================================================================

    /// Append an entry to the activity log.
    pub async fn append_activity(&self, entry: &LogEntry) -> Result<()> {
        let path = self.activity_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut line = serde_json::to_string(entry)?;
        line.push('\n');

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    /// Read activity entries, newest first.
    pub async fn read_activity(&self, limit: Option<usize>) -> Result<Vec<LogEntry>> {
        let path = self.activity_path();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&path).await?;
        let mut entries = Vec::new();
        for line in content.lines() {
            if line.trim().is_empty() {
                continue;
            }
            entries.push(serde_json::from_str::<LogEntry>(line)?);
        }

        entries.reverse();
        if let Some(limit) = limit {
            entries.truncate(limit);
        }
        Ok(entries)
    }

    // =========================================================================
    // Locking
    // =========================================================================

    /// Try to acquire the store's exclusive lock (non-blocking).
    pub async fn lock(&self) -> Result<BoardLock> {
        self.ensure_directories().await?;
        let lock_path = self.lock_path();

        let file = std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&lock_path)?;

        match file.try_lock_exclusive() {
            Ok(()) => Ok(BoardLock { file }),
            Err(_) => Err(BoardError::LockBusy),
        }
    }

    /// Acquire the lock, retrying until `timeout` elapses.
    pub async fn lock_wait(&self, timeout: Duration) -> Result<BoardLock> {
        let start = Instant::now();
        loop {
            match self.lock().await {
                Ok(lock) => return Ok(lock),
                Err(BoardError::LockBusy) => {
                    if start.elapsed() >= timeout {
                        return Err(BoardError::LockTimeout {
                            elapsed_ms: start.elapsed().as_millis() as u64,
                        });
                    }
                    tokio::time::sleep(Duration::from_millis(25)).await;
                }
                Err(other) => return Err(other),
            }
        }
    }
}

/// RAII lock guard - releases on drop.
pub struct BoardLock {
    file: std::fs::File,
}

impl Drop for BoardLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

/// Atomic write via temp file and rename.
async fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content).await?;
    fs::rename(&temp_path, path).await?;
    Ok(())
}
