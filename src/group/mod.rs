//! Group operations.

mod create;
mod delete;
mod sync;
mod update;

pub use create::CreateGroup;
pub use delete::DeleteGroup;
pub use sync::{GroupPositionChange, SyncGroupPositions};
pub use update::UpdateGroup;
