//! Item operations.

mod add;
mod delete;
mod sync;
mod update;

pub use add::AddItem;
pub use delete::DeleteItem;
pub use sync::{ItemPositionChange, SyncItemPositions};
pub use update::UpdateItem;
