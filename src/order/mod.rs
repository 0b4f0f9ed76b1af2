//! Container ordering: entry tokens and the renumbering pass.

mod entry;
mod renumber;

pub use entry::{EntryRef, RootEntry};
pub use renumber::{compact, renumber, MovePreference, PreferenceMap};
