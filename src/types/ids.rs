//! Numeric id newtypes to prevent mixing up entity identifiers.
//!
//! Ids are allocated from a single persisted sequence (see
//! [`crate::BoardContext::allocate_id`]), so raw values are unique across
//! entity kinds. The raw value also serves as the final ordering
//! tie-break, which is why ids are integers rather than opaque strings.

use serde::{Deserialize, Serialize};

/// Identifier of a team (board owner / broadcast scope).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TeamId(i64);

/// Identifier of a board.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct BoardId(i64);

/// Identifier of a column.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ColumnId(i64);

/// Identifier of a group (sub-container within a column).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct GroupId(i64);

/// Identifier of an item (card).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ItemId(i64);

/// Identifier of an acting user or agent.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ActorId(i64);

macro_rules! impl_id {
    ($name:ident) => {
        impl $name {
            /// Wrap a raw id value.
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// The raw numeric value.
            pub const fn value(&self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

impl_id!(TeamId);
impl_id!(BoardId);
impl_id!(ColumnId);
impl_id!(GroupId);
impl_id!(ItemId);
impl_id!(ActorId);
