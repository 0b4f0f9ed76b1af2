//! The `Execute` trait: operations are structs whose fields are the
//! parameters.
//!
//! Each operation lives in its own file under a noun module
//! (`column::CreateColumn`, `item::SyncItemPositions`, ...), carries the
//! acting user, and produces a typed, serializable output the transport
//! layer can emit verbatim.

pub use async_trait::async_trait;

/// Execute an operation against a context.
#[async_trait]
pub trait Execute<Ctx, Err> {
    /// Typed response of the operation.
    type Output;

    /// Run the operation. Mutating operations validate before writing and
    /// commit all writes as one unit.
    async fn execute(&self, ctx: &Ctx) -> std::result::Result<Self::Output, Err>;
}
