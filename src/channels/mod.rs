//! Output channels
//!
//! Two independent pipelines: human-readable text lines and a JSON array of
//! event objects. Both write to externally owned [`Destination`]s.

pub mod destination;
pub mod pending;
pub mod structured;
pub mod text;

pub use destination::{Destination, SharedBuffer, SharedWriter};
pub use pending::{write_pending, PendingWrite};
pub use structured::{DetachedArrays, StructuredChannel, StructuredFormatter};
pub use text::{TextChannel, TextFormatter};
