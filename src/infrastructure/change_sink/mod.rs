//! # Change Sinks
//!
//! Port and adapters receiving change records from quote sessions.
//!
//! - [`ChannelChangeSink`]: tokio unbounded channel, never blocks
//! - [`InMemoryChangeLog`]: batched buffer drained by the consumer

pub mod channel;
pub mod in_memory;
pub mod traits;

pub use channel::ChannelChangeSink;
pub use in_memory::InMemoryChangeLog;
pub use traits::ChangeSink;
