//! Vector index backends implementing [`docret_core::VectorIndex`].
//!
//! - [`LanceIndex`]: an existing on-disk LanceDB table (see [`schema`])
//! - [`MemoryIndex`]: exhaustive in-memory search, for tests and small corpora

pub mod lance;
pub mod memory;
pub mod schema;

pub use lance::LanceIndex;
pub use memory::MemoryIndex;
