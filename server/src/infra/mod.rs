//! Infrastructure layer: repository variants and backend adapters.

pub(crate) mod collection;
pub mod dual;
pub mod file;
pub mod memory;
pub mod memory_store;
pub mod redis_store;

pub use dual::DualRepository;
pub use file::FileRepository;
pub use memory::MemoryRepository;
pub use memory_store::{MemoryDocumentStore, MemoryLogStore};
pub use redis_store::{RedisDocumentStore, RedisLogStore};
