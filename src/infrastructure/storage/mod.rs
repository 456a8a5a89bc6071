//! Slice storage adapters

mod factory;
mod file_storage;
mod memory_storage;

pub use factory::build_storage;
pub use file_storage::JsonFileSliceStorage;
pub use memory_storage::InMemorySliceStorage;
