//! In-process token store.

pub mod memory;

pub use memory::MemoryTokenStore;
