//! Adapters implementing the outbound ports

pub mod memory_archive;

pub use memory_archive::InMemoryBlockArchive;
