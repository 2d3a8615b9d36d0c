// file: src/database/mod.rs
// description: response cache storage module exports
// reference: internal module structure

pub mod client;
pub mod insert;
pub mod memory;
pub mod schema;
pub mod store;

pub use client::LanceDbClient;
pub use insert::ResponseInserter;
pub use memory::MemoryResponseStore;
pub use schema::SchemaManager;
pub use store::{LanceResponseStore, ResponseStore};
