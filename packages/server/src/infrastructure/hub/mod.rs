//! ConnectionHub の実装
//!
//! - `inmemory`: 単一プロセス内で完結するインメモリ実装

pub mod inmemory;

pub use inmemory::InMemoryHub;
