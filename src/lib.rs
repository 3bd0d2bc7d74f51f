pub mod core;

// Re-export key items for easy importing in this crate
pub use crate::core::store::{FsTableStore, MemoryTableStore, TableStore};
pub use crate::core::types;

// Re-export key items for easy importing in other crates
pub use crate::core::chart;
pub use crate::core::engine::aggregate;
pub use crate::core::engine::log_parser;
pub use crate::core::main_shared::run_main;
