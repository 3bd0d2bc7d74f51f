pub mod config;
mod error;
mod format;
mod key;
mod layout;
mod stats;
mod table;

pub use error::*;
pub use format::*;
pub use key::*;
pub use layout::*;
pub use stats::*;
pub use table::*;
