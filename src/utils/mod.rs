//! Utils - Configuration, logging and formatting

pub mod config_store;
pub mod format;
pub mod logging;

pub use config_store::*;
pub use format::*;
pub use logging::*;
