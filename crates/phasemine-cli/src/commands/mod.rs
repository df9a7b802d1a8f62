//! Command implementations.

pub mod clean;
pub mod config;
pub mod extract;

pub use self::clean::execute_clean;
pub use self::config::execute_config;
pub use self::extract::{execute_extract, execute_run};
