pub mod cli;
pub mod commands;
pub mod logging;

// Re-export commonly used items
pub use cli::{Commands, GlobalArgs, Tinkersan};
