//! Default implementations of the core interfaces

pub mod os_file_system;
pub mod php_process_runner;

pub use os_file_system::OsFileSystem;
pub use php_process_runner::PhpProcessRunner;
