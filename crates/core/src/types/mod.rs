pub mod completion;
pub mod context;

// Re-export commonly used types
pub use completion::{Completion, CompletionKind};
pub use context::WorkspaceContext;
