use serde::{Deserialize, Serialize};

/// What a completion item inserts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionKind {
    Function,
    Class,
    Variable,
    Constant,
}

/// Editor completion hint contributed by a bootstrapper
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Completion {
    pub label: String,
    pub kind: CompletionKind,
    /// Snippet text with `${n:placeholder}` tab stops
    pub insert_text: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub documentation: String,
}

impl Completion {
    pub fn function(label: &str, insert_text: &str, documentation: &str) -> Self {
        Self {
            label: label.to_string(),
            kind: CompletionKind::Function,
            insert_text: insert_text.to_string(),
            documentation: documentation.to_string(),
        }
    }

    pub fn class(label: &str, insert_text: &str, documentation: &str) -> Self {
        Self {
            label: label.to_string(),
            kind: CompletionKind::Class,
            insert_text: insert_text.to_string(),
            documentation: documentation.to_string(),
        }
    }
}
