//! Top-level statement splitting for PHP snippets
//!
//! This is not a PHP parser. It knows just enough about strings, comments,
//! heredocs and bracket nesting to find where each top-level statement
//! ends, so that the final statement can be turned into a `return` when it
//! is a bare expression.

use std::ops::Range;

/// Keywords that start a statement which produces no value
const STATEMENT_KEYWORDS: &[&str] = &[
    "abstract", "break", "class", "const", "continue", "declare", "die", "do", "echo", "else",
    "elseif", "endfor", "endforeach", "endif", "endswitch", "endwhile", "enum", "exit", "final",
    "for", "foreach", "function", "global", "goto", "if", "include", "include_once", "interface",
    "namespace", "print", "readonly", "require", "require_once", "return", "switch", "throw",
    "trait", "try", "unset", "use", "while",
];

/// Keywords whose statement ends at the closing brace of its block
const BLOCK_KEYWORDS: &[&str] = &[
    "abstract", "class", "declare", "do", "enum", "final", "for", "foreach", "function", "if",
    "interface", "namespace", "readonly", "switch", "trait", "try", "while",
];

/// Keywords that continue a block statement after its closing brace
const CONTINUATION_KEYWORDS: &[&str] = &["catch", "else", "elseif", "finally", "while"];

/// One top-level statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement<'a> {
    /// Statement text, from its first significant character through its terminator
    pub text: &'a str,
    /// Byte range of `text` within the source
    pub span: Range<usize>,
    /// Whether the statement ended with `;` or a closing block brace
    pub terminated: bool,
}

impl Statement<'_> {
    /// Statement text without the trailing semicolon
    pub fn body(&self) -> &str {
        self.text.trim_end().trim_end_matches(';').trim_end()
    }

    /// Whether the statement is an expression whose value could be displayed
    pub fn is_expression(&self) -> bool {
        let body = self.body();
        if body.is_empty() || body.starts_with("#[") || body.starts_with('{') {
            return false;
        }

        match self.leading_keyword() {
            Some(word) if word == "static" => after_word(body, "static").starts_with("::"),
            Some(word) => !STATEMENT_KEYWORDS.contains(&word.as_str()),
            None => true,
        }
    }

    fn leading_keyword(&self) -> Option<String> {
        leading_word(self.body())
    }
}

/// Split `code` into top-level statements.
///
/// Returns `None` when the code cannot be split reliably: unbalanced
/// brackets, an unterminated string or comment, or inline `?>` markup.
pub fn split_statements(code: &str) -> Option<Vec<Statement<'_>>> {
    let bytes = code.as_bytes();
    let mut statements = Vec::new();
    let mut depth: usize = 0;
    let mut start: Option<usize> = None;
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        match c {
            b'\'' | b'"' | b'`' => {
                start.get_or_insert(i);
                i = skip_quoted(bytes, i)?;
                continue;
            }
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                i = skip_line_comment(bytes, i);
                continue;
            }
            b'#' if bytes.get(i + 1) != Some(&b'[') => {
                i = skip_line_comment(bytes, i);
                continue;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i = code[i + 2..].find("*/").map(|end| i + 2 + end + 2)?;
                continue;
            }
            b'<' if code[i..].starts_with("<<<") => {
                start.get_or_insert(i);
                i = skip_heredoc(code, i)?;
                continue;
            }
            b'?' if bytes.get(i + 1) == Some(&b'>') => return None,
            b'(' | b'[' | b'{' => {
                start.get_or_insert(i);
                depth += 1;
            }
            b')' | b']' => {
                depth = depth.checked_sub(1)?;
            }
            b'}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    if let Some(s) = start {
                        if ends_block_statement(code, s, i + 1) {
                            statements.push(statement(code, s, i + 1, true));
                            start = None;
                        }
                    }
                }
            }
            b';' if depth == 0 => {
                let s = start.unwrap_or(i);
                statements.push(statement(code, s, i + 1, true));
                start = None;
            }
            c if c.is_ascii_whitespace() => {}
            _ => {
                start.get_or_insert(i);
            }
        }
        i += 1;
    }

    if depth != 0 {
        return None;
    }
    if let Some(s) = start {
        statements.push(statement(code, s, code.len(), false));
    }
    Some(statements)
}

/// Rewrite the final statement into `return <expr>;` when it is an expression.
///
/// Returns the rewritten code, or `None` if the code is left as-is.
pub fn return_last_expression(code: &str) -> Option<String> {
    let statements = split_statements(code)?;
    let last = statements.last()?;
    if !last.is_expression() {
        return None;
    }

    let mut rewritten = String::with_capacity(code.len() + 8);
    rewritten.push_str(&code[..last.span.start]);
    rewritten.push_str("return ");
    rewritten.push_str(last.body());
    rewritten.push(';');
    rewritten.push_str(&code[last.span.end..]);
    Some(rewritten)
}

fn statement(code: &str, start: usize, end: usize, terminated: bool) -> Statement<'_> {
    let text = code[start..end].trim_end();
    Statement {
        text,
        span: start..start + text.len(),
        terminated,
    }
}

/// A closing brace ends the statement only for block constructs that are
/// not continued by `else`, `catch` and friends.
fn ends_block_statement(code: &str, start: usize, after_brace: usize) -> bool {
    let Some(word) = leading_word(&code[start..]) else {
        return false;
    };
    if !BLOCK_KEYWORDS.contains(&word.as_str()) {
        return false;
    }
    if word == "function" && is_closure(&code[start..]) {
        return false;
    }

    match leading_word(code[after_brace..].trim_start()) {
        Some(next) if CONTINUATION_KEYWORDS.contains(&next.as_str()) => {
            // `while` after `do` closes the loop; after any other block it starts a new one
            next == "while" && word != "do"
        }
        _ => word != "do",
    }
}

fn is_closure(text: &str) -> bool {
    let rest = after_word(text, "function").trim_start_matches('&').trim_start();
    rest.starts_with('(')
}

fn leading_word(text: &str) -> Option<String> {
    let word: String = text
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    if word.is_empty() || word.starts_with(|c: char| c.is_ascii_digit()) {
        None
    } else {
        Some(word.to_ascii_lowercase())
    }
}

fn after_word<'a>(text: &'a str, word: &str) -> &'a str {
    text.get(word.len()..).unwrap_or("").trim_start()
}

fn skip_quoted(bytes: &[u8], open: usize) -> Option<usize> {
    let quote = bytes[open];
    let mut i = open + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            c if c == quote => return Some(i + 1),
            _ => i += 1,
        }
    }
    None
}

fn skip_line_comment(bytes: &[u8], from: usize) -> usize {
    bytes[from..]
        .iter()
        .position(|&c| c == b'\n')
        .map(|offset| from + offset + 1)
        .unwrap_or(bytes.len())
}

fn skip_heredoc(code: &str, open: usize) -> Option<usize> {
    let header_end = code[open..].find('\n').map(|offset| open + offset)?;
    let label: String = code[open + 3..header_end]
        .trim()
        .trim_matches(|c| c == '\'' || c == '"')
        .to_string();
    if label.is_empty() || !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return None;
    }

    let mut line_start = header_end + 1;
    while line_start <= code.len() {
        let line_end = code[line_start..]
            .find('\n')
            .map(|offset| line_start + offset)
            .unwrap_or(code.len());
        let line = &code[line_start..line_end];
        let indent = line.len() - line.trim_start().len();
        if let Some(rest) = line.trim_start().strip_prefix(label.as_str()) {
            if !rest.starts_with(|c: char| c.is_ascii_alphanumeric() || c == '_') {
                return Some(line_start + indent + label.len());
            }
        }
        if line_end == code.len() {
            break;
        }
        line_start = line_end + 1;
    }
    None
}
