//! The expression buffer: the single text string under construction.
//!
//! Pure string manipulation, no I/O. Invariant: the buffer never ends with
//! two operator tokens in a row. Pushing an operator while one is pending
//! replaces it (the merge rule).

use crate::types::Operator;

/// Length of an operator token such as `" + "`.
const OPERATOR_TOKEN_LEN: usize = 3;

/// Text shown when evaluation fails.
pub const ERROR_MARKER: &str = "Error";

/// In-progress expression text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpressionBuffer {
    text: String,
}

impl ExpressionBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Append text verbatim. Digits, dots and parentheses go through here
    /// without validation.
    pub fn append(&mut self, s: &str) {
        self.text.push_str(s);
    }

    /// The operator of a trailing `" X "` token, if any.
    pub fn trailing_operator(&self) -> Option<Operator> {
        let bytes = self.text.as_bytes();
        if bytes.len() < OPERATOR_TOKEN_LEN {
            return None;
        }
        let tail = &bytes[bytes.len() - OPERATOR_TOKEN_LEN..];
        if tail[0] != b' ' || tail[2] != b' ' {
            return None;
        }
        Operator::from_char(tail[1] as char)
    }

    /// Append `" op "`, replacing a trailing operator token if present.
    ///
    /// Returns true when an existing operator was replaced.
    pub fn push_operator(&mut self, op: Operator) -> bool {
        let merged = self.drop_trailing_operator();
        self.text.push_str(&op.token());
        merged
    }

    /// Remove the last unit of input: a whole operator token, or one char.
    ///
    /// Empty buffer is a no-op.
    pub fn backspace(&mut self) {
        if self.drop_trailing_operator() {
            return;
        }
        self.text.pop();
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    /// Replace the whole content (evaluation result or error marker).
    pub fn replace(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    fn drop_trailing_operator(&mut self) -> bool {
        if self.trailing_operator().is_some() {
            // Token is pure ASCII, so byte truncation lands on a char boundary.
            self.text.truncate(self.text.len() - OPERATOR_TOKEN_LEN);
            true
        } else {
            false
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
