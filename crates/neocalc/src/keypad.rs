//! Keypad and keyboard input
//!
//! Maps button attributes and key names to [`KeypadAction`]s that the
//! controller applies to the expression buffer.

/// Actions that keypad buttons and keys can perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeypadAction {
    /// Append text to the expression (digits, operators, `sqrt(`, ...)
    Insert(String),
    /// Remove the last character
    Delete,
    /// Clear the expression
    Clear,
    /// Evaluate the expression
    Equals,
}

impl KeypadAction {
    /// Creates an insert action
    #[must_use]
    pub fn insert(text: impl Into<String>) -> Self {
        Self::Insert(text.into())
    }

    /// Maps a button's value/function attributes to an action.
    ///
    /// A function attribute (`clear`, `del`, `equals`) wins over a value;
    /// an unknown function yields `None`.
    #[must_use]
    pub fn from_button(value: Option<&str>, function: Option<&str>) -> Option<Self> {
        match (function, value) {
            (Some("clear"), _) => Some(Self::Clear),
            (Some("del"), _) => Some(Self::Delete),
            (Some("equals"), _) => Some(Self::Equals),
            (Some(_), _) => None,
            (None, Some(v)) => Some(Self::insert(v)),
            (None, None) => None,
        }
    }

    /// Maps a keyboard key name to an action
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "Enter" | "=" => Some(Self::Equals),
            "Backspace" | "Delete" => Some(Self::Delete),
            "Escape" | "c" | "C" => Some(Self::Clear),
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch), None) if is_expression_char(ch) => Some(Self::insert(key)),
                    _ => None,
                }
            }
        }
    }
}

fn is_expression_char(ch: char) -> bool {
    ch.is_ascii_digit()
        || matches!(
            ch,
            '.' | '+' | '-' | '*' | '/' | '%' | '^' | '(' | ')' | '×' | '÷' | '−'
        )
}
