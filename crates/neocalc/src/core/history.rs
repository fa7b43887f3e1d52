//! Bounded calculation history
//!
//! Ordered oldest first; pushing past capacity drops the oldest entry.
//! Persisted as a JSON array of `"<expression> = <result>"` strings.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Separator between expression and result in the display form
const SEPARATOR: &str = " = ";

/// A single entry in the calculation history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// The expression as the user entered it
    pub expression: String,
    /// The rendered result (a number or the failure text)
    pub result: String,
}

impl HistoryEntry {
    /// Creates a new history entry
    #[must_use]
    pub fn new(expression: impl Into<String>, result: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            result: result.into(),
        }
    }

    /// Returns the display string `"<expression> = <result>"`
    #[must_use]
    pub fn display(&self) -> String {
        format!("{}{SEPARATOR}{}", self.expression, self.result)
    }

    /// Parses a display string back into an entry.
    ///
    /// Splits on the last separator; text without one becomes the expression
    /// with an empty result.
    #[must_use]
    pub fn parse(display: &str) -> Self {
        match display.rsplit_once(SEPARATOR) {
            Some((expression, result)) => Self::new(expression, result),
            None => Self::new(display, ""),
        }
    }
}

/// Calculator history manager
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    /// Default maximum history size
    pub const DEFAULT_CAPACITY: usize = 60;

    /// Creates a new history with default capacity
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Creates a history keeping at most `capacity` entries.
    ///
    /// Storage grows on demand; at most [`Self::DEFAULT_CAPACITY`] slots are
    /// reserved up front.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(Self::DEFAULT_CAPACITY)),
            capacity,
        }
    }

    /// Appends an entry, dropping the oldest past capacity
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push_back(entry);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// Appends an `(expression, result)` pair
    pub fn record(&mut self, expression: &str, result: &str) {
        self.push(HistoryEntry::new(expression, result));
    }

    /// Returns the number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the history is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the maximum number of entries
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Clears all history entries
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Returns an iterator over the entries (oldest first)
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Returns an iterator over the entries (newest first)
    pub fn iter_rev(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter().rev()
    }

    /// Returns the most recent entry
    #[must_use]
    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.back()
    }

    /// Returns the entry at `index` counted from the newest (0 = newest)
    #[must_use]
    pub fn get_from_newest(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.iter().rev().nth(index)
    }

    /// Display strings, newest first
    #[must_use]
    pub fn displays_rev(&self) -> Vec<String> {
        self.iter_rev().map(HistoryEntry::display).collect()
    }

    /// Serializes the history as a JSON array of display strings
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let displays: Vec<String> = self.iter().map(HistoryEntry::display).collect();
        serde_json::to_string(&displays)
    }

    /// Deserializes history from a JSON array of display strings, keeping
    /// the most recent `capacity` entries
    pub fn from_json(json: &str, capacity: usize) -> Result<Self, serde_json::Error> {
        let displays: Vec<String> = serde_json::from_str(json)?;
        let mut history = Self::with_capacity(capacity);
        for display in &displays {
            history.push(HistoryEntry::parse(display));
        }
        Ok(history)
    }
}
