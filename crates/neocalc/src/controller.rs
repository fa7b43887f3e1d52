//! Calculator controller
//!
//! Owns the in-progress expression, the history log and the theme, and
//! persists the latter two through a [`KeyValueStore`]. Storage failures are
//! logged and never touch the expression buffer or the in-memory history.

use tracing::{debug, info, warn};

use crate::assistant;
use crate::config::{CalculatorConfig, ConfigResult};
use crate::core::history::{History, HistoryEntry};
use crate::core::namespace::MathNamespace;
use crate::core::{Evaluation, Evaluator};
use crate::keypad::KeypadAction;
use crate::speech;
use crate::store::KeyValueStore;
use crate::theme::Theme;

/// Text shown on screen for an empty expression
const EMPTY_SCREEN: &str = "0";

/// Calculator state object driven by UI events
#[derive(Debug)]
pub struct Calculator<S: KeyValueStore> {
    config: CalculatorConfig,
    evaluator: Evaluator,
    history: History,
    expression: String,
    theme: Theme,
    store: S,
}

impl<S: KeyValueStore> Calculator<S> {
    /// Creates a calculator with default config and empty state
    #[must_use]
    pub fn new(store: S) -> Self {
        Self::build(store, CalculatorConfig::default())
    }

    /// Creates a calculator with default config and restores history and
    /// theme from the store
    #[must_use]
    pub fn open(store: S) -> Self {
        let mut calc = Self::new(store);
        calc.restore();
        calc
    }

    /// Creates a calculator with empty state; nothing is read from the store.
    ///
    /// Fails if `config` does not pass [`CalculatorConfig::validate`].
    pub fn with_config(store: S, config: CalculatorConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self::build(store, config))
    }

    /// Creates a calculator and restores history and theme from the store.
    ///
    /// Unreadable or corrupt stored data is logged and ignored; an invalid
    /// `config` is an error.
    pub fn load(store: S, config: CalculatorConfig) -> ConfigResult<Self> {
        let mut calc = Self::with_config(store, config)?;
        calc.restore();
        Ok(calc)
    }

    fn build(store: S, config: CalculatorConfig) -> Self {
        Self {
            evaluator: Evaluator::with_namespace(MathNamespace::with_prefix(
                config.namespace_prefix.clone(),
            )),
            history: History::with_capacity(config.history_capacity),
            expression: String::new(),
            theme: Theme::default(),
            store,
            config,
        }
    }

    fn restore(&mut self) {
        match self.store.get(&self.config.history_key) {
            Ok(Some(json)) => match History::from_json(&json, self.config.history_capacity) {
                Ok(history) => {
                    debug!(entries = history.len(), "restored history");
                    self.history = history;
                }
                Err(e) => warn!(error = %e, "ignoring corrupt stored history"),
            },
            Ok(None) => {}
            Err(e) => warn!(error = %e, "could not read stored history"),
        }

        match self.store.get(&self.config.theme_key) {
            Ok(Some(value)) => self.theme = Theme::from_stored(&value),
            Ok(None) => {}
            Err(e) => warn!(error = %e, "could not read stored theme"),
        }
    }

    /// Current expression buffer
    #[must_use]
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Text for the main display: the expression, or `0` when empty
    #[must_use]
    pub fn screen(&self) -> &str {
        if self.expression.is_empty() {
            EMPTY_SCREEN
        } else {
            &self.expression
        }
    }

    /// Display string of the most recent history entry, or empty
    #[must_use]
    pub fn history_mini(&self) -> String {
        self.history
            .last()
            .map(HistoryEntry::display)
            .unwrap_or_default()
    }

    /// The history log
    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Active theme
    #[must_use]
    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Active configuration
    #[must_use]
    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    /// The evaluator in use
    #[must_use]
    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    /// The backing store
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Appends text to the expression
    pub fn append(&mut self, text: &str) {
        self.expression.push_str(text);
    }

    /// Appends a speech transcript after operator-word substitution
    pub fn append_transcript(&mut self, transcript: &str) {
        let mapped = speech::transcript_to_expression(transcript);
        self.expression.push_str(&mapped);
    }

    /// Removes the last character of the expression
    pub fn delete_last(&mut self) {
        self.expression.pop();
    }

    /// Clears the expression
    pub fn clear(&mut self) {
        self.expression.clear();
    }

    /// Replaces the expression
    pub fn set_expression(&mut self, expression: impl Into<String>) {
        self.expression = expression.into();
    }

    /// Evaluates the expression, records `(expression, result)` in history,
    /// persists it, and replaces the expression with the rendered result.
    pub fn calculate(&mut self) -> Evaluation {
        let evaluation = self.evaluator.evaluate(&self.expression);
        let result_text = evaluation.render(&self.config.failure_text);
        debug!(expression = %self.expression, result = %result_text, "calculated");

        self.history.record(&self.expression, &result_text);
        self.persist_history();
        self.expression = result_text;
        evaluation
    }

    /// Loads the expression of a history entry (0 = newest) into the buffer.
    ///
    /// Returns false when the index is out of range.
    pub fn recall(&mut self, index_from_newest: usize) -> bool {
        match self.history.get_from_newest(index_from_newest) {
            Some(entry) => {
                self.expression = entry.expression.trim().to_string();
                true
            }
            None => false,
        }
    }

    /// Empties the history and removes it from the store
    pub fn clear_history(&mut self) {
        self.history.clear();
        if let Err(e) = self.store.remove(&self.config.history_key) {
            warn!(error = %e, "could not remove stored history");
        }
        info!("history cleared");
    }

    /// Switches between dark and light and persists the choice
    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggle();
        if let Err(e) = self.store.set(&self.config.theme_key, self.theme.as_str()) {
            warn!(error = %e, "could not persist theme");
        }
        self.theme
    }

    /// Applies a keypad action; returns the evaluation for `Equals`
    pub fn apply(&mut self, action: &KeypadAction) -> Option<Evaluation> {
        match action {
            KeypadAction::Insert(text) => self.append(text),
            KeypadAction::Delete => self.delete_last(),
            KeypadAction::Clear => self.clear(),
            KeypadAction::Equals => return Some(self.calculate()),
        }
        None
    }

    /// Answers a question with the local helper; `None` for a blank question
    #[must_use]
    pub fn ask(&self, question: &str) -> Option<String> {
        assistant::local_answer(question, &self.evaluator, &self.config.failure_text)
    }

    fn persist_history(&mut self) {
        let json = match self.history.to_json() {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "could not serialize history");
                return;
            }
        };
        if let Err(e) = self.store.set(&self.config.history_key, &json) {
            warn!(error = %e, "could not persist history");
        }
    }
}
