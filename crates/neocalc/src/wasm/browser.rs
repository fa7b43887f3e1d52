//! Browser WASM bindings for the calculator

use wasm_bindgen::prelude::*;
use web_sys::console;

use crate::controller::Calculator;
use crate::keypad::KeypadAction;
use crate::wasm::storage::PageStore;

/// Browser Calculator - the main WASM entry point
#[derive(Debug)]
#[wasm_bindgen]
pub struct BrowserCalculator {
    inner: Calculator<PageStore>,
}

#[wasm_bindgen]
impl BrowserCalculator {
    /// Create a calculator backed by local storage, restoring saved state
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        console_error_panic_hook::set_once();

        Self {
            inner: Calculator::open(PageStore::open()),
        }
    }

    /// Text for the main display
    #[wasm_bindgen(getter)]
    pub fn screen(&self) -> String {
        self.inner.screen().to_string()
    }

    /// Current expression
    #[wasm_bindgen(getter)]
    pub fn expression(&self) -> String {
        self.inner.expression().to_string()
    }

    /// Most recent history line
    #[wasm_bindgen(getter, js_name = historyMini)]
    pub fn history_mini(&self) -> String {
        self.inner.history_mini()
    }

    /// Active theme, `dark` or `light`
    #[wasm_bindgen(getter)]
    pub fn theme(&self) -> String {
        self.inner.theme().as_str().to_string()
    }

    /// Append text to the expression
    pub fn append(&mut self, text: &str) {
        self.inner.append(text);
    }

    /// Remove the last character
    pub fn backspace(&mut self) {
        self.inner.delete_last();
    }

    /// Clear the expression
    pub fn clear(&mut self) {
        self.inner.clear();
    }

    /// Evaluate and return the rendered result
    pub fn calculate(&mut self) -> String {
        self.inner.calculate();
        self.inner.expression().to_string()
    }

    /// Handle a button from its `data-val` / `data-fn` attributes.
    ///
    /// Returns the rendered result when the button evaluated the expression.
    pub fn handle_button(&mut self, value: Option<String>, function: Option<String>) -> Option<String> {
        let action = KeypadAction::from_button(value.as_deref(), function.as_deref())?;
        self.handle_action(&action)
    }

    /// Handle a keyboard key press
    pub fn handle_key(&mut self, key: &str) -> Option<String> {
        let action = KeypadAction::from_key(key)?;
        self.handle_action(&action)
    }

    fn handle_action(&mut self, action: &KeypadAction) -> Option<String> {
        self.inner
            .apply(action)
            .map(|_| self.inner.expression().to_string())
    }

    /// Append a speech transcript
    pub fn append_transcript(&mut self, transcript: &str) {
        self.inner.append_transcript(transcript);
    }

    /// Load a history entry (0 = newest) into the expression
    pub fn recall(&mut self, index: usize) -> bool {
        self.inner.recall(index)
    }

    /// History lines, newest first, as a JSON array
    pub fn history_json(&self) -> String {
        serde_json::to_string(&self.inner.history().displays_rev())
            .unwrap_or_else(|_| "[]".to_string())
    }

    /// Number of history entries
    pub fn history_count(&self) -> usize {
        self.inner.history().len()
    }

    /// Empty the history
    pub fn clear_history(&mut self) {
        self.inner.clear_history();
    }

    /// Switch theme; returns the new theme name
    pub fn toggle_theme(&mut self) -> String {
        self.inner.toggle_theme().as_str().to_string()
    }

    /// Ask the local helper
    pub fn ask(&self, question: &str) -> Option<String> {
        self.inner.ask(question)
    }
}

impl Default for BrowserCalculator {
    fn default() -> Self {
        Self::new()
    }
}

/// Initialize the calculator module in the browser
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    console::log_1(&"NeoCalc WASM initialized".into());
}
