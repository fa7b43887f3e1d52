//! NeoCalc - safe arithmetic core for a browser calculator
//!
//! User text (button taps, typed input, speech transcripts) is normalized
//! into a small arithmetic grammar and evaluated by a dedicated
//! recursive-descent interpreter. Nothing outside numerals, `+ - * / **`,
//! parentheses and a fixed math namespace is ever reachable.
//!
//! # Example
//!
//! ```rust
//! use neocalc::prelude::*;
//!
//! assert_eq!(evaluate("2^10"), Evaluation::Value(1024.0));
//! assert_eq!(evaluate("50%"), Evaluation::Value(0.5));
//! assert_eq!(evaluate("sqrt(16)"), Evaluation::Value(4.0));
//! assert!(evaluate("1/0").is_failure());
//! assert!(evaluate("alert(1)").is_failure());
//!
//! let mut calc = Calculator::new(MemoryStore::new());
//! calc.append("6×7");
//! calc.calculate();
//! assert_eq!(calc.screen(), "42");
//! assert_eq!(calc.history_mini(), "6×7 = 42");
//! ```

#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::float_cmp
    )
)]
#![deny(missing_docs)]
#![deny(missing_debug_implementations)]

pub mod assistant;
pub mod config;
pub mod controller;
pub mod core;
pub mod keypad;
pub mod speech;
pub mod store;
pub mod theme;

#[cfg(feature = "wasm")]
pub mod wasm;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::{CalculatorConfig, ConfigError};
    pub use crate::controller::Calculator;
    pub use crate::core::history::{History, HistoryEntry};
    pub use crate::core::namespace::{MathConstant, MathFunction, MathNamespace};
    pub use crate::core::parser::{AstNode, Parser, Token, Tokenizer};
    pub use crate::core::{
        evaluate, format_number, CalcError, CalcResult, Evaluation, Evaluator, Operation,
    };
    pub use crate::keypad::KeypadAction;
    pub use crate::speech::transcript_to_expression;
    pub use crate::store::{FileStore, KeyValueStore, MemoryStore, StoreError};
    pub use crate::theme::Theme;

    #[cfg(feature = "wasm")]
    pub use crate::wasm::{BrowserCalculator, LocalStorage, PageStore};
}
