//! Browser frontend
//!
//! `wasm-bindgen` bindings over the [`Calculator`](crate::controller::Calculator)
//! with history and theme kept in the page's local storage.

mod browser;
mod storage;

pub use browser::BrowserCalculator;
pub use storage::{LocalStorage, PageStore};
