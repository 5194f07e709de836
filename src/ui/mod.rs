//! Terminal viewer built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! The viewer lines generated VM code up with the source it came from:
//!
//! - **[`app`]**: application state, keyboard event loop, pane focus, selection
//! - **[`panes`]**: stateless render functions for each visible pane (source,
//!   VM code, status bar)
//! - **[`theme`]**: centralized color palette used by all panes
//!
//! The entry point for consumers is [`App`]: construct it with the source text
//! and the emitted instructions and call [`App::run`] to start the event loop.
//!
//! [`App::run`]: app::App::run

pub mod app;
pub mod panes;
pub mod theme;

pub use app::App;
