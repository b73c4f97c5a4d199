//! # linewise
//!
//! Token-stream style checker for Ruby sources.
//!
//! This is the facade crate re-exporting the core engine, the Ruby
//! tokenizer, the built-in rulers and the `check!()` macro.
//!
//! ## `cargo test` Integration
//!
//! ```toml
//! [dev-dependencies]
//! linewise = "0.3"
//! ```
//!
//! ```rust,ignore
//! // tests/style.rs
//! linewise::check!();
//! ```
//!
//! This checks the configured file sets as part of `cargo test`.
//! Configure via `linewise.toml` at the project root.
//!
//! ## Programmatic Usage
//!
//! ```rust,ignore
//! use linewise::{Config, Critic, RubyLexer};
//!
//! let config = Config::from_file("linewise.toml".as_ref())?;
//! let mut critic = Critic::builder()
//!     .root(".")
//!     .tokenizer(RubyLexer::new())
//!     .file_sets(linewise::rules::registry::file_sets(&config)?)
//!     .build()?;
//!
//! let count = critic.critique(|path, problems, label| {
//!     println!("{} [{label}]: {}", path.display(), problems.len());
//! })?;
//! ```

#![forbid(unsafe_code)]

pub use linewise_core::*;
pub use linewise_lexer::RubyLexer;

pub use linewise_macros::check;

/// Built-in rulers and the rule registry.
pub mod rules {
    pub use linewise_rules::*;
}

mod runner;

#[doc(hidden)]
pub mod __internal {
    pub use crate::runner::run_check;
}
