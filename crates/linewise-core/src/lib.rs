//! # linewise-core
//!
//! Core framework for token-stream style checking.
//!
//! This crate provides the foundational traits and types for building
//! layout checkers that never construct an AST. It includes:
//!
//! - [`Tokenizer`] trait turning source text into [`Event`]s
//! - [`LexedLine`] and [`Token`] for querying events line by line
//! - [`Ruler`] trait for rules reacting to the event stream
//! - [`Critic`] for orchestrating a check run over [`FileSet`]s
//! - [`Problem`] for representing violations
//!
//! ## Example
//!
//! ```ignore
//! use linewise_core::{Critic, FileSet};
//!
//! let mut critic = Critic::builder()
//!     .root(".")
//!     .tokenizer(RubyLexer::new())
//!     .file_set(FileSet::new("default", vec!["lib/**/*.rb".into()], false, rulers))
//!     .build()?;
//!
//! let total = critic.critique(|path, problems, _label| {
//!     for p in problems {
//!         println!("{}:{p}", path.display());
//!     }
//! })?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
mod context;
mod critic;
mod event;
mod file_set;
mod lexed_line;
mod ruler;
pub mod token;
mod types;

pub use config::{Config, ConfigError, FileSetConfig, RuleSetting};
pub use context::{byte_offset, FileContext};
pub use critic::{Critic, CriticBuilder, CriticError, UNPARSABLE_CODE};
pub use event::{Event, EventKind, Position, TokenizeError, Tokenizer};
pub use file_set::{FileSet, SOURCE_EXTENSION};
pub use lexed_line::LexedLine;
pub use ruler::{dispatch, LineContext, Ruler, RulerBox, RulerSpec};
pub use token::Token;
pub use types::{CritiqueResult, Problem, ProblemDiagnostic, Severity};
