//! # linewise-rules
//!
//! Built-in rulers for linewise.
//!
//! ## Available Rules
//!
//! | Code | Name | Description |
//! |------|------|-------------|
//! | LW001 | `indentation_spaces` | Lines are indented by the expected number of spaces |
//! | LW002 | `spaces_before_lbrace` | Spaces before an opening brace |
//! | LW003 | `max_line_length` | Maximum characters per line |
//! | LW004 | `trailing_newlines` | Newlines at the end of a file |
//! | LW005 | `allow_hard_tabs` | Whether whitespace may contain hard tabs |
//! | LW006 | `allow_trailing_line_spaces` | Whether lines may end with whitespace |
//! | LW007 | `spaces_after_comma` | Spaces after a comma |
//!
//! ## Usage
//!
//! ```ignore
//! use linewise_core::{Critic, FileSet, RulerSpec};
//! use linewise_rules::{IndentationSpacesRuler, SpacesBeforeLBraceRuler};
//!
//! let rulers = vec![
//!     RulerSpec::new("indentation_spaces", || Box::new(IndentationSpacesRuler::new(2))),
//!     RulerSpec::new("spaces_before_lbrace", || Box::new(SpacesBeforeLBraceRuler::new(1))),
//! ];
//! let critic = Critic::builder()
//!     .tokenizer(RubyLexer::new())
//!     .file_set(FileSet::new("default", vec!["lib/**/*.rb".into()], false, rulers))
//!     .build()?;
//! ```
//!
//! Most callers build rulers from configuration with
//! [`registry::file_sets`] instead.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod allow_hard_tabs;
pub mod allow_trailing_line_spaces;
pub mod indentation_manager;
pub mod indentation_spaces;
pub mod max_line_length;
pub mod registry;
pub mod spaces_after_comma;
pub mod spaces_before_lbrace;
pub mod trailing_newlines;

#[cfg(test)]
mod test_util;

pub use allow_hard_tabs::AllowHardTabsRuler;
pub use allow_trailing_line_spaces::AllowTrailingLineSpacesRuler;
pub use indentation_manager::{BracketKind, IndentReason, IndentationManager};
pub use indentation_spaces::IndentationSpacesRuler;
pub use max_line_length::MaxLineLengthRuler;
pub use registry::{build_rulers, default_style, file_sets, RulerInfo, RULERS};
pub use spaces_after_comma::SpacesAfterCommaRuler;
pub use spaces_before_lbrace::SpacesBeforeLBraceRuler;
pub use trailing_newlines::TrailingNewlinesRuler;

/// Re-export core types for convenience.
pub use linewise_core::{Problem, Ruler, Severity};
