//! Helpers for ruler tests.

use linewise_core::{Critic, Problem, RulerBox, RulerSpec};
use linewise_lexer::RubyLexer;
use std::path::Path;

/// Lexes `source` and runs one ruler built by `build` over it.
pub fn check<F>(source: &str, build: F) -> Vec<Problem>
where
    F: Fn() -> RulerBox + Send + Sync + 'static,
{
    let critic = Critic::builder()
        .root("/project")
        .tokenizer(RubyLexer::new())
        .build()
        .expect("Failed to build critic");

    critic.check_source(
        Path::new("/project/lib/sample.rb"),
        source,
        "default",
        &[RulerSpec::new("under_test", build)],
    )
}
