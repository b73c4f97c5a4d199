//! The ruler contract and event dispatch.

use crate::context::FileContext;
use crate::event::{Event, EventKind};
use crate::lexed_line::LexedLine;
use crate::types::Problem;

/// Positional context handed to ruler handlers.
#[derive(Debug, Clone, Copy)]
pub struct LineContext<'a> {
    /// The file being checked.
    pub file: &'a FileContext<'a>,
    /// The line the current event belongs to.
    pub line: &'a LexedLine,
}

impl<'a> LineContext<'a> {
    /// Creates a new line context.
    #[must_use]
    pub fn new(file: &'a FileContext<'a>, line: &'a LexedLine) -> Self {
        Self { file, line }
    }

    /// Current line number (1-indexed).
    #[must_use]
    pub fn lineno(&self) -> usize {
        self.line.line_number()
    }

    /// Full source text of the file.
    #[must_use]
    pub fn source(&self) -> &'a str {
        self.file.source
    }
}

/// A style rule observing the event stream of one file.
///
/// A ruler is built fresh for every file. The [`Critic`](crate::Critic)
/// feeds it, in source order, a line-begin call, every event of that line
/// through [`dispatch`], and a line-end call; then `on_file_end` once.
/// Handlers default to no-ops, so a ruler overrides only the categories
/// it cares about and records [`Problem`]s as it goes.
///
/// # Example
///
/// ```ignore
/// use linewise_core::{Event, LineContext, Problem, Ruler, Severity};
///
/// pub struct NoSemicolons { problems: Vec<Problem> }
///
/// impl Ruler for NoSemicolons {
///     fn name(&self) -> &'static str { "no_semicolons" }
///     fn code(&self) -> &'static str { "LW100" }
///
///     fn on_semicolon(&mut self, event: &Event, ctx: &LineContext<'_>) {
///         self.problems.push(Problem::new(
///             self.code(), self.name(), Severity::Error,
///             ctx.lineno(), event.column(), "Semicolon found",
///         ));
///     }
///
///     fn problems(&self) -> &[Problem] { &self.problems }
///     fn into_problems(self: Box<Self>) -> Vec<Problem> { self.problems }
/// }
/// ```
pub trait Ruler: Send {
    /// Returns the snake_case name of this ruler (e.g., "indentation_spaces").
    fn name(&self) -> &'static str;

    /// Returns the rule code (e.g., "LW001").
    fn code(&self) -> &'static str;

    /// Returns a brief description of what this ruler checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Called before the first event of each line.
    fn on_line_begin(&mut self, _ctx: &LineContext<'_>) {}

    /// Called after the last event of each line.
    fn on_line_end(&mut self, _ctx: &LineContext<'_>) {}

    /// Called once after the last line of the file.
    fn on_file_end(&mut self, _file: &FileContext<'_>) {}

    /// Handles a comma.
    fn on_comma(&mut self, _event: &Event, _ctx: &LineContext<'_>) {}

    /// Handles a comment.
    fn on_comment(&mut self, _event: &Event, _ctx: &LineContext<'_>) {}

    /// Handles the start of a string interpolation.
    fn on_embexpr_begin(&mut self, _event: &Event, _ctx: &LineContext<'_>) {}

    /// Handles the end of a string interpolation.
    fn on_embexpr_end(&mut self, _event: &Event, _ctx: &LineContext<'_>) {}

    /// Handles a newline that does not end a statement.
    fn on_ignored_newline(&mut self, _event: &Event, _ctx: &LineContext<'_>) {}

    /// Handles a keyword.
    fn on_keyword(&mut self, _event: &Event, _ctx: &LineContext<'_>) {}

    /// Handles `{`.
    fn on_lbrace(&mut self, _event: &Event, _ctx: &LineContext<'_>) {}

    /// Handles `[`.
    fn on_lbracket(&mut self, _event: &Event, _ctx: &LineContext<'_>) {}

    /// Handles `(`.
    fn on_lparen(&mut self, _event: &Event, _ctx: &LineContext<'_>) {}

    /// Handles a statement-ending newline.
    fn on_newline(&mut self, _event: &Event, _ctx: &LineContext<'_>) {}

    /// Handles an operator.
    fn on_op(&mut self, _event: &Event, _ctx: &LineContext<'_>) {}

    /// Handles a period.
    fn on_period(&mut self, _event: &Event, _ctx: &LineContext<'_>) {}

    /// Handles `}`.
    fn on_rbrace(&mut self, _event: &Event, _ctx: &LineContext<'_>) {}

    /// Handles `]`.
    fn on_rbracket(&mut self, _event: &Event, _ctx: &LineContext<'_>) {}

    /// Handles `)`.
    fn on_rparen(&mut self, _event: &Event, _ctx: &LineContext<'_>) {}

    /// Handles a semicolon.
    fn on_semicolon(&mut self, _event: &Event, _ctx: &LineContext<'_>) {}

    /// Handles whitespace.
    fn on_space(&mut self, _event: &Event, _ctx: &LineContext<'_>) {}

    /// Handles an opening string delimiter.
    fn on_string_begin(&mut self, _event: &Event, _ctx: &LineContext<'_>) {}

    /// Handles a closing string delimiter.
    fn on_string_end(&mut self, _event: &Event, _ctx: &LineContext<'_>) {}

    /// Problems recorded so far.
    fn problems(&self) -> &[Problem];

    /// Consumes the ruler, returning its problems.
    fn into_problems(self: Box<Self>) -> Vec<Problem>;
}

/// Type alias for boxed Ruler trait objects.
pub type RulerBox = Box<dyn Ruler>;

/// Routes one event to the handler for its category.
///
/// Categories without a handler are ignored.
pub fn dispatch(ruler: &mut dyn Ruler, event: &Event, ctx: &LineContext<'_>) {
    match event.kind {
        EventKind::Comma => ruler.on_comma(event, ctx),
        EventKind::Comment => ruler.on_comment(event, ctx),
        EventKind::EmbexprBegin => ruler.on_embexpr_begin(event, ctx),
        EventKind::EmbexprEnd => ruler.on_embexpr_end(event, ctx),
        EventKind::IgnoredNewline => ruler.on_ignored_newline(event, ctx),
        EventKind::Keyword => ruler.on_keyword(event, ctx),
        EventKind::LBrace => ruler.on_lbrace(event, ctx),
        EventKind::LBracket => ruler.on_lbracket(event, ctx),
        EventKind::LParen => ruler.on_lparen(event, ctx),
        EventKind::Newline => ruler.on_newline(event, ctx),
        EventKind::Op => ruler.on_op(event, ctx),
        EventKind::Period => ruler.on_period(event, ctx),
        EventKind::RBrace => ruler.on_rbrace(event, ctx),
        EventKind::RBracket => ruler.on_rbracket(event, ctx),
        EventKind::RParen => ruler.on_rparen(event, ctx),
        EventKind::Semicolon => ruler.on_semicolon(event, ctx),
        EventKind::Space => ruler.on_space(event, ctx),
        EventKind::StringBegin => ruler.on_string_begin(event, ctx),
        EventKind::StringEnd => ruler.on_string_end(event, ctx),
        EventKind::Ident
        | EventKind::Const
        | EventKind::Int
        | EventKind::Float
        | EventKind::Label
        | EventKind::StringContent
        | EventKind::SymbolBegin => {}
    }
}

/// A named, validated recipe for building a fresh ruler per file.
pub struct RulerSpec {
    name: &'static str,
    build: Box<dyn Fn() -> RulerBox + Send + Sync>,
}

impl RulerSpec {
    /// Creates a spec from a ruler name and a constructor.
    #[must_use]
    pub fn new<F>(name: &'static str, build: F) -> Self
    where
        F: Fn() -> RulerBox + Send + Sync + 'static,
    {
        Self {
            name,
            build: Box::new(build),
        }
    }

    /// Name of the ruler this spec builds.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Builds a fresh ruler instance.
    #[must_use]
    pub fn build(&self) -> RulerBox {
        (self.build)()
    }
}

impl std::fmt::Debug for RulerSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RulerSpec").field("name", &self.name).finish()
    }
}
