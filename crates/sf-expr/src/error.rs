//! Error types for parsing, compiling, evaluating and coercing expressions.

use thiserror::Error;

/// Text could not be parsed as an expression.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    #[error("Empty expression")]
    Empty,

    /// Rejected by the operator-tree builder.
    #[error("Cannot parse '{text}': {message}")]
    Syntax { text: String, message: String },

    #[error("Unknown function '{name}'")]
    UnknownFunction { name: String },

    /// A token in symbol position that is not a plain identifier, such as
    /// `0.25abc`.
    #[error("Invalid symbol name '{name}'")]
    InvalidIdentifier { name: String },
}

/// An expression was rejected by a numeric compiler.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CompileError {
    #[error(transparent)]
    Syntax(#[from] ParseError),

    /// The expression references a symbol that is not in the argument list.
    #[error("Unbound symbol '{name}' (arguments: {arguments})")]
    UnboundSymbol { name: String, arguments: String },

    /// The same symbol appears twice in the argument list.
    #[error("Duplicate argument symbol '{name}'")]
    DuplicateArgument { name: String },

    /// No independent variable was supplied.
    #[error("Argument list must start with the independent variable")]
    MissingVariable,

    /// The evaluation context could not be set up.
    #[error("Evaluation context: {message}")]
    Context { message: String },
}

/// A compiled function could not be evaluated.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvalError {
    #[error("Expected {expected} scalar parameter(s), got {found}")]
    Arity { expected: usize, found: usize },

    /// The operator tree produced something other than a number, e.g. a
    /// comparison yielding a boolean.
    #[error("Evaluation failed: {message}")]
    Evaluation { message: String },
}

/// A raw value could not be coerced to the requested numeric kind.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoerceError {
    #[error("Cannot parse '{text}': {source}")]
    Parse { text: String, source: ParseError },

    #[error("Expected {expected}, found {found}")]
    Kind {
        expected: &'static str,
        found: String,
    },

    #[error("Expected a positive integer, found {value}")]
    NotPositive { value: i64 },

    #[error("Non-finite value: {value}")]
    NonFinite { value: f64 },
}
