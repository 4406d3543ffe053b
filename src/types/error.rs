use thiserror::Error;

/// Errors produced by the compilation pipeline.
///
/// Lexical and syntactic failures are captured per source and accumulated;
/// [`CompilationFailed`](CompileError::CompilationFailed) is only produced
/// when the caller explicitly enforces accumulated errors via
/// [`Compiler::raise_if_errors()`](crate::Compiler::raise_if_errors).
#[derive(Debug, Error)]
pub enum CompileError {
    /// The source contained characters outside the language's alphabet.
    #[error("Lex failure.\n{}", messages.join("\n"))]
    LexFailure { messages: Vec<String> },

    /// The source did not conform to the grammar.
    #[error("Parse failure.\n{}", messages.join("\n"))]
    ParseFailure { messages: Vec<String> },

    /// The syntax tree contained a node kind outside its position's closed
    /// set. This is an upstream contract violation, not a user error, and is
    /// always fatal to the source being translated.
    #[error("syntax tree with unexpected {tag} node")]
    MalformedTree { tag: String },

    /// Raised by `raise_if_errors()` when any errors were accumulated.
    #[error("Compiler found errors:\n{}", errors.join("\n"))]
    CompilationFailed { errors: Vec<String> },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[cfg(feature = "binary-cache")]
    #[error(transparent)]
    Serialize(#[from] crate::serial::SerializeError),

    #[cfg(feature = "binary-cache")]
    #[error(transparent)]
    Deserialize(#[from] crate::serial::DeserializeError),
}
