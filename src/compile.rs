use std::fmt;
use std::fs;
use std::path::PathBuf;

use crate::types::{CompileError, CompiledPolicy, DeltaRule, Diagnostic, Theory};
use crate::{delta, parse, selfjoin, translate};

/// A compilation input: a path to a policy file, or policy text supplied
/// directly.
#[derive(Debug, Clone)]
pub enum Source {
    File(PathBuf),
    Text(String),
}

impl Source {
    #[must_use]
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Source::File(path.into())
    }

    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Source::Text(text.into())
    }

    fn read(&self) -> Result<String, CompileError> {
        match self {
            Source::File(path) => Ok(fs::read_to_string(path)?),
            Source::Text(text) => Ok(text.clone()),
        }
    }
}

/// The compilation pipeline: parse each source, translate to the internal
/// theory, eliminate self-joins, generate delta rules.
///
/// Diagnostics are accumulated, never raised mid-pipeline; call
/// [`raise_if_errors()`](Compiler::raise_if_errors) to enforce them. Each
/// compilation owns its own `Compiler`; instances share no state.
///
/// # Example
///
/// ```
/// use deltalog::{Compiler, Source};
///
/// let mut compiler = Compiler::compile(&[Source::text("p(x) :- q(x, y), q(y, x).")]);
/// compiler.raise_if_errors().unwrap();
/// compiler.compute_delta_rules();
/// assert_eq!(compiler.delta_rules().len(), 3);
/// ```
#[derive(Debug, Default)]
pub struct Compiler {
    theory: Theory,
    delta_rules: Vec<DeltaRule>,
    errors: Vec<Diagnostic>,
    warnings: Vec<Diagnostic>,
}

impl Compiler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and translate every source in the given order, concatenating
    /// their theories. A source that fails records an error and contributes
    /// nothing; later sources are still attempted.
    #[must_use]
    pub fn compile(sources: &[Source]) -> Self {
        let mut compiler = Self::new();
        for source in sources {
            compiler.read_source(source);
        }
        compiler
    }

    /// Read one source and append its theory. On failure the accumulated
    /// theory is left untouched and one error is recorded for this source.
    pub fn read_source(&mut self, source: &Source) {
        match Self::translate_source(source) {
            Ok(mut rules) => self.theory.append(&mut rules),
            Err(err) => self.sigerr(Diagnostic::new(err.to_string())),
        }
    }

    fn translate_source(source: &Source) -> Result<Theory, CompileError> {
        let text = source.read()?;
        let tree = parse::parse(&text)?;
        translate::build_theory(&tree)
    }

    /// Run self-join elimination and delta-rule generation over the
    /// accumulated theory and store the result. Call after all sources have
    /// been read.
    pub fn compute_delta_rules(&mut self) {
        selfjoin::eliminate_self_joins(&mut self.theory);
        self.delta_rules = delta::compute_delta_rules(&self.theory);
    }

    /// Enforce accumulated errors.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::CompilationFailed`] carrying all accumulated
    /// error messages, one per line, if any were recorded; no-op otherwise.
    pub fn raise_if_errors(&self) -> Result<(), CompileError> {
        if self.errors.is_empty() {
            return Ok(());
        }
        Err(CompileError::CompilationFailed {
            errors: self.errors.iter().map(ToString::to_string).collect(),
        })
    }

    fn sigerr(&mut self, diagnostic: Diagnostic) {
        self.errors.push(diagnostic);
    }

    /// The accumulated (and, after [`compute_delta_rules()`](Self::compute_delta_rules),
    /// self-join-free) theory.
    #[must_use]
    pub fn theory(&self) -> &Theory {
        &self.theory
    }

    #[must_use]
    pub fn delta_rules(&self) -> &[DeltaRule] {
        &self.delta_rules
    }

    #[must_use]
    pub fn errors(&self) -> &[Diagnostic] {
        &self.errors
    }

    /// Accumulated warnings. The channel is part of the contract; no
    /// current pipeline stage emits one.
    #[must_use]
    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    /// Consume the compiler, yielding the finished artifact for the
    /// evaluation runtime.
    #[must_use]
    pub fn into_policy(self) -> CompiledPolicy {
        CompiledPolicy {
            theory: self.theory,
            delta_rules: self.delta_rules,
        }
    }
}

impl fmt::Display for Compiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "**Theory**")?;
        for rule in &self.theory {
            writeln!(f, "{rule}")?;
        }
        Ok(())
    }
}
