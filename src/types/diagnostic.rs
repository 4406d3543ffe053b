use std::fmt;

use super::term::Location;

/// An accumulated error or warning, carrying a best-effort source location.
///
/// Renders as `<message> at line: <L> col: <C>`, with the location suffix
/// omitted when the position is unknown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub message: String,
    pub location: Option<Location>,
}

impl Diagnostic {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: None,
        }
    }

    #[must_use]
    pub fn at(mut self, loc: Location) -> Self {
        self.location = Some(loc);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(loc) = self.location {
            write!(f, " at {loc}")?;
        }
        Ok(())
    }
}
