//! Semantic errors and the diagnostics list they are collected into

use oc_intern::{Interner, Name};
use oc_span::Location;
use std::fmt;

/// Problems found while resolving names and propagating types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SemanticError {
    /// Name not declared in any visible scope
    #[error("identifier not found: '{name}'")]
    UnresolvedIdentifier {
        /// The name that was not found
        name: String,
        /// Where the name was used
        use_site: Location,
        /// Visible names that are spelled similarly
        suggestions: Vec<String>,
    },

    /// Struct declaration without a name node
    #[error("malformed struct declaration: missing struct name")]
    MalformedStruct {
        /// The declaration
        at: Location,
    },

    /// A node that lacks children its kind requires
    #[error("malformed {kind} node")]
    MalformedTree {
        /// Dump tag of the construct
        kind: &'static str,
        /// Where it sits
        at: Location,
    },

    /// Type names a struct that was never declared
    #[error("struct not found: '{name}'")]
    UnknownStruct {
        /// The struct name
        name: String,
        /// Where it was named
        at: Location,
    },

    /// Field selection of a name the struct does not declare
    #[error("struct '{struct_name}' has no field '{field}'")]
    UnknownField {
        /// Struct being selected from
        struct_name: String,
        /// Requested field
        field: String,
        /// The selector
        at: Location,
    },

    /// Field selection on something that is not a struct value
    #[error("field selection on a value of type {found}")]
    NotAStruct {
        /// Type of the selected value
        found: String,
        /// The selection
        at: Location,
    },

    /// Call of a name that is not a function
    #[error("'{name}' is not a function")]
    NotAFunction {
        /// The callee
        name: String,
        /// The call
        at: Location,
    },

    /// Incompatible operand, initializer, argument or return types
    #[error("incompatible types in {context}: expected {expected}, found {found}")]
    TypeMismatch {
        /// The construct being checked
        context: &'static str,
        /// Required type
        expected: String,
        /// Actual type
        found: String,
        /// Where the mismatch occurred
        at: Location,
    },

    /// Wrong number of call arguments
    #[error("'{name}' expects {expected} argument(s), found {found}")]
    ArityMismatch {
        /// The callee
        name: String,
        /// Declared parameter count
        expected: usize,
        /// Supplied argument count
        found: usize,
        /// The call
        at: Location,
    },

    /// Assignment to something that is not an lvalue
    #[error("left operand of assignment is not assignable")]
    NotAssignable {
        /// The assignment
        at: Location,
    },

    /// Return that does not fit the enclosing function
    #[error("{reason}")]
    InvalidReturn {
        /// What is wrong
        reason: &'static str,
        /// The return statement
        at: Location,
    },

    /// Same name declared twice in one table
    #[error("redeclaration of '{name}' (previously declared at {previous})")]
    Redeclared {
        /// The name
        name: String,
        /// Earlier declaration
        previous: Location,
        /// Later declaration
        at: Location,
    },
}

impl SemanticError {
    /// Location the diagnostic is reported at
    pub fn location(&self) -> Location {
        match self {
            Self::UnresolvedIdentifier { use_site, .. } => *use_site,
            Self::MalformedStruct { at }
            | Self::MalformedTree { at, .. }
            | Self::UnknownStruct { at, .. }
            | Self::UnknownField { at, .. }
            | Self::NotAStruct { at, .. }
            | Self::NotAFunction { at, .. }
            | Self::TypeMismatch { at, .. }
            | Self::ArityMismatch { at, .. }
            | Self::NotAssignable { at }
            | Self::InvalidReturn { at, .. }
            | Self::Redeclared { at, .. } => *at,
        }
    }

    /// How serious the problem is
    pub fn severity(&self) -> Severity {
        match self {
            Self::Redeclared { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Spelled-alike candidates for an unresolved `name`, closest first
    pub fn compute_suggestions<I>(name: &str, candidates: I, interner: &Interner) -> Vec<String>
    where
        I: IntoIterator<Item = Name>,
    {
        let mut scored: Vec<(usize, &str)> = candidates
            .into_iter()
            .map(|candidate| interner.resolve(&candidate))
            .filter(|candidate| *candidate != name)
            .map(|candidate| (edit_distance(name, candidate), candidate))
            .filter(|(distance, _)| *distance <= 2 && *distance < name.chars().count())
            .collect();
        scored.sort_unstable();
        scored.dedup();
        scored
            .into_iter()
            .take(3)
            .map(|(_, candidate)| candidate.to_string())
            .collect()
    }
}

/// Levenshtein distance over chars, one row at a time
fn edit_distance(source: &str, target: &str) -> usize {
    let target: Vec<char> = target.chars().collect();
    let mut previous: Vec<usize> = (0..=target.len()).collect();
    for (row, source_char) in source.chars().enumerate() {
        let mut current = Vec::with_capacity(previous.len());
        current.push(row + 1);
        for (col, target_char) in target.iter().enumerate() {
            let substitute = previous[col] + usize::from(source_char != *target_char);
            let insert = current[col] + 1;
            let delete = previous[col + 1] + 1;
            current.push(substitute.min(insert).min(delete));
        }
        previous = current;
    }
    previous[target.len()]
}

/// Diagnostic severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Reported, does not stop the pipeline
    Warning,
    /// Stops the pipeline before code generation
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => f.write_str("warning"),
            Self::Error => f.write_str("error"),
        }
    }
}

/// One reported problem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Severity at the time of reporting
    pub severity: Severity,
    /// The problem
    pub error: SemanticError,
}

impl Diagnostic {
    /// Where the problem is
    pub fn location(&self) -> Location {
        self.error.location()
    }

    /// The error text, with spelling suggestions when there are any
    pub fn message(&self) -> String {
        match &self.error {
            SemanticError::UnresolvedIdentifier { suggestions, .. } if !suggestions.is_empty() => {
                let quoted: Vec<String> = suggestions.iter().map(|s| format!("'{s}'")).collect();
                format!("{} (did you mean {}?)", self.error, quoted.join(" or "))
            }
            _ => self.error.to_string(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.location(), self.severity, self.message())
    }
}

/// Diagnostics collected over one run, in reporting order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `error` with its natural severity
    pub fn push(&mut self, error: SemanticError) {
        let severity = error.severity();
        tracing::debug!(%severity, at = %error.location(), "{error}");
        self.items.push(Diagnostic { severity, error });
    }

    /// Treat every warning as an error from now on
    pub fn promote_warnings(&mut self) {
        for item in &mut self.items {
            item.severity = Severity::Error;
        }
    }

    /// Whether any error-level diagnostic was recorded
    pub fn has_errors(&self) -> bool {
        self.items.iter().any(|d| d.severity == Severity::Error)
    }

    /// Error-level diagnostics
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter().filter(|d| d.severity == Severity::Error)
    }

    /// Warning-level diagnostics
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter().filter(|d| d.severity == Severity::Warning)
    }

    /// Every diagnostic in reporting order
    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.items.iter()
    }

    /// Number of diagnostics
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing was reported
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// One line per diagnostic
    pub fn render(&self) -> String {
        self.items.iter().map(|d| format!("{d}\n")).collect()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
