use thiserror::Error;

/// Source location span for error reporting
/// Represents a range of characters in the input string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Start position (0-indexed byte offset)
    pub start: usize,
    /// End position (exclusive, 0-indexed byte offset)
    pub end: usize,
}

impl Span {
    /// Create a new span
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    /// Create a span for a single position
    pub fn at(pos: usize) -> Self {
        Span {
            start: pos,
            end: pos + 1,
        }
    }

    /// Check if this span has valid location info
    pub fn is_valid(&self) -> bool {
        self.end > self.start
    }

    /// Format the span for display (1-indexed for users)
    pub fn display(&self) -> String {
        if !self.is_valid() {
            String::new()
        } else if self.end - self.start == 1 {
            format!(" at position {}", self.start + 1)
        } else {
            format!(" at positions {}-{}", self.start + 1, self.end)
        }
    }
}

fn span_suffix(span: &Option<Span>) -> String {
    span.map_or(String::new(), |s| s.display())
}

fn join(names: &[String]) -> String {
    format!("[{}]", names.join(", "))
}

fn comparison(equations: &usize, unknowns: &usize) -> &'static str {
    if equations > unknowns { ">" } else { "<" }
}

/// Errors raised while parsing equations, validating inputs and propagating errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
    /// Equation text could not be turned into an expression
    #[error("Failed to parse equation '{input}': {message}{}", span_suffix(.span))]
    Parse {
        input: String,
        message: String,
        span: Option<Span>,
    },

    /// More than one `=` in an equation
    #[error("Equation has too many equal signs ({count}): {input}")]
    MalformedEquation { input: String, count: usize },

    /// An expression could not be reduced to a real number
    #[error("Cannot evaluate '{expression}': {reason}")]
    Evaluation { expression: String, reason: String },

    /// Input variable names collide with built-in constants
    #[error("Symbols {} in input are restricted and cannot be used", join(.names))]
    RestrictedSymbol { names: Vec<String> },

    /// Values leave an equation residual above the tolerance
    #[error(
        "Equation {index}: {equation} value check tolerance exceeded: |{residual}| > {tolerance}"
    )]
    UnsatisfiedEquation {
        index: usize,
        equation: String,
        residual: f64,
        tolerance: f64,
    },

    /// Values do not resolve every variable of an equation
    #[error("Values {} missing for equation {index}: {equation}", join(.missing))]
    MissingValues {
        index: usize,
        equation: String,
        missing: Vec<String>,
    },

    /// Equation count does not match the unknown-error count
    #[error(
        "Indeterminate system: number of equations ({equations}) {} \
         number of unknowns ({unknowns}). {advice}",
        comparison(.equations, .unknowns)
    )]
    IndeterminateSystem {
        equations: usize,
        unknowns: usize,
        advice: String,
    },

    /// A function-backed equation whose partials do not match its variables
    #[error("Function-backed equation '{label}': {message}")]
    InvalidNative { label: String, message: String },

    /// The unknown-variable block of the Jacobian cannot be inverted
    #[error("Jacobian is singular with respect to unknowns {}", join(.unknowns))]
    SingularJacobian { unknowns: Vec<String> },

    #[error("Equation combination '{name}' does not exist")]
    UnknownCombo { name: String },

    #[error("Equation combination '{name}' references equation {index}, but only {len} exist")]
    InvalidCombo {
        name: String,
        index: usize,
        len: usize,
    },

    /// A pipeline link names a variable that cannot be routed
    #[error("Stage {stage} link '{from}' -> '{to}': {reason}")]
    UnknownLinkVariable {
        stage: usize,
        from: String,
        to: String,
        reason: String,
    },

    /// Malformed equation-set definition text
    #[error("Definition line {line}: {message}")]
    Definition { line: usize, message: String },

    /// Pipeline inputs do not match the number of stages
    #[error("Pipeline expects {expected} {what}, got {got}")]
    PipelineShape {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    /// Accumulated failures from a diagnostic run
    #[error("{message}")]
    CheckFailed { message: String },

    /// A pipeline stage failed
    #[error("Stage {stage}: {source}")]
    Stage {
        stage: usize,
        #[source]
        source: Box<SolveError>,
    },

    #[error("Invalid solver configuration: {0}")]
    Config(String),
}

impl SolveError {
    /// Create a parse error without location info
    pub fn parse(input: impl Into<String>, message: impl Into<String>) -> Self {
        SolveError::Parse {
            input: input.into(),
            message: message.into(),
            span: None,
        }
    }

    /// Create a parse error pointing at a span of the input
    pub fn parse_at(input: impl Into<String>, message: impl Into<String>, span: Span) -> Self {
        SolveError::Parse {
            input: input.into(),
            message: message.into(),
            span: Some(span),
        }
    }

    /// Wrap an error with the 1-based pipeline stage it came from
    pub fn in_stage(self, stage: usize) -> Self {
        SolveError::Stage {
            stage,
            source: Box::new(self),
        }
    }
}

pub type Result<T> = std::result::Result<T, SolveError>;
