/// Domain errors raised by the arithmetic engine and the root solver.
///
/// Both kinds are per-operation: the interactive layer reports them and
/// keeps the session going.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalcError {
    DivisionByZero,
    InvalidArgument(String),
}

impl CalcError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// The text shown to the user (and written to history for divisions),
    /// e.g. `Error: Division by zero`.
    pub fn user_message(&self) -> String {
        format!("Error: {self}")
    }
}

impl std::fmt::Display for CalcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DivisionByZero => write!(f, "Division by zero"),
            Self::InvalidArgument(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for CalcError {}
