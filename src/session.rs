//! Operation selection and the per-run session state.
//!
//! A [`Request`] is one fully parsed operation. [`Session::perform`] evaluates
//! it, stamps the outcome and appends it to the session's history.

use std::fmt;
use std::str::FromStr;

use anyhow::Context as _;

use crate::arith;
use crate::error::CalcError;
use crate::history::{HistoryLog, HistoryRecord};
use crate::root::{self, RootOptions};
use crate::timestamp;

/// Which menu an operation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Menu {
    Basic,
    Advanced,
}

/// Single-letter operation codes: `a s m d` (basic), `p r` (advanced).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpCode {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
    Root,
}

impl OpCode {
    /// Case-insensitive lookup of a single-letter code.
    pub const fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'a' => Some(Self::Add),
            's' => Some(Self::Subtract),
            'm' => Some(Self::Multiply),
            'd' => Some(Self::Divide),
            'p' => Some(Self::Power),
            'r' => Some(Self::Root),
            _ => None,
        }
    }

    /// Parse a code that must belong to `menu`.
    pub fn parse_in(menu: Menu, token: &str) -> Option<Self> {
        let mut chars = token.chars();
        let (Some(c), None) = (chars.next(), chars.next()) else {
            return None;
        };
        Self::from_char(c).filter(|op| op.menu() == menu)
    }

    pub const fn menu(self) -> Menu {
        match self {
            Self::Add | Self::Subtract | Self::Multiply | Self::Divide => Menu::Basic,
            Self::Power | Self::Root => Menu::Advanced,
        }
    }

    /// Label stored in the `operation` field of a history record.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Add => "Addition",
            Self::Subtract => "Subtraction",
            Self::Multiply => "Multiplication",
            Self::Divide => "Division",
            Self::Power => "Power",
            Self::Root => "Root",
        }
    }

    /// Prompts for the two operands, in input order.
    pub const fn prompts(self) -> [&'static str; 2] {
        match self {
            Self::Add | Self::Subtract | Self::Multiply | Self::Divide => {
                ["Enter first number: ", "Enter second number: "]
            }
            Self::Power => ["Enter base: ", "Enter exponent: "],
            Self::Root => ["Enter number: ", "Enter root index: "],
        }
    }
}

impl FromStr for OpCode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => {
                Self::from_char(c).ok_or_else(|| anyhow::anyhow!("unknown operation code: {s}"))
            }
            _ => anyhow::bail!("operation code must be a single letter, got: {s:?}"),
        }
    }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A fully parsed operation with its operands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Request {
    Add(i32, i32),
    Subtract(i32, i32),
    Multiply(i32, i32),
    Divide(i32, i32),
    Power { base: i32, exponent: i32 },
    Root { value: f64, index: i32 },
}

fn parse_int(s: &str) -> anyhow::Result<i32> {
    s.trim()
        .parse()
        .with_context(|| format!("invalid number: {s:?}"))
}

fn parse_float(s: &str) -> anyhow::Result<f64> {
    s.trim()
        .parse()
        .with_context(|| format!("invalid number: {s:?}"))
}

/// Six-decimal rendering used for every floating-point value shown or logged.
pub fn format_float(value: f64) -> String {
    // `{:.6}` already renders infinities as `inf` / `-inf`.
    if value.is_nan() {
        "nan".to_string()
    } else {
        format!("{value:.6}")
    }
}

/// The rendered outcome of one operation, before it is timestamped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Calculation {
    pub operation: &'static str,
    pub expression: String,
    pub result: String,
}

impl Request {
    /// Build a request from raw operand text, in prompt order.
    ///
    /// # Errors
    /// Returns an error if an operand does not parse as the type `op` expects.
    pub fn from_operands(op: OpCode, first: &str, second: &str) -> anyhow::Result<Self> {
        Ok(match op {
            OpCode::Add => Self::Add(parse_int(first)?, parse_int(second)?),
            OpCode::Subtract => Self::Subtract(parse_int(first)?, parse_int(second)?),
            OpCode::Multiply => Self::Multiply(parse_int(first)?, parse_int(second)?),
            OpCode::Divide => Self::Divide(parse_int(first)?, parse_int(second)?),
            OpCode::Power => Self::Power {
                base: parse_int(first)?,
                exponent: parse_int(second)?,
            },
            OpCode::Root => Self::Root {
                value: parse_float(first)?,
                index: parse_int(second)?,
            },
        })
    }

    /// Parse a code plus two operands, e.g. `("r", "27", "3")`.
    ///
    /// # Errors
    /// Returns an error for an unknown code or unparsable operands.
    pub fn parse(code: &str, first: &str, second: &str) -> anyhow::Result<Self> {
        let op: OpCode = code.parse()?;
        Self::from_operands(op, first, second)
    }

    pub const fn op(&self) -> OpCode {
        match self {
            Self::Add(..) => OpCode::Add,
            Self::Subtract(..) => OpCode::Subtract,
            Self::Multiply(..) => OpCode::Multiply,
            Self::Divide(..) => OpCode::Divide,
            Self::Power { .. } => OpCode::Power,
            Self::Root { .. } => OpCode::Root,
        }
    }

    /// Evaluate and render the request.
    ///
    /// Division by zero is not an error here: it is rendered as
    /// `Error: Division by zero` and still counts as a calculation.
    ///
    /// # Errors
    /// Returns [`CalcError::InvalidArgument`] for an invalid root request.
    pub fn evaluate(&self, root_options: RootOptions) -> Result<Calculation, CalcError> {
        let (expression, result) = match *self {
            Self::Add(x, y) => (format!("{x} + {y}"), arith::add(x, y).to_string()),
            Self::Subtract(x, y) => (format!("{x} - {y}"), arith::subtract(x, y).to_string()),
            Self::Multiply(x, y) => (format!("{x} * {y}"), arith::multiply(x, y).to_string()),
            Self::Divide(x, y) => (
                format!("{x} / {y}"),
                arith::divide_with_remainder(x, y).unwrap_or_else(|e| e.user_message()),
            ),
            Self::Power { base, exponent } => (
                format!("{base}^{exponent}"),
                format_float(arith::power(f64::from(base), f64::from(exponent))),
            ),
            Self::Root { value, index } => (
                format!("{index}√{}", format_float(value)),
                format_float(root::nth_root_with(value, index, root_options)?),
            ),
        };
        Ok(Calculation {
            operation: self.op().label(),
            expression,
            result,
        })
    }
}

/// State owned by the driver for one program run.
#[derive(Debug)]
pub struct Session {
    history: HistoryLog,
    root_options: RootOptions,
    clock: fn() -> String,
}

impl Session {
    pub fn new(history: HistoryLog, root_options: RootOptions) -> Self {
        Self {
            history,
            root_options,
            clock: timestamp::now,
        }
    }

    /// Replace the timestamp source.
    #[must_use]
    pub fn with_clock(mut self, clock: fn() -> String) -> Self {
        self.clock = clock;
        self
    }

    /// Evaluate `request` and append it to the history.
    ///
    /// Failed requests are not recorded.
    ///
    /// # Errors
    /// Propagates the [`CalcError`] from evaluation.
    pub fn perform(&mut self, request: &Request) -> Result<&HistoryRecord, CalcError> {
        let timestamp = (self.clock)();
        let calc = request.evaluate(self.root_options)?;
        Ok(self.history.push(HistoryRecord::new(
            calc.operation,
            calc.expression,
            calc.result,
            timestamp,
        )))
    }

    pub const fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn into_history(self) -> HistoryLog {
        self.history
    }
}
