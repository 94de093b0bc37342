// operations.rs

use std::fmt;
use std::str::FromStr;

use crate::error::OperationError;

/// The closed set of binary operations the calculator knows.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
    Root,
    Modulus,
    IntDivide,
    Percent,
    AbsDiff,
}

impl Operation {
    /// Every operation in menu order.
    pub const ALL: [Operation; 10] = [
        Operation::Add,
        Operation::Subtract,
        Operation::Multiply,
        Operation::Divide,
        Operation::Power,
        Operation::Root,
        Operation::Modulus,
        Operation::IntDivide,
        Operation::Percent,
        Operation::AbsDiff,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Operation::Add => "add",
            Operation::Subtract => "subtract",
            Operation::Multiply => "multiply",
            Operation::Divide => "divide",
            Operation::Power => "power",
            Operation::Root => "root",
            Operation::Modulus => "modulus",
            Operation::IntDivide => "int_divide",
            Operation::Percent => "percent",
            Operation::AbsDiff => "abs_diff",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Operation::Add => "+",
            Operation::Subtract => "-",
            Operation::Multiply => "*",
            Operation::Divide => "/",
            Operation::Power => "^",
            Operation::Root => "√",
            Operation::Modulus => "%",
            Operation::IntDivide => "//",
            Operation::Percent => "%of",
            Operation::AbsDiff => "abs_diff",
        }
    }

    /// Case-insensitive lookup by name.
    pub fn lookup(name: &str) -> Result<Operation, OperationError> {
        let wanted = name.trim();
        Operation::ALL
            .into_iter()
            .find(|op| op.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| OperationError::Unknown(name.to_string()))
    }

    pub fn names() -> impl Iterator<Item = &'static str> {
        Operation::ALL.into_iter().map(Operation::name)
    }

    pub fn apply(self, a: f64, b: f64) -> Result<f64, OperationError> {
        let value = match self {
            Operation::Add => a + b,
            Operation::Subtract => a - b,
            Operation::Multiply => a * b,
            Operation::Divide => {
                if b == 0.0 {
                    return Err(OperationError::DivisionByZero);
                }
                a / b
            }
            Operation::Power => a.powf(b),
            Operation::Root => root(a, b)?,
            Operation::Modulus => {
                if b == 0.0 {
                    return Err(OperationError::ModulusByZero);
                }
                floored_rem(a, b)
            }
            Operation::IntDivide => {
                if b == 0.0 {
                    return Err(OperationError::DivisionByZero);
                }
                (a / b).floor()
            }
            Operation::Percent => {
                if b == 0.0 {
                    return Err(OperationError::ZeroPercentBase);
                }
                a / b * 100.0
            }
            Operation::AbsDiff => (a - b).abs(),
        };
        if value.is_finite() {
            Ok(value)
        } else {
            Err(OperationError::NonFinite {
                operation: self.name(),
            })
        }
    }
}

fn root(a: f64, b: f64) -> Result<f64, OperationError> {
    if b == 0.0 {
        return Err(OperationError::ZeroRoot);
    }
    if a < 0.0 {
        if b % 2.0 == 0.0 {
            return Err(OperationError::EvenRootOfNegative);
        }
        // odd integer roots of negatives are real
        if b.fract() == 0.0 {
            return Ok(-(-a).powf(1.0 / b));
        }
    }
    Ok(a.powf(1.0 / b))
}

/// Remainder whose sign follows the divisor.
fn floored_rem(a: f64, b: f64) -> f64 {
    let r = a % b;
    if r != 0.0 && (r < 0.0) != (b < 0.0) {
        r + b
    } else {
        r
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = OperationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::lookup(s)
    }
}
