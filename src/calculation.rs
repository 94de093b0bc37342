// calculation.rs

use std::fmt;

use chrono::{Local, NaiveDateTime};

/// One computed result: operation name, both operands, the result and when it was recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct Calculation {
    operation: String,
    operand1: f64,
    operand2: f64,
    result: f64,
    created_at: NaiveDateTime,
}

impl Calculation {
    /// Record a calculation stamped with the current local time.
    pub fn new(operation: impl Into<String>, operand1: f64, operand2: f64, result: f64) -> Self {
        Self::with_timestamp(operation, operand1, operand2, result, Local::now().naive_local())
    }

    pub fn with_timestamp(
        operation: impl Into<String>,
        operand1: f64,
        operand2: f64,
        result: f64,
        created_at: NaiveDateTime,
    ) -> Self {
        Self {
            operation: operation.into(),
            operand1,
            operand2,
            result,
            created_at,
        }
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }
    pub fn operand1(&self) -> f64 {
        self.operand1
    }
    pub fn operand2(&self) -> f64 {
        self.operand2
    }
    pub fn result(&self) -> f64 {
        self.result
    }
    pub fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }
}

impl fmt::Display for Calculation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} {} {:?} = {:?}",
            self.operand1, self.operation, self.operand2, self.result
        )
    }
}
