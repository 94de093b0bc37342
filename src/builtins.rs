// builtins.rs

use std::io::Write;
use std::path::Path;

use itertools::Itertools;

use crate::calculator::Calculator;
use crate::operations::Operation;
use crate::parser::validate_operands;
use crate::util::writeln_ignore_broken_pipe;

const RULE_WIDTH: usize = 60;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Flow {
    Continue,
    Exit,
}

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

pub fn print_welcome<W: Write + ?Sized>(out: &mut W) -> std::io::Result<()> {
    writeln_ignore_broken_pipe(out, rule())?;
    writeln_ignore_broken_pipe(out, format!("{:^width$}", "Advanced Calculator", width = RULE_WIDTH))?;
    writeln_ignore_broken_pipe(out, rule())?;
    writeln_ignore_broken_pipe(out, "Type 'help' for available commands")?;
    writeln_ignore_broken_pipe(out, rule())
}

pub fn print_help<W: Write + ?Sized>(calculator: &Calculator, out: &mut W) -> std::io::Result<()> {
    writeln_ignore_broken_pipe(out, "Available commands:")?;
    writeln_ignore_broken_pipe(out, rule())?;
    writeln_ignore_broken_pipe(out, "Arithmetic operations:")?;
    for op in calculator.available_operations() {
        writeln_ignore_broken_pipe(
            out,
            format!("  {:<15} {:<9} [a b]", op.name(), format!("({})", op.symbol())),
        )?;
    }
    writeln_ignore_broken_pipe(out, "Utility commands:")?;
    let utilities = [
        ("history", "Display calculation history"),
        ("clear", "Clear calculation history"),
        ("undo", "Undo the last calculation"),
        ("redo", "Redo the last undone calculation"),
        ("save [path]", "Save history to file"),
        ("load [path]", "Load history from file"),
        ("help", "Display this help message"),
        ("exit", "Exit the application"),
    ];
    for (cmd, desc) in utilities {
        writeln_ignore_broken_pipe(out, format!("  {:<15} - {}", cmd, desc))?;
    }
    writeln_ignore_broken_pipe(out, rule())
}

pub fn run_history<W: Write + ?Sized>(calculator: &Calculator, out: &mut W) -> std::io::Result<()> {
    let history = calculator.history();
    if history.is_empty() {
        return writeln_ignore_broken_pipe(out, "No calculations in history.");
    }
    writeln_ignore_broken_pipe(out, "Calculation history:")?;
    writeln_ignore_broken_pipe(out, rule())?;
    let listing = history
        .iter()
        .enumerate()
        .map(|(i, calc)| format!("{:>5}. {}", i + 1, calc))
        .join("\n");
    writeln_ignore_broken_pipe(out, listing)?;
    writeln_ignore_broken_pipe(out, rule())
}

pub fn run_clear<W: Write + ?Sized>(calculator: &mut Calculator, out: &mut W) -> std::io::Result<()> {
    calculator.clear_history();
    writeln_ignore_broken_pipe(out, "History cleared.")
}

pub fn run_undo<W: Write + ?Sized>(calculator: &mut Calculator, out: &mut W) -> std::io::Result<()> {
    if calculator.undo() {
        writeln_ignore_broken_pipe(out, "Undo successful.")
    } else {
        writeln_ignore_broken_pipe(out, "Nothing to undo.")
    }
}

pub fn run_redo<W: Write + ?Sized>(calculator: &mut Calculator, out: &mut W) -> std::io::Result<()> {
    if calculator.redo() {
        writeln_ignore_broken_pipe(out, "Redo successful.")
    } else {
        writeln_ignore_broken_pipe(out, "Nothing to redo.")
    }
}

pub fn run_save<W: Write + ?Sized>(calculator: &Calculator, path: Option<&Path>, out: &mut W) -> std::io::Result<()> {
    match calculator.save_history(path) {
        Ok(saved) => writeln_ignore_broken_pipe(out, format!("History saved to {}.", saved.display())),
        Err(err) => writeln_ignore_broken_pipe(out, format!("Save error: {}", err)),
    }
}

pub fn run_load<W: Write + ?Sized>(calculator: &mut Calculator, path: Option<&Path>, out: &mut W) -> std::io::Result<()> {
    match calculator.load_history(path) {
        Ok((loaded, rows)) => writeln_ignore_broken_pipe(
            out,
            format!("Loaded {} calculation(s) from {}.", rows, loaded.display()),
        ),
        Err(err) => writeln_ignore_broken_pipe(out, format!("Load error: {}", err)),
    }
}

/// Validate the typed operands, calculate and report the outcome.
pub fn run_operation<W: Write + ?Sized>(
    calculator: &mut Calculator,
    operation: Operation,
    a: &str,
    b: &str,
    out: &mut W,
) -> std::io::Result<()> {
    let max = calculator.config().max_input_value;
    let (a, b) = match validate_operands(a, b, Some(max)) {
        Ok(pair) => pair,
        Err(err) => return writeln_ignore_broken_pipe(out, format!("Validation error: {}", err)),
    };
    match calculator.calculate(operation.name(), a, b) {
        Ok(result) => writeln_ignore_broken_pipe(
            out,
            format!("Result: {:?} {} {:?} = {:?}", a, operation.name(), b, result),
        ),
        Err(err) => writeln_ignore_broken_pipe(out, format!("Operation error: {}", err)),
    }
}
