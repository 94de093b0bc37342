// parser.rs

use std::path::PathBuf;

use crate::error::ValidationError;
use crate::operations::Operation;

/// Utility command names, in help order.
pub const COMMANDS: [&str; 8] = ["help", "history", "clear", "undo", "redo", "save", "load", "exit"];

#[derive(Clone, PartialEq, Debug)]
pub enum Command {
    Empty,
    Help,
    History,
    Clear,
    Undo,
    Redo,
    Save(Option<PathBuf>),
    Load(Option<PathBuf>),
    Exit,
    /// Operands are present only when both were typed on the command line.
    Calculate {
        operation: Operation,
        operands: Option<(String, String)>,
    },
    Usage(String),
    Unknown(String),
}

/// Split a line into words. Single and double quotes group words and a
/// backslash escapes the next character outside single quotes.
pub fn split_words(line: &str) -> Vec<String> {
    enum State {
        Normal,
        Single,
        Double,
    }
    let mut words = Vec::new();
    let mut cur = String::new();
    let mut in_word = false;
    let mut state = State::Normal;
    let mut chars = line.chars().peekable();
    while let Some(ch) = chars.next() {
        match state {
            State::Normal => match ch {
                '\'' => {
                    state = State::Single;
                    in_word = true;
                }
                '"' => {
                    state = State::Double;
                    in_word = true;
                }
                '\\' => {
                    if let Some(next) = chars.next() {
                        cur.push(next);
                    }
                    in_word = true;
                }
                c if c.is_whitespace() => {
                    if in_word {
                        words.push(std::mem::take(&mut cur));
                        in_word = false;
                    }
                }
                _ => {
                    cur.push(ch);
                    in_word = true;
                }
            },
            State::Single => match ch {
                '\'' => state = State::Normal,
                _ => cur.push(ch),
            },
            State::Double => match ch {
                '"' => state = State::Normal,
                '\\' => match chars.peek() {
                    Some(&next) if next == '"' || next == '\\' => {
                        cur.push(next);
                        chars.next();
                    }
                    _ => cur.push('\\'),
                },
                _ => cur.push(ch),
            },
        }
    }
    if in_word {
        words.push(cur);
    }
    words
}

pub fn parse_command(line: &str) -> Command {
    let words = split_words(line.trim());
    let Some((head, args)) = words.split_first() else {
        return Command::Empty;
    };
    let name = head.to_ascii_lowercase();
    let path_arg = || args.first().map(PathBuf::from);
    match (name.as_str(), args.len()) {
        ("help", 0) => Command::Help,
        ("history", 0) => Command::History,
        ("clear", 0) => Command::Clear,
        ("undo", 0) => Command::Undo,
        ("redo", 0) => Command::Redo,
        ("exit" | "quit", 0) => Command::Exit,
        ("save", 0 | 1) => Command::Save(path_arg()),
        ("load", 0 | 1) => Command::Load(path_arg()),
        ("save" | "load", _) => Command::Usage(format!("usage: {} [path]", name)),
        ("help" | "history" | "clear" | "undo" | "redo" | "exit" | "quit", _) => {
            Command::Usage(format!("usage: {}", name))
        }
        _ => match Operation::lookup(&name) {
            Ok(operation) => match args {
                [] => Command::Calculate {
                    operation,
                    operands: None,
                },
                [a, b] => Command::Calculate {
                    operation,
                    operands: Some((a.clone(), b.clone())),
                },
                _ => Command::Usage(format!("usage: {} [operand1 operand2]", operation.name())),
            },
            Err(_) => Command::Unknown(head.clone()),
        },
    }
}

/// Parse a user-typed number, rejecting non-finite values and values whose
/// magnitude exceeds `max_value`.
pub fn validate_number(value: &str, max_value: Option<f64>) -> Result<f64, ValidationError> {
    let trimmed = value.trim();
    let num: f64 = trimmed
        .parse()
        .map_err(|_| ValidationError::InvalidNumber(trimmed.to_string()))?;
    if !num.is_finite() {
        return Err(ValidationError::InvalidNumber(trimmed.to_string()));
    }
    if let Some(max) = max_value {
        if num.abs() > max {
            return Err(ValidationError::OutOfRange { value: num, max });
        }
    }
    Ok(num)
}

pub fn validate_operands(a: &str, b: &str, max_value: Option<f64>) -> Result<(f64, f64), ValidationError> {
    Ok((validate_number(a, max_value)?, validate_number(b, max_value)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_handles_quotes_and_escapes() {
        assert_eq!(split_words("  save  out.csv "), vec!["save", "out.csv"]);
        assert_eq!(split_words("load 'my file.csv'"), vec!["load", "my file.csv"]);
        assert_eq!(split_words(r#"load "a \"b\".csv""#), vec!["load", "a \"b\".csv"]);
        assert_eq!(split_words(r"load my\ file.csv"), vec!["load", "my file.csv"]);
        assert_eq!(split_words("load ''"), vec!["load", ""]);
        assert!(split_words("   ").is_empty());
    }

    #[test]
    fn utility_commands() {
        assert_eq!(parse_command(""), Command::Empty);
        assert_eq!(parse_command("HELP"), Command::Help);
        assert_eq!(parse_command("history"), Command::History);
        assert_eq!(parse_command("undo"), Command::Undo);
        assert_eq!(parse_command("quit"), Command::Exit);
        assert_eq!(parse_command("save"), Command::Save(None));
        assert_eq!(
            parse_command("load /tmp/h.csv"),
            Command::Load(Some(PathBuf::from("/tmp/h.csv")))
        );
        assert!(matches!(parse_command("save a b"), Command::Usage(_)));
        assert!(matches!(parse_command("clear now"), Command::Usage(_)));
        assert_eq!(parse_command("frobnicate"), Command::Unknown("frobnicate".to_string()));
    }

    #[test]
    fn operation_commands() {
        assert_eq!(
            parse_command("Add"),
            Command::Calculate {
                operation: Operation::Add,
                operands: None
            }
        );
        assert_eq!(
            parse_command("power 2 10"),
            Command::Calculate {
                operation: Operation::Power,
                operands: Some(("2".to_string(), "10".to_string()))
            }
        );
        assert!(matches!(parse_command("divide 1"), Command::Usage(_)));
    }

    #[test]
    fn numbers_are_validated() {
        assert_eq!(validate_number(" 3.5 ", None), Ok(3.5));
        assert_eq!(validate_number("-1e3", Some(1e10)), Ok(-1000.0));
        assert_eq!(
            validate_number("abc", None),
            Err(ValidationError::InvalidNumber("abc".to_string()))
        );
        assert!(matches!(validate_number("inf", None), Err(ValidationError::InvalidNumber(_))));
        assert!(matches!(validate_number("NaN", None), Err(ValidationError::InvalidNumber(_))));
        assert_eq!(
            validate_number("-20", Some(10.0)),
            Err(ValidationError::OutOfRange { value: -20.0, max: 10.0 })
        );
        assert_eq!(validate_operands("1", "2", Some(10.0)), Ok((1.0, 2.0)));
        assert!(validate_operands("1", "x", None).is_err());
    }
}
