// completion.rs

use rustyline::completion::{Completer, FilenameCompleter, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::{ValidationContext, ValidationResult, Validator};
use rustyline::{Context, Helper};

use crate::operations::Operation;
use crate::parser::COMMANDS;

/// Completes command and operation names in first position and file paths
/// after `save` / `load`.
pub struct CommandCompleter {
    files: FilenameCompleter,
}

impl CommandCompleter {
    pub fn new() -> Self {
        Self {
            files: FilenameCompleter::new(),
        }
    }

    pub fn candidates(prefix: &str) -> Vec<String> {
        let prefix = prefix.to_ascii_lowercase();
        let mut names: Vec<String> = COMMANDS
            .iter()
            .copied()
            .chain(Operation::names())
            .filter(|name| name.starts_with(&prefix))
            .map(str::to_string)
            .collect();
        names.sort();
        names.dedup();
        names
    }
}

impl Default for CommandCompleter {
    fn default() -> Self {
        Self::new()
    }
}

impl Completer for CommandCompleter {
    type Candidate = Pair;

    fn complete(&self, line: &str, pos: usize, ctx: &Context<'_>) -> Result<(usize, Vec<Pair>), ReadlineError> {
        let before = &line[..pos];
        let leading = before.len() - before.trim_start().len();
        let typed = &before[leading..];

        if let Some(space) = typed.find(char::is_whitespace) {
            let command = typed[..space].to_ascii_lowercase();
            if command == "save" || command == "load" {
                return self.files.complete(line, pos, ctx);
            }
            return Ok((pos, Vec::new()));
        }

        let completions = Self::candidates(typed)
            .into_iter()
            .map(|name| Pair {
                display: name.clone(),
                replacement: format!("{} ", name),
            })
            .collect();
        Ok((leading, completions))
    }
}

impl Hinter for CommandCompleter {
    type Hint = String;
    fn hint(&self, _line: &str, _pos: usize, _ctx: &Context<'_>) -> Option<String> {
        None
    }
}

impl Highlighter for CommandCompleter {}

impl Validator for CommandCompleter {
    fn validate(&self, _ctx: &mut ValidationContext) -> Result<ValidationResult, ReadlineError> {
        Ok(ValidationResult::Valid(None))
    }
}

impl Helper for CommandCompleter {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidates_match_prefix() {
        assert_eq!(CommandCompleter::candidates("re"), vec!["redo"]);
        assert_eq!(CommandCompleter::candidates("s"), vec!["save", "subtract"]);
        assert_eq!(CommandCompleter::candidates("Int"), vec!["int_divide"]);
        assert!(CommandCompleter::candidates("zzz").is_empty());
        assert_eq!(CommandCompleter::candidates("").len(), COMMANDS.len() + 10);
    }
}
