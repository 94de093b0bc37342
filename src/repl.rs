// repl.rs

use std::io::Write;

use anyhow::Context as _;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{CompletionType, Config, Editor};

use crate::builtins::{self, Flow};
use crate::calculator::Calculator;
use crate::completion::CommandCompleter;
use crate::parser::{parse_command, Command};
use crate::util::writeln_ignore_broken_pipe;

const PROMPT: &str = "calculator> ";

type LineEditor = Editor<CommandCompleter, DefaultHistory>;

/// Execute one parsed command. `prompt` is asked for operands an operation
/// command did not carry inline; `None` from it abandons the calculation.
pub fn dispatch<W, P>(calculator: &mut Calculator, command: Command, out: &mut W, mut prompt: P) -> std::io::Result<Flow>
where
    W: Write + ?Sized,
    P: FnMut(&str) -> Option<String>,
{
    match command {
        Command::Empty => {}
        Command::Help => builtins::print_help(calculator, out)?,
        Command::History => builtins::run_history(calculator, out)?,
        Command::Clear => builtins::run_clear(calculator, out)?,
        Command::Undo => builtins::run_undo(calculator, out)?,
        Command::Redo => builtins::run_redo(calculator, out)?,
        Command::Save(path) => builtins::run_save(calculator, path.as_deref(), out)?,
        Command::Load(path) => builtins::run_load(calculator, path.as_deref(), out)?,
        Command::Exit => {
            writeln_ignore_broken_pipe(out, "Goodbye!")?;
            return Ok(Flow::Exit);
        }
        Command::Calculate { operation, operands } => {
            let operands = match operands {
                Some(pair) => Some(pair),
                None => prompt("Enter first number: ")
                    .and_then(|a| prompt("Enter second number: ").map(|b| (a, b))),
            };
            match operands {
                Some((a, b)) => builtins::run_operation(calculator, operation, &a, &b, out)?,
                None => writeln_ignore_broken_pipe(out, "Calculation cancelled.")?,
            }
        }
        Command::Usage(usage) => writeln_ignore_broken_pipe(out, usage)?,
        Command::Unknown(name) => writeln_ignore_broken_pipe(
            out,
            format!("Unknown command: '{}'. Type 'help' for available commands.", name),
        )?,
    }
    Ok(Flow::Continue)
}

fn read_operand(rl: &mut LineEditor, prompt: &str) -> Option<String> {
    match rl.readline(prompt) {
        Ok(line) => Some(line),
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => None,
        Err(err) => {
            tracing::warn!("failed to read operand: {}", err);
            None
        }
    }
}

pub fn start_repl(calculator: &mut Calculator) -> anyhow::Result<()> {
    let config = Config::builder().completion_type(CompletionType::List).build();
    let mut rl: LineEditor = Editor::with_config(config).context("failed to create line editor")?;
    rl.set_helper(Some(CommandCompleter::new()));

    let mut stdout = std::io::stdout();
    builtins::print_welcome(&mut stdout)?;

    loop {
        match rl.readline(PROMPT) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(trimmed);
                let command = parse_command(trimmed);
                tracing::debug!(?command, "dispatching");
                let flow = {
                    let mut prompt = |p: &str| read_operand(&mut rl, p);
                    dispatch(calculator, command, &mut stdout, &mut prompt)?
                };
                stdout.flush().ok();
                if flow == Flow::Exit {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                writeln_ignore_broken_pipe(&mut stdout, "Use 'exit' command to quit.")?;
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err).context("failed to read input"),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CalculatorConfig;
    use crate::operations::Operation;

    fn calculator(dir: &std::path::Path) -> Calculator {
        Calculator::without_observers(CalculatorConfig {
            log_dir: dir.join("logs"),
            history_dir: dir.join("history"),
            auto_save: false,
            ..CalculatorConfig::default()
        })
    }

    fn run(calc: &mut Calculator, line: &str, answers: &[&str]) -> (Flow, String) {
        let mut answers = answers.iter().map(|s| s.to_string());
        let mut out = Vec::new();
        let flow = dispatch(calc, parse_command(line), &mut out, |_| answers.next()).unwrap();
        (flow, String::from_utf8(out).unwrap())
    }

    #[test]
    fn operation_prompts_for_missing_operands() {
        let dir = tempfile::tempdir().unwrap();
        let mut calc = calculator(dir.path());
        let (flow, text) = run(&mut calc, "multiply", &["6", "7"]);
        assert_eq!(flow, Flow::Continue);
        assert_eq!(text, "Result: 6.0 multiply 7.0 = 42.0\n");

        let (_, text) = run(&mut calc, "subtract 10 4", &[]);
        assert_eq!(text, "Result: 10.0 subtract 4.0 = 6.0\n");
        assert_eq!(calc.history().len(), 2);
    }

    #[test]
    fn abandoned_prompt_records_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut calc = calculator(dir.path());
        let (_, text) = run(&mut calc, "add", &["1"]);
        assert_eq!(text, "Calculation cancelled.\n");
        assert!(calc.history().is_empty());
    }

    #[test]
    fn session_of_commands() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s.csv");
        let mut calc = calculator(dir.path());
        run(&mut calc, "add 1 2", &[]);
        run(&mut calc, "power 2 3", &[]);
        run(&mut calc, &format!("save {}", path.display()), &[]);
        run(&mut calc, "clear", &[]);
        let (_, text) = run(&mut calc, &format!("load {}", path.display()), &[]);
        assert!(text.starts_with("Loaded 2 calculation(s)"));
        assert_eq!(calc.history()[1].operation(), Operation::Power.name());

        let (_, text) = run(&mut calc, "sqrt", &[]);
        assert!(text.starts_with("Unknown command: 'sqrt'"));
        let (flow, text) = run(&mut calc, "exit", &[]);
        assert_eq!(flow, Flow::Exit);
        assert_eq!(text, "Goodbye!\n");
    }
}
