// lib.rs

pub mod builtins;
pub mod calculation;
pub mod calculator;
pub mod codec;
pub mod completion;
pub mod config;
pub mod error;
pub mod history;
pub mod logger;
pub mod memento;
pub mod observer;
pub mod operations;
pub mod parser;
pub mod persistence;
pub mod repl;
pub mod util;

pub use calculation::Calculation;
pub use calculator::Calculator;
pub use config::CalculatorConfig;
pub use error::{CalculatorError, ConfigurationError, OperationError, PersistenceError, Result, ValidationError};
pub use history::HistoryStore;
pub use memento::{Snapshot, UndoRedoManager};
