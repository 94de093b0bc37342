// calculator.rs

use std::path::{Path, PathBuf};

use crate::calculation::Calculation;
use crate::config::CalculatorConfig;
use crate::error::{OperationError, PersistenceError};
use crate::history::HistoryStore;
use crate::observer::{AutoSaveObserver, CalculationObserver, LoggingObserver, ObserverId, ObserverList};
use crate::operations::Operation;
use crate::util::round_to;

/// Ties the operation registry, the history store and the subscribers together.
pub struct Calculator {
    config: CalculatorConfig,
    history: HistoryStore,
    observers: ObserverList,
}

impl Calculator {
    /// Calculator with the default subscribers: logging, plus auto-save when enabled.
    pub fn new(config: CalculatorConfig) -> Self {
        let mut calculator = Self::without_observers(config);
        calculator.add_observer(Box::new(LoggingObserver));
        if calculator.config.auto_save {
            let path = calculator.config.history_file();
            calculator.add_observer(Box::new(AutoSaveObserver::new(path)));
        }
        tracing::info!(
            capacity = calculator.history.capacity(),
            auto_save = calculator.config.auto_save,
            observers = calculator.observers.len(),
            "calculator initialized"
        );
        calculator
    }

    pub fn without_observers(config: CalculatorConfig) -> Self {
        Self {
            history: HistoryStore::new(config.max_history_size),
            observers: ObserverList::new(),
            config,
        }
    }

    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    pub fn add_observer(&mut self, observer: Box<dyn CalculationObserver>) -> ObserverId {
        self.observers.add(observer)
    }

    pub fn remove_observer(&mut self, id: ObserverId) -> bool {
        self.observers.remove(id)
    }

    /// Every supported operation, in listing order.
    pub fn available_operations(&self) -> &'static [Operation] {
        &Operation::ALL
    }

    /// Run `operation` on both operands, record the rounded result and notify
    /// subscribers. History is untouched when the operation fails.
    pub fn calculate(&mut self, operation: &str, a: f64, b: f64) -> Result<f64, OperationError> {
        let op = Operation::lookup(operation)?;
        let result = round_to(op.apply(a, b)?, self.config.precision);

        let calculation = Calculation::new(op.name(), a, b, result);
        self.history.append(calculation.clone());
        self.observers.notify_all(&calculation, self.history.entries());
        Ok(result)
    }

    pub fn history(&self) -> &[Calculation] {
        self.history.entries()
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
        tracing::info!("history cleared");
    }

    pub fn undo(&mut self) -> bool {
        let done = self.history.undo();
        if done {
            tracing::info!(entries = self.history.len(), "undo performed");
        }
        done
    }

    pub fn redo(&mut self) -> bool {
        let done = self.history.redo();
        if done {
            tracing::info!(entries = self.history.len(), "redo performed");
        }
        done
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    fn resolve(&self, path: Option<&Path>) -> PathBuf {
        path.map(Path::to_path_buf)
            .unwrap_or_else(|| self.config.history_file())
    }

    /// Save to `path`, or the configured history file. Returns the path used.
    pub fn save_history(&self, path: Option<&Path>) -> Result<PathBuf, PersistenceError> {
        let path = self.resolve(path);
        self.history.save_to(&path)?;
        tracing::info!(path = %path.display(), rows = self.history.len(), "history saved");
        Ok(path)
    }

    pub fn load_history(&mut self, path: Option<&Path>) -> Result<(PathBuf, usize), PersistenceError> {
        let path = self.resolve(path);
        let rows = self.history.load_from(&path)?;
        tracing::info!(path = %path.display(), rows, "history loaded");
        Ok((path, rows))
    }
}
