// observer.rs

use std::path::PathBuf;

use anyhow::Context as _;

use crate::calculation::Calculation;
use crate::persistence;

/// Subscriber notified after every recorded calculation.
pub trait CalculationObserver {
    fn name(&self) -> &str;

    /// Called with the new record and the history as it stands after the append.
    fn notify(&self, calculation: &Calculation, history: &[Calculation]) -> anyhow::Result<()>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// Ordered list of subscribers owned by the application layer. Subscribers
/// run in registration order and a failing one never stops the rest.
#[derive(Default)]
pub struct ObserverList {
    observers: Vec<(ObserverId, Box<dyn CalculationObserver>)>,
    next_id: u64,
}

impl ObserverList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, observer: Box<dyn CalculationObserver>) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        tracing::debug!(observer = observer.name(), "observer registered");
        self.observers.push((id, observer));
        id
    }

    pub fn remove(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(oid, _)| *oid != id);
        self.observers.len() != before
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.observers.iter().map(|(_, o)| o.name()).collect()
    }

    /// Run every subscriber; returns how many failed.
    pub fn notify_all(&self, calculation: &Calculation, history: &[Calculation]) -> usize {
        let mut failures = 0;
        for (_, observer) in &self.observers {
            if let Err(err) = observer.notify(calculation, history) {
                failures += 1;
                tracing::warn!(observer = observer.name(), "observer failed: {:#}", err);
            }
        }
        failures
    }
}

/// Logs each calculation at info level.
pub struct LoggingObserver;

impl CalculationObserver for LoggingObserver {
    fn name(&self) -> &str {
        "logging"
    }

    fn notify(&self, calculation: &Calculation, _history: &[Calculation]) -> anyhow::Result<()> {
        tracing::info!(
            operation = calculation.operation(),
            operand1 = calculation.operand1(),
            operand2 = calculation.operand2(),
            result = calculation.result(),
            "calculation performed"
        );
        Ok(())
    }
}

/// Writes the full history to a file after every calculation.
pub struct AutoSaveObserver {
    path: PathBuf,
}

impl AutoSaveObserver {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CalculationObserver for AutoSaveObserver {
    fn name(&self) -> &str {
        "auto-save"
    }

    fn notify(&self, _calculation: &Calculation, history: &[Calculation]) -> anyhow::Result<()> {
        persistence::save(&self.path, history)
            .with_context(|| format!("auto-save to {} failed", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Recorder {
        label: &'static str,
        log: Rc<RefCell<Vec<String>>>,
        fail: bool,
    }

    impl CalculationObserver for Recorder {
        fn name(&self) -> &str {
            self.label
        }

        fn notify(&self, calculation: &Calculation, history: &[Calculation]) -> anyhow::Result<()> {
            self.log
                .borrow_mut()
                .push(format!("{}:{}:{}", self.label, calculation.operation(), history.len()));
            if self.fail {
                anyhow::bail!("{} is broken", self.label);
            }
            Ok(())
        }
    }

    fn recorder(label: &'static str, log: &Rc<RefCell<Vec<String>>>, fail: bool) -> Box<dyn CalculationObserver> {
        Box::new(Recorder {
            label,
            log: Rc::clone(log),
            fail,
        })
    }

    #[test]
    fn observers_run_in_registration_order_despite_failures() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut list = ObserverList::new();
        list.add(recorder("first", &log, false));
        list.add(recorder("broken", &log, true));
        list.add(recorder("last", &log, false));

        let calc = Calculation::new("add", 1.0, 2.0, 3.0);
        let failures = list.notify_all(&calc, std::slice::from_ref(&calc));
        assert_eq!(failures, 1);
        assert_eq!(*log.borrow(), vec!["first:add:1", "broken:add:1", "last:add:1"]);
    }

    #[test]
    fn removed_observers_are_not_notified() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut list = ObserverList::new();
        let a = list.add(recorder("a", &log, false));
        list.add(recorder("b", &log, false));
        assert!(list.remove(a));
        assert!(!list.remove(a));
        assert_eq!(list.names(), vec!["b"]);

        let calc = Calculation::new("add", 1.0, 2.0, 3.0);
        list.notify_all(&calc, &[]);
        assert_eq!(*log.borrow(), vec!["b:add:0"]);
    }

    #[test]
    fn auto_save_writes_history_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("auto").join("history.csv");
        let observer = AutoSaveObserver::new(&path);
        let calc = Calculation::new("add", 1.0, 2.0, 3.0);
        observer.notify(&calc, std::slice::from_ref(&calc)).unwrap();
        assert_eq!(persistence::load(&path).unwrap(), vec![calc]);
    }

    #[test]
    fn auto_save_failure_is_an_error_not_a_panic() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "x").unwrap();
        // parent "directory" is a regular file
        let observer = AutoSaveObserver::new(blocker.join("history.csv"));
        let calc = Calculation::new("add", 1.0, 2.0, 3.0);
        let err = observer.notify(&calc, std::slice::from_ref(&calc)).unwrap_err();
        assert!(err.to_string().contains("auto-save"));
    }
}
