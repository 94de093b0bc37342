use anyhow::Context as _;

use calc_history::{logger, repl, Calculator, CalculatorConfig};

fn main() -> anyhow::Result<()> {
    // variables already set in the environment win over .env entries
    let dotenv_file = dotenvy::dotenv().ok();
    let config = CalculatorConfig::from_env().context("invalid calculator configuration")?;
    config.ensure_dirs()?;
    let _log_guard = logger::init_logging(&config)?;
    if let Some(path) = &dotenv_file {
        tracing::info!(path = %path.display(), "loaded settings from .env");
    }

    let mut calculator = Calculator::new(config);
    let outcome = repl::start_repl(&mut calculator);
    if let Err(err) = &outcome {
        tracing::error!("calculator stopped: {:#}", err);
    }
    outcome
}
