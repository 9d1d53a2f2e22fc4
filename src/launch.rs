//! Process-level setup shared by every binary.
//!
//! `launch` reads [`RuntimeConfig`] from the environment, installs file
//! logging when `TTY_GAMES_LOG` is set, claims the terminal, runs the game
//! and hands the terminal back before returning. A panic hook restores the
//! original terminal attributes first so the panic message stays readable.
//! SIGTERM, SIGHUP and SIGINT restore the terminal at once and end the game
//! through the normal teardown; the launch then fails naming the signal.

use std::fs::OpenOptions;
use std::panic;
use std::sync::Mutex;

use anyhow::{bail, Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::core::{run_game, Game, GameContext, RuntimeConfig};
use crate::input::{ExitSignals, KeyReader, Restorer};
use crate::term::Screen;
use crate::types::Outcome;

/// Log to the file named in `config`; a no-op without one.
///
/// Returns whether a subscriber was installed. stdout is never used, it
/// belongs to the game screen.
pub fn init_logging(config: &RuntimeConfig) -> Result<bool> {
    let Some(path) = &config.log_path else {
        return Ok(false);
    };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .finish();
    Ok(tracing::subscriber::set_global_default(subscriber).is_ok())
}

fn install_panic_restore(restorer: Restorer) {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        restorer.restore();
        previous(info);
    }));
}

/// Run `game` on the controlling terminal with configuration from the
/// environment.
pub fn launch<G: Game>(game: G) -> Result<Outcome> {
    launch_with(game, RuntimeConfig::from_env())
}

pub fn launch_with<G: Game>(mut game: G, config: RuntimeConfig) -> Result<Outcome> {
    init_logging(&config)?;
    info!(?config, "starting");

    let mut reader = KeyReader::open().context("failed to claim the terminal")?;
    install_panic_restore(reader.restorer());
    let exit = ExitSignals::install(reader.restorer(), reader.interrupt_handle())
        .context("failed to watch termination signals")?;

    let ctx = GameContext::new(Screen::stdout(), config.rng(), reader.interrupt_handle(), config);
    let result = run_game(&mut game, &mut reader, ctx);
    drop(game);
    let signal = exit.received();
    drop(exit);

    let closed = reader.close();
    // The session is gone; later panics use the default hook.
    drop(panic::take_hook());

    let outcome = result?;
    if let Err(e) = closed {
        warn!(error = %e, "terminal restore failed");
        return Err(e).context("failed to restore the terminal");
    }
    if let Some(signal) = signal {
        info!(signal, "exiting after termination signal");
        bail!("terminated by signal {signal}");
    }
    info!(outcome = outcome.as_str(), "exiting");
    Ok(outcome)
}
