use anyhow::{bail, Context};
use pagechase::config::GameConfig;
use pagechase::error::GameError;
use pagechase::logging;
use tracing::info;

use crate::app::App;

mod app;

/// Simulated time after which the demo gives up, in milliseconds.
const DEMO_LIMIT_MS: f64 = 10.0 * 60.0 * 1000.0;

pub fn main() -> anyhow::Result<()> {
    logging::init();

    let config = GameConfig::load().context("Could not load configuration")?;
    let mut app = App::new(config, DEMO_LIMIT_MS).context("Could not create game")?;

    let ticket = app.game.start().context("Could not start game")?;
    info!(epoch = ticket.epoch, "Starting headless session");

    while app.run() {}
    app.log_sounds();

    let Some(summary) = app.game.last_summary().cloned() else {
        app.game.stop();
        bail!(GameError::InvalidState(format!(
            "no result after {:.0} simulated seconds",
            app.now_ms() / 1000.0
        )));
    };

    info!(
        won = summary.is_win,
        score = %summary.formatted_score(),
        deaths = app.game.deaths(),
        seconds = app.now_ms() / 1000.0,
        "Session finished"
    );
    app.game.stop();
    Ok(())
}
