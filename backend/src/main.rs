use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{error, info};
use wheel_shared::wheel_config::WheelConfig;

use crate::config::Settings;
use crate::driver::SpinDriver;

mod config;
mod driver;
mod error;
mod logging;

async fn load_wheel_config(settings: &Settings) -> Result<WheelConfig, error::Error> {
    let mut config = WheelConfig::default();
    if let Some(path) = &settings.config_path {
        let json = tokio::fs::read_to_string(path).await?;
        config.import_json(&json)?;
        info!("Loaded {} options from {}", config.options.len(), path.display());
    }
    if let Some(tournament) = settings.tournament {
        config.set_tournament_mode(tournament);
    }
    config.animation_config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::from_path(".env").ok();
    logging::setup();

    let settings = Settings::from_env()?;
    let config = load_wheel_config(&settings).await.map_err(|e| {
        error!("Could not load wheel configuration: {}", e);
        e
    })?;

    info!(
        "Wheel ready: {} options, tournament mode {}",
        config.options.len(),
        if config.tournament_mode { "on" } else { "off" }
    );

    let mut driver = SpinDriver::with_entropy(
        config,
        settings.triggers.clone(),
        settings.spin_gap.as_secs_f64() * 1000.0,
    );
    for event in &settings.demo_events {
        driver.handle_event(event);
    }
    if driver.is_idle() {
        driver.request_manual_spin();
    }

    let started = Instant::now();
    let mut ticker = time::interval(settings.tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let now_ms = started.elapsed().as_secs_f64() * 1000.0;
                driver.tick(now_ms);
                if driver.is_idle() {
                    break;
                }
            }
            _ = &mut shutdown => {
                info!("Shutting down with {} spin(s) still queued", driver.queued());
                break;
            }
        }
    }

    let statistics = serde_json::to_string(&driver.config().statistics)?;
    info!(
        "Session statistics: {} (wheel resting at {:.3} rad)",
        statistics,
        driver.wheel().current_angle()
    );
    Ok(())
}
