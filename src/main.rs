//! Steel Lotus sandbox
//!
//! Headless driver for the lock-on system: loads settings, builds a training
//! ground and plays a scripted lock-on session on a fixed timestep.
//!
//! Usage: `lotus-sandbox [settings.toml] [--write-default-settings]`

mod scenario;
mod settings;

use std::path::PathBuf;

use anyhow::{Context, Result};
use glam::Vec3;
use lotus_game::{TracingObserver, TrainingGround};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use settings::SandboxSettings;

fn main() -> Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set subscriber")?;

    let mut settings_path: Option<PathBuf> = None;
    let mut write_defaults = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--write-default-settings" => write_defaults = true,
            other => settings_path = Some(PathBuf::from(other)),
        }
    }

    if write_defaults {
        let path = settings_path
            .or_else(SandboxSettings::default_path)
            .context("Could not determine config directory")?;
        SandboxSettings::default().save(&path)?;
        return Ok(());
    }

    let settings = SandboxSettings::load(settings_path.as_deref());
    settings
        .lock_on
        .validate()
        .context("Invalid lock-on settings")?;

    info!("Starting Steel Lotus sandbox...");

    let mut ground = TrainingGround::with_configs(
        settings.lock_on.clone(),
        settings.movement.clone(),
        settings.camera.clone(),
    );
    ground.set_observer(Box::new(TracingObserver));
    ground.spawn_player(Vec3::ZERO);
    scenario::populate(&mut ground, &settings.scenario);

    let report = scenario::run_session(&mut ground, &settings);
    info!(
        "Session complete: {} of {} lock attempts succeeded, {} automatic releases over {} steps",
        report.acquisitions, report.toggles, report.automatic_releases, report.steps
    );

    Ok(())
}
