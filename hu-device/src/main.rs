//! Head Unit Device
//!
//! Runs the library sync session headless: a simulated phone connects over a
//! simulated BLE link, pushes its catalog, and a scripted browsing session
//! exercises queries, playback and reconnects.

mod head_unit;
mod settings;

use std::time::Duration;

use head_unit::HeadUnit;
use hu_library::{JsonFileStore, MemoryStore, SelectionStore, SELECTION_NAMESPACE};
use settings::{Settings, APP_DIR};
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn selection_store(settings: &Settings) -> Box<dyn SelectionStore> {
    if !settings.persist_selections {
        return Box::new(MemoryStore::new());
    }
    match JsonFileStore::open_namespace(APP_DIR, SELECTION_NAMESPACE) {
        Ok(store) => {
            info!("Selection memory at {}", store.path().display());
            Box::new(store)
        }
        Err(e) => {
            warn!("Selection memory not persisted: {}", e);
            Box::new(MemoryStore::new())
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Include all our crates in the default filter
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "hu_device=info,hu_protocol=info,hu_library=info,hu_link=info,hu_sim=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting head unit");

    let settings = Settings::load();
    if let Some(path) = Settings::settings_path() {
        if !path.exists() {
            match settings.save() {
                Ok(()) => info!("Wrote default settings to {}", path.display()),
                Err(e) => warn!("{}", e),
            }
        }
    }

    let mut unit = HeadUnit::new(&settings, selection_store(&settings));
    if let Err(e) = unit.start() {
        error!("Failed to start link: {}", e);
        return;
    }

    let period = Duration::from_millis(settings.tick_interval_ms.max(1));
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let deadline = tokio::time::sleep(Duration::from_secs(settings.demo_duration_secs));
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                unit.tick();
                if unit.is_finished() {
                    info!("Browsing script complete");
                    break;
                }
            }
            _ = &mut deadline => {
                warn!("Session time limit reached");
                break;
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
        }
    }

    info!("Shutting down");
}
