//! Lobby Companion Daemon - Binary Entry Point

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use lobby_companion::config::MonitorConfig;
use lobby_companion::domain::Player;
use lobby_companion::events::{DomainEvent, EventPublisher};
use lobby_companion::monitor::LogTailer;
use lobby_companion::store::{AutosaveScheduler, JsonFileRepository, PlayerStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("lobby_companion=info".parse()?))
        .init();

    let config = MonitorConfig::from_env();
    info!(
        log = %config.log_path.display(),
        data = %config.data_path.display(),
        "starting {} {}",
        lobby_companion::NAME,
        lobby_companion::VERSION
    );

    let repository = Arc::new(JsonFileRepository::new(&config.data_path));
    // a malformed or newer-schema store file is fatal at startup
    let store = Arc::new(PlayerStore::load(repository)?);

    let publisher = Arc::new(EventPublisher::new());
    let consumer_store = Arc::clone(&store);
    publisher.subscribe(move |event| match event {
        DomainEvent::KillerIdentityResolved {
            persistent_id,
            session_id,
        } => {
            info!(%persistent_id, %session_id, "killer identity resolved");
            if consumer_store.player_by_id(persistent_id).is_none() {
                consumer_store.add_or_update(Player::new(persistent_id.clone()));
            } else {
                consumer_store.notify_dirty();
            }
        }
        DomainEvent::KillerCharacterDetected { character } => {
            debug!(%character, "killer character detected");
        }
    });

    let tailer = LogTailer::new(&config, Arc::clone(&publisher)).map_err(|e| {
        error!(path = %config.log_path.display(), "cannot open game log: {}", e);
        e
    })?;

    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_signal = Arc::clone(&shutdown);
    ctrlc::set_handler(move || {
        info!("shutdown requested");
        shutdown_signal.store(true, Ordering::SeqCst);
    })?;

    let autosave = AutosaveScheduler::new(Arc::clone(&store), config.save_interval);
    let autosave_task = tokio::spawn(autosave.run(Arc::clone(&shutdown)));
    let tailer_task = tokio::spawn(tailer.run(Arc::clone(&shutdown)));

    let _ = tailer_task.await;
    let _ = autosave_task.await;

    info!("daemon stopped");
    Ok(())
}
