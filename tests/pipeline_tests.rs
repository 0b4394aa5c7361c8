//! End-to-end pipeline tests: raw log lines in, persisted store out

use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use tempfile::TempDir;

use lobby_companion::config::MonitorConfig;
use lobby_companion::domain::{MatchOutcome, Player};
use lobby_companion::events::{DomainEvent, EventPublisher};
use lobby_companion::monitor::LogTailer;
use lobby_companion::store::{JsonFileRepository, PlayerStore};

const SESSION: &str = "a1b2c3d4-0000-1111-2222-333344445555";
const STEAM: &str = "76561198000000000";

fn append(path: &Path, content: &str) {
    let mut file = fs::OpenOptions::new().append(true).open(path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.sync_all().unwrap();
}

fn drain(tailer: &mut LogTailer) {
    while tailer.poll_once().unwrap() {}
}

struct Fixture {
    _temp_dir: TempDir,
    log_path: std::path::PathBuf,
    store: Arc<PlayerStore>,
    tailer: LogTailer,
}

/// Wires the production pipeline: tailer -> publisher -> store consumer
fn setup() -> Fixture {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("game.log");
    let data_path = temp_dir.path().join("loop.json");
    fs::write(&log_path, "").unwrap();

    let config = MonitorConfig::with_paths(&log_path, &data_path);
    let repository = Arc::new(JsonFileRepository::new(&data_path));
    let store = Arc::new(PlayerStore::load(repository).unwrap());

    let publisher = Arc::new(EventPublisher::new());
    let consumer_store = Arc::clone(&store);
    publisher.subscribe(move |event| {
        if let DomainEvent::KillerIdentityResolved { persistent_id, .. } = event {
            if consumer_store.player_by_id(persistent_id).is_none() {
                consumer_store.add_or_update(Player::new(persistent_id.clone()));
            }
        }
    });

    let tailer = LogTailer::new(&config, publisher).unwrap();

    Fixture {
        _temp_dir: temp_dir,
        log_path,
        store,
        tailer,
    }
}

#[test]
fn test_killer_resolution_lands_in_persisted_store() {
    let mut fx = setup();

    append(
        &fx.log_path,
        &format!(
            "LogOnline: MatchMembersA=[\"{}\"]\n\
             LogNet: AddSessionPlayer Session:GameSession PlayerId:{}|{}\n",
            SESSION, SESSION, STEAM
        ),
    );
    drain(&mut fx.tailer);

    assert!(fx.store.is_dirty());
    assert!(fx.store.player_by_id(STEAM).is_some());

    fx.store.save();
    assert!(!fx.store.is_dirty());

    // a second process would see the player after reload
    let repo = Arc::new(JsonFileRepository::new(
        fx._temp_dir.path().join("loop.json"),
    ));
    let reloaded = PlayerStore::load(repo).unwrap();
    assert!(reloaded.player_by_id(STEAM).is_some());
    assert!(!reloaded.is_dirty());
}

#[test]
fn test_reversed_line_order_resolves_identically() {
    let mut fx = setup();

    append(
        &fx.log_path,
        &format!(
            "LogNet: AddSessionPlayer Session:GameSession PlayerId:{}|{}\n\
             LogOnline: MatchMembersA=[\"{}\"]\n",
            SESSION, STEAM, SESSION
        ),
    );
    drain(&mut fx.tailer);

    assert!(fx.store.player_by_id(STEAM).is_some());
}

#[test]
fn test_log_recreation_does_not_duplicate_players() {
    let mut fx = setup();

    append(
        &fx.log_path,
        &format!(
            "LogOnline: MatchMembersA=[\"{}\"]\n\
             LogNet: AddSessionPlayer Session:GameSession PlayerId:{}|{}\n",
            SESSION, SESSION, STEAM
        ),
    );
    drain(&mut fx.tailer);
    assert_eq!(fx.store.player_count(), 1);

    // game restart recreates the log; the same lines reappear but count as
    // historical content and must not be reprocessed
    fs::write(
        &fx.log_path,
        format!("LogOnline: MatchMembersA=[\"{}\"]\n", SESSION),
    )
    .unwrap();
    drain(&mut fx.tailer);

    append(&fx.log_path, "LogTemp: nothing interesting\n");
    drain(&mut fx.tailer);

    assert_eq!(fx.store.player_count(), 1);
}

#[test]
fn test_stats_survive_save_and_reload() {
    let fx = setup();

    let at = chrono::NaiveDate::from_ymd_opt(2024, 3, 15)
        .unwrap()
        .and_hms_opt(10, 30, 0)
        .unwrap();
    fx.store
        .record_match("Trapper", "MacMillan Estate", MatchOutcome::Died, 540, at);
    fx.store.save();

    let repo = Arc::new(JsonFileRepository::new(
        fx._temp_dir.path().join("loop.json"),
    ));
    let reloaded = PlayerStore::load(repo).unwrap();

    let stats = reloaded.stats();
    assert_eq!(stats.daily.per_character["Trapper"].deaths, 1);
    assert_eq!(stats.monthly.per_location["MacMillan Estate"].seconds_played, 540);
    assert_eq!(stats.daily.period_start, at.date().and_hms_opt(0, 0, 0).unwrap());
}
