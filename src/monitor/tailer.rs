//! Rotation-aware log tailing
//!
//! The game appends to a single log file and recreates it on restart. The
//! tailer polls on a fixed cadence instead of using an OS file watcher
//! (portability over latency), detects recreation through a size regression,
//! and feeds every new line through classification and correlation on its
//! own task. Read failures are logged and retried indefinitely; the loop
//! only exits through the shutdown flag.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use crate::config::MonitorConfig;
use crate::events::EventPublisher;
use crate::monitor::classifier::LineClassifier;
use crate::monitor::correlator::SessionCorrelator;

/// Tails the game log and publishes the domain events extracted from it
pub struct LogTailer {
    log_path: PathBuf,
    poll_interval: Duration,
    classifier: LineClassifier,
    correlator: SessionCorrelator,
    publisher: Arc<EventPublisher>,
    reader: Option<BufReader<File>>,
    last_size: u64,
}

impl LogTailer {
    /// Open the log file and discard its pre-existing content; historical
    /// lines cannot belong to an active lobby.
    pub fn new(config: &MonitorConfig, publisher: Arc<EventPublisher>) -> io::Result<Self> {
        let mut tailer = Self {
            log_path: config.log_path.clone(),
            poll_interval: config.poll_interval,
            classifier: LineClassifier::new(),
            correlator: SessionCorrelator::new(),
            publisher,
            reader: None,
            last_size: 0,
        };
        tailer.reopen()?;
        tailer.last_size = fs::metadata(&tailer.log_path)?.len();
        Ok(tailer)
    }

    /// Re-open the log and consume everything already in it
    fn reopen(&mut self) -> io::Result<()> {
        self.reader = None;
        let mut reader = BufReader::new(File::open(&self.log_path)?);

        let mut line = String::new();
        while reader.read_line(&mut line)? > 0 {
            line.clear();
        }

        self.reader = Some(reader);
        Ok(())
    }

    /// One tailing iteration: handle rotation, then read at most one line.
    ///
    /// Returns true if a line was consumed, false if the tailer is caught up
    /// and should sleep before the next check.
    pub fn poll_once(&mut self) -> io::Result<bool> {
        let current_size = match fs::metadata(&self.log_path) {
            Ok(meta) => meta.len(),
            Err(e) => {
                // the file vanished; the old handle is stale, force a reopen
                // once the game recreates it
                self.reader = None;
                self.last_size = 0;
                return Err(e);
            }
        };

        if current_size < self.last_size || self.reader.is_none() {
            // the log file has been recreated (the game restarted)
            info!(
                path = %self.log_path.display(),
                "log file shrank from {} to {} bytes, reopening",
                self.last_size,
                current_size
            );
            self.reopen()?;
        }
        self.last_size = current_size;

        let Some(reader) = self.reader.as_mut() else {
            return Ok(false);
        };

        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            return Ok(false);
        }

        self.process_line(line.trim_end_matches(|c| c == '\r' || c == '\n'));
        Ok(true)
    }

    fn process_line(&mut self, line: &str) {
        if let Some(token) = self.classifier.classify(line) {
            if let Some(event) = self.correlator.process(token) {
                self.publisher.publish(&event);
            }
        }
    }

    /// Tail until `shutdown` is set. Suspends for the poll interval whenever
    /// the file has no new line; I/O failures are non-fatal.
    pub async fn run(mut self, shutdown: Arc<AtomicBool>) {
        info!(path = %self.log_path.display(), "log tailer started");

        while !shutdown.load(Ordering::SeqCst) {
            match self.poll_once() {
                Ok(true) => {}
                Ok(false) => tokio::time::sleep(self.poll_interval).await,
                Err(e) => {
                    error!("error while processing log file: {}", e);
                    tokio::time::sleep(self.poll_interval).await;
                }
            }
        }

        info!("log tailer stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::DomainEvent;
    use parking_lot::Mutex;
    use std::io::Write;
    use tempfile::TempDir;

    fn append(path: &PathBuf, content: &str) {
        let mut file = fs::OpenOptions::new().append(true).open(path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.sync_all().unwrap();
    }

    fn collecting_publisher() -> (Arc<EventPublisher>, Arc<Mutex<Vec<DomainEvent>>>) {
        let publisher = Arc::new(EventPublisher::new());
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        publisher.subscribe(move |event| sink.lock().push(event.clone()));
        (publisher, events)
    }

    fn drain(tailer: &mut LogTailer) {
        while tailer.poll_once().unwrap() {}
    }

    #[test]
    fn test_pre_existing_content_is_discarded() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("game.log");
        fs::write(&log_path, "LogCustomization: --> TR_Head01\n").unwrap();

        let config = MonitorConfig::with_paths(&log_path, temp_dir.path().join("loop.json"));
        let (publisher, events) = collecting_publisher();
        let mut tailer = LogTailer::new(&config, publisher).unwrap();

        drain(&mut tailer);
        assert!(events.lock().is_empty());
    }

    #[test]
    fn test_appended_lines_produce_events() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("game.log");
        fs::write(&log_path, "").unwrap();

        let config = MonitorConfig::with_paths(&log_path, temp_dir.path().join("loop.json"));
        let (publisher, events) = collecting_publisher();
        let mut tailer = LogTailer::new(&config, publisher).unwrap();

        append(&log_path, "LogCustomization: --> MM_Body02\nnoise line\n");
        drain(&mut tailer);

        assert_eq!(
            *events.lock(),
            vec![DomainEvent::KillerCharacterDetected {
                character: "Shape".to_string()
            }]
        );
    }

    #[test]
    fn test_truncation_discards_and_resumes_without_duplicates() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("game.log");
        fs::write(&log_path, "").unwrap();

        let config = MonitorConfig::with_paths(&log_path, temp_dir.path().join("loop.json"));
        let (publisher, events) = collecting_publisher();
        let mut tailer = LogTailer::new(&config, publisher).unwrap();

        append(
            &log_path,
            "LogCustomization: --> TR_Head01\nLogCustomization: --> TR_Head01\n",
        );
        drain(&mut tailer);
        assert_eq!(events.lock().len(), 2);

        // game restart: the file is recreated smaller than before
        fs::write(&log_path, "LogCustomization: --> SD_Body01\n").unwrap();
        drain(&mut tailer);
        // content present at reopen time counts as historical
        assert_eq!(events.lock().len(), 2);

        append(&log_path, "LogCustomization: --> HK_Body01\n");
        drain(&mut tailer);

        assert_eq!(
            events.lock().last(),
            Some(&DomainEvent::KillerCharacterDetected {
                character: "Spirit".to_string()
            })
        );
        assert_eq!(events.lock().len(), 3);
    }

    #[test]
    fn test_full_correlation_through_the_tailer() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("game.log");
        fs::write(&log_path, "").unwrap();

        let config = MonitorConfig::with_paths(&log_path, temp_dir.path().join("loop.json"));
        let (publisher, events) = collecting_publisher();
        let mut tailer = LogTailer::new(&config, publisher).unwrap();

        append(
            &log_path,
            concat!(
                "LogNet: AddSessionPlayer Session:GameSession PlayerId:aaaa-bbbb|76561198000000000\n",
                "LogOnline: MatchMembersA=[\"aaaa-bbbb\"]\n",
            ),
        );
        drain(&mut tailer);

        assert_eq!(
            *events.lock(),
            vec![DomainEvent::KillerIdentityResolved {
                persistent_id: "76561198000000000".to_string(),
                session_id: "aaaa-bbbb".to_string(),
            }]
        );
    }

    #[test]
    fn test_missing_file_surfaces_as_retryable_error() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("game.log");
        fs::write(&log_path, "").unwrap();

        let config = MonitorConfig::with_paths(&log_path, temp_dir.path().join("loop.json"));
        let (publisher, events) = collecting_publisher();
        let mut tailer = LogTailer::new(&config, publisher).unwrap();

        fs::remove_file(&log_path).unwrap();
        assert!(tailer.poll_once().is_err());

        // the file coming back is reopened on the next poll; only lines
        // appended after that are processed
        fs::write(&log_path, "").unwrap();
        assert!(!tailer.poll_once().unwrap());
        append(&log_path, "LogCustomization: --> BE_Head01\n");
        drain(&mut tailer);

        assert_eq!(
            events.lock().last(),
            Some(&DomainEvent::KillerCharacterDetected {
                character: "Huntress".to_string()
            })
        );
    }
}
