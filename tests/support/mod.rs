//! Shared helpers for the integration tests.

#![allow(dead_code)]

use gs_download::{
    DownloadManager, Downloader, ManifestFetcher, ProgressSink, ProgressUnit, build_client,
};
use std::io;
use std::sync::{Arc, Mutex};
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::fmt::MakeWriter;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    Create(String, u64, ProgressUnit),
    Increment(String, u64),
    Set(String, u64),
    Remove(String),
    Stop,
}

/// Progress sink that records every call.
#[derive(Default)]
pub struct RecordingProgress {
    events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingProgress {
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, event: ProgressEvent) {
        self.events.lock().unwrap().push(event);
    }

    pub fn created(&self, key: &str) -> bool {
        self.events()
            .iter()
            .any(|e| matches!(e, ProgressEvent::Create(k, _, _) if k == key))
    }

    pub fn increments(&self, key: &str) -> Vec<u64> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ProgressEvent::Increment(k, delta) if k == key => Some(delta),
                _ => None,
            })
            .collect()
    }

    pub fn removed(&self, key: &str) -> bool {
        self.events()
            .iter()
            .any(|e| matches!(e, ProgressEvent::Remove(k) if k == key))
    }
}

impl ProgressSink for RecordingProgress {
    fn create(&self, key: &str, total: u64, unit: ProgressUnit) {
        self.push(ProgressEvent::Create(key.to_string(), total, unit));
    }

    fn increment(&self, key: &str, delta: u64) {
        self.push(ProgressEvent::Increment(key.to_string(), delta));
    }

    fn set(&self, key: &str, value: u64) {
        self.push(ProgressEvent::Set(key.to_string(), value));
    }

    fn remove(&self, key: &str) {
        self.push(ProgressEvent::Remove(key.to_string()));
    }

    fn stop(&self) {
        self.push(ProgressEvent::Stop);
    }
}

/// Collects formatted log lines for the current thread.
#[derive(Clone, Default)]
pub struct LogCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    pub fn install(&self) -> DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::INFO)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

pub fn downloader(progress: Arc<RecordingProgress>) -> Downloader {
    Downloader::new(build_client().unwrap(), progress)
}

pub fn manager(progress: Arc<RecordingProgress>) -> DownloadManager {
    let client = build_client().unwrap();
    DownloadManager::new(
        ManifestFetcher::new(client.clone()),
        Downloader::new(client, progress.clone()),
        progress,
    )
}

/// A URL on a local port with nothing listening.
pub fn unreachable_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
