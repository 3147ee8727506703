use crate::{models::HistoryEntry, services::Analytics};
use anyhow::{Context, Result};
use chrono::Utc;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Append-only gas cost history kept as a single JSON array file.
///
/// Every append reads the whole file, pushes the entry and rewrites the file.
/// Writers inside this process are serialized and each rewrite lands through
/// a rename, so a crash mid-write leaves the previous file intact. Nothing
/// here returns an error to callers: unreadable files read as empty and a
/// corrupt file is set aside and replaced.
pub struct HistoryStore {
    path: PathBuf,
    write_lock: Mutex<()>,
    analytics: Arc<Analytics>,
}

enum Loaded {
    Entries(Vec<HistoryEntry>),
    Corrupt(Vec<u8>, serde_json::Error),
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>, analytics: Arc<Analytics>) -> Self {
        let path = path.into();
        tracing::info!("Gas history stored at {}", path.display());
        Self {
            path,
            write_lock: Mutex::new(()),
            analytics,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns whether the entry reached disk.
    pub async fn append(&self, entry: HistoryEntry) -> bool {
        let _guard = self.write_lock.lock().await;

        let mut history = match self.load().await {
            Ok(Loaded::Entries(entries)) => entries,
            Ok(Loaded::Corrupt(raw, e)) => {
                self.analytics.record_corruption();
                let backup = self.set_aside(&raw).await;
                tracing::warn!(
                    error = %e,
                    backup = ?backup,
                    "Gas history at {} is corrupt, starting a new one",
                    self.path.display()
                );
                Vec::new()
            }
            Err(e) => {
                tracing::warn!("Could not read gas history, starting a new one: {:#}", e);
                Vec::new()
            }
        };

        let chain = entry.chain.clone();
        history.push(entry);

        let persisted = match self.write(&history).await {
            Ok(()) => {
                tracing::debug!("Recorded {} gas cost ({} entries)", chain, history.len());
                true
            }
            Err(e) => {
                tracing::error!("Failed to persist gas history for {}: {:#}", chain, e);
                false
            }
        };

        self.analytics.record_append(persisted);
        persisted
    }

    pub async fn read_all(&self) -> Vec<HistoryEntry> {
        match self.load().await {
            Ok(Loaded::Entries(entries)) => entries,
            Ok(Loaded::Corrupt(_, e)) => {
                tracing::error!("Failed to parse gas history: {}", e);
                Vec::new()
            }
            Err(e) => {
                tracing::error!("Failed to read gas history: {:#}", e);
                Vec::new()
            }
        }
    }

    async fn load(&self) -> Result<Loaded> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Loaded::Entries(Vec::new())),
            Err(e) => {
                return Err(e).with_context(|| format!("reading {}", self.path.display()));
            }
        };

        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(Loaded::Entries(Vec::new()));
        }

        Ok(match serde_json::from_slice(&raw) {
            Ok(entries) => Loaded::Entries(entries),
            Err(e) => Loaded::Corrupt(raw, e),
        })
    }

    async fn write(&self, history: &[HistoryEntry]) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir)
                .await
                .with_context(|| format!("creating {}", dir.display()))?;
        }

        let body = serde_json::to_vec_pretty(history)?;
        let tmp = self.sibling("tmp");
        tokio::fs::write(&tmp, body)
            .await
            .with_context(|| format!("writing {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("replacing {}", self.path.display()))?;
        Ok(())
    }

    async fn set_aside(&self, raw: &[u8]) -> Option<PathBuf> {
        let backup = self.sibling(&format!("corrupt-{}", Utc::now().timestamp_millis()));
        match tokio::fs::write(&backup, raw).await {
            Ok(()) => Some(backup),
            Err(e) => {
                tracing::warn!("Could not keep a copy of the corrupt history: {}", e);
                None
            }
        }
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".");
        name.push(suffix);
        self.path.with_file_name(name)
    }
}
