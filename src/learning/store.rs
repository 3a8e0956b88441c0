//! Learned keyword store: keywords discovered at runtime that enrich
//! phrase detection on later extractions.
//!
//! Policy-driven write-backs are handed to a background writer thread so the
//! extraction path only pays for a snapshot clone. `flush` is the synchronous
//! variant for hosts that must know the data landed (e.g. at process exit).

use crate::learning::persistence::{KeyValueStore, MemoryStore};
use crate::processing::keywords::normalize;
use crate::processing::lexicon::is_blacklisted;
use log::{debug, info, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::mpsc::{self, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Key the learned keyword array is stored under.
pub const LEARNED_KEYWORDS_KEY: &str = "ats_learned_keywords";
pub const DEFAULT_MAX_ENTRIES: usize = 500;

const MIN_LEARNED_LEN: usize = 4;
const MAX_LEARNED_LEN: usize = 30;

/// When accumulated learning is written back to the persistence backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FlushPolicy {
    Never,
    EveryCall,
    EveryNthCall { n: u32 },
    Probabilistic { probability: f64 },
}

impl Default for FlushPolicy {
    fn default() -> Self {
        FlushPolicy::Probabilistic { probability: 0.1 }
    }
}

enum WriteRequest {
    Snapshot(Vec<Value>),
    Barrier(Sender<()>),
}

fn write_snapshot(backend: &dyn KeyValueStore, snapshot: Vec<Value>) -> bool {
    let count = snapshot.len();
    match backend.set(LEARNED_KEYWORDS_KEY, Value::Array(snapshot)) {
        Ok(()) => {
            debug!("Flushed {} learned keywords", count);
            true
        }
        Err(e) => {
            warn!("Failed to persist learned keywords: {}", e);
            false
        }
    }
}

/// Single writer thread draining snapshots in submission order.
struct BackgroundWriter {
    sender: Option<Sender<WriteRequest>>,
    handle: Option<JoinHandle<()>>,
}

impl BackgroundWriter {
    fn spawn(backend: Arc<dyn KeyValueStore>) -> std::io::Result<Self> {
        let (sender, receiver) = mpsc::channel::<WriteRequest>();

        let handle = thread::Builder::new()
            .name("learned-keyword-writer".to_string())
            .spawn(move || {
                for request in receiver {
                    match request {
                        WriteRequest::Snapshot(snapshot) => {
                            write_snapshot(backend.as_ref(), snapshot);
                        }
                        WriteRequest::Barrier(ack) => {
                            let _ = ack.send(());
                        }
                    }
                }
            })?;

        Ok(Self {
            sender: Some(sender),
            handle: Some(handle),
        })
    }

    /// Queue a snapshot; returns it back if the writer is gone.
    fn submit(&self, snapshot: Vec<Value>) -> Result<(), Vec<Value>> {
        match &self.sender {
            Some(sender) => sender.send(WriteRequest::Snapshot(snapshot)).map_err(|e| match e.0 {
                WriteRequest::Snapshot(snapshot) => snapshot,
                WriteRequest::Barrier(_) => Vec::new(),
            }),
            None => Err(snapshot),
        }
    }

    /// Block until every snapshot queued so far has been written.
    fn wait(&self) {
        let Some(sender) = &self.sender else {
            return;
        };
        let (ack, done) = mpsc::channel();
        if sender.send(WriteRequest::Barrier(ack)).is_ok() {
            let _ = done.recv();
        }
    }
}

impl Drop for BackgroundWriter {
    fn drop(&mut self) {
        // Closing the channel ends the writer loop once the queue is drained.
        self.sender.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("Learned keyword writer thread panicked");
            }
        }
    }
}

pub struct LearnedKeywordStore {
    entries: Vec<String>,
    index: HashSet<String>,
    backend: Arc<dyn KeyValueStore>,
    writer: Option<BackgroundWriter>,
    policy: FlushPolicy,
    max_entries: usize,
    calls_since_flush: u32,
    dirty: bool,
}

impl LearnedKeywordStore {
    /// Load the store from `backend`, starting empty when the stored value is
    /// absent or unreadable.
    pub fn load(backend: Box<dyn KeyValueStore>, policy: FlushPolicy, max_entries: usize) -> Self {
        let mut store = Self {
            entries: Vec::new(),
            index: HashSet::new(),
            backend: Arc::from(backend),
            writer: None,
            policy,
            max_entries,
            calls_since_flush: 0,
            dirty: false,
        };

        match store.backend.get(LEARNED_KEYWORDS_KEY) {
            Ok(Some(Value::Array(items))) => {
                for item in items {
                    match item {
                        Value::String(keyword) => {
                            store.insert(&keyword);
                        }
                        other => debug!("Skipping non-string learned keyword entry: {}", other),
                    }
                }
                info!("Loaded {} learned keywords", store.len());
            }
            Ok(Some(other)) => {
                warn!("Learned keyword store is malformed (expected array, got {}); starting empty", other);
            }
            Ok(None) => debug!("No learned keywords persisted yet"),
            Err(e) => warn!("Failed to load learned keywords: {}", e),
        }

        store.dirty = false;
        store
    }

    /// Empty store backed by process memory that never flushes on its own.
    pub fn in_memory() -> Self {
        Self::load(Box::new(MemoryStore::new()), FlushPolicy::Never, DEFAULT_MAX_ENTRIES)
    }

    /// Add a keyword if it passes the length and blacklist gate.
    pub fn insert(&mut self, keyword: &str) -> bool {
        let normalized = normalize(keyword);
        let len = normalized.chars().count();
        if !(MIN_LEARNED_LEN..=MAX_LEARNED_LEN).contains(&len) || is_blacklisted(&normalized) {
            return false;
        }
        if !self.index.insert(normalized.clone()) {
            return false;
        }
        self.entries.push(normalized);
        self.dirty = true;
        true
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.index.contains(&normalize(keyword))
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn policy(&self) -> &FlushPolicy {
        &self.policy
    }

    pub fn set_policy(&mut self, policy: FlushPolicy) {
        self.policy = policy;
        self.calls_since_flush = 0;
    }

    /// Count one extraction call and queue a write-back when the policy says
    /// so. Never waits for the write.
    pub fn record_extraction(&mut self) {
        self.calls_since_flush = self.calls_since_flush.saturating_add(1);

        let due = match &self.policy {
            FlushPolicy::Never => false,
            FlushPolicy::EveryCall => true,
            FlushPolicy::EveryNthCall { n } => self.calls_since_flush >= (*n).max(1),
            FlushPolicy::Probabilistic { probability } => {
                let p = if probability.is_finite() { probability.clamp(0.0, 1.0) } else { 0.0 };
                rand::thread_rng().gen_bool(p)
            }
        };

        if due {
            self.write_back();
        }
    }

    /// Capped copy of the entries in insertion order.
    fn snapshot(&self) -> Vec<Value> {
        self.entries
            .iter()
            .take(self.max_entries)
            .map(|k| Value::String(k.clone()))
            .collect()
    }

    fn write_back(&mut self) {
        self.calls_since_flush = 0;
        if !self.dirty {
            return;
        }

        if self.writer.is_none() {
            match BackgroundWriter::spawn(self.backend.clone()) {
                Ok(writer) => self.writer = Some(writer),
                Err(e) => warn!("Could not start learned keyword writer, writing inline: {}", e),
            }
        }

        let snapshot = self.snapshot();
        let queued = match &self.writer {
            Some(writer) => writer.submit(snapshot),
            None => Err(snapshot),
        };

        match queued {
            Ok(()) => self.dirty = false,
            Err(snapshot) => {
                if write_snapshot(self.backend.as_ref(), snapshot) {
                    self.dirty = false;
                }
            }
        }
    }

    /// Block until every queued write-back has reached the backend.
    pub fn wait_for_writes(&self) {
        if let Some(writer) = &self.writer {
            writer.wait();
        }
    }

    /// Write the store back synchronously, capped to `max_entries`, after any
    /// queued write-backs. Failures are logged and the in-memory state is kept.
    pub fn flush(&mut self) {
        self.calls_since_flush = 0;
        self.wait_for_writes();
        if !self.dirty {
            return;
        }

        if write_snapshot(self.backend.as_ref(), self.snapshot()) {
            self.dirty = false;
        }
    }

    /// Forget everything learned and persist the empty store.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
        self.dirty = true;
        self.flush();
    }
}
