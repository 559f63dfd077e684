//! Session data and storage backends.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Key under which flash messages are kept.
pub const FLASH_KEY: &str = "_flash";

/// Per-client key-value state.
///
/// Tracks whether it was freshly created and whether anything changed, so
/// the middleware only persists (and only sets a cookie for) sessions that
/// were actually written to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    data: HashMap<String, Value>,
    new: bool,
    modified: bool,
}

impl Session {
    /// A fresh, empty session.
    pub fn new() -> Self {
        Self {
            new: true,
            ..Default::default()
        }
    }

    /// A session rebuilt from stored data.
    pub fn from_data(data: HashMap<String, Value>) -> Self {
        Self {
            data,
            new: false,
            modified: false,
        }
    }

    /// Raw value stored under `key`.
    pub fn get_value(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Value under `key` decoded as `T`; `None` if absent or of the wrong shape.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.data
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.data.insert(key.into(), value.into());
        self.modified = true;
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let removed = self.data.remove(key);
        if removed.is_some() {
            self.modified = true;
        }
        removed
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Queue a message to show on the next render.
    pub fn add_flash(&mut self, message: impl Into<String>, level: Option<&str>) {
        let mut flashes: Vec<Value> = self.get(FLASH_KEY).unwrap_or_default();
        flashes.push(Value::from(vec![
            Value::String(message.into()),
            level.map(Value::from).unwrap_or(Value::Null),
        ]));
        self.insert(FLASH_KEY, flashes);
    }

    /// Drain queued flash messages as `(message, level)` pairs.
    pub fn take_flashes(&mut self) -> Vec<(String, Option<String>)> {
        let Some(raw) = self.remove(FLASH_KEY) else {
            return Vec::new();
        };
        serde_json::from_value::<Vec<(String, Option<String>)>>(raw).unwrap_or_default()
    }

    pub fn is_new(&self) -> bool {
        self.new
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &HashMap<String, Value> {
        &self.data
    }
}

/// Storage backend for sessions, keyed by session id.
pub trait SessionStore: Send + Sync + 'static {
    /// Load a live session. Missing and expired sessions both yield `None`.
    fn load(&self, id: &str) -> Option<Session>;

    /// Persist the session's data under `id`, refreshing its expiry.
    fn save(&self, id: &str, session: &Session);

    fn delete(&self, id: &str);

    /// Drop expired sessions, returning how many were removed.
    fn purge_expired(&self) -> usize;
}

struct Record {
    data: HashMap<String, Value>,
    /// `None` when the lifetime does not fit in an `Instant`.
    expires_at: Option<Instant>,
}

impl Record {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

/// In-process session store.
///
/// Every record expires `ttl` after it was last loaded or saved, so sessions
/// abandoned by their client are eventually purged.
pub struct MemoryStore {
    records: DashMap<String, Record>,
    ttl: Duration,
}

impl MemoryStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            records: DashMap::new(),
            ttl,
        }
    }

    /// Number of stored sessions, expired ones included until purged.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn expiry_from(&self, now: Instant) -> Option<Instant> {
        now.checked_add(self.ttl)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(Duration::from_secs(86_400))
    }
}

impl SessionStore for MemoryStore {
    fn load(&self, id: &str) -> Option<Session> {
        let now = Instant::now();
        {
            let mut record = self.records.get_mut(id)?;
            if !record.is_expired(now) {
                record.expires_at = self.expiry_from(now);
                return Some(Session::from_data(record.data.clone()));
            }
        }

        self.records.remove(id);
        tracing::debug!(session_id = %id, "Dropped expired session");
        None
    }

    fn save(&self, id: &str, session: &Session) {
        let record = Record {
            data: session.data().clone(),
            expires_at: self.expiry_from(Instant::now()),
        };
        self.records.insert(id.to_string(), record);
    }

    fn delete(&self, id: &str) {
        self.records.remove(id);
    }

    fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.records.len();
        self.records.retain(|_, record| !record.is_expired(now));
        before.saturating_sub(self.records.len())
    }
}
