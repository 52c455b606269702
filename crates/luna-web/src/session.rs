//! Per-browser sessions.
//!
//! Each browser gets a UUID in the `luna_session` cookie and its own reading
//! history. Nothing is persisted; restarting the server forgets everything.

use axum::http::{header, HeaderMap};
use luna_domain::{History, ResultRecord, Session};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::debug;
use uuid::Uuid;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "luna_session";

/// Idle time after which a session is forgotten
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(3600);

/// Most sessions kept at once
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

#[derive(Debug)]
struct Entry {
    session: Session,
    last_seen: Instant,
}

/// In-memory session store
///
/// Sessions are only created by [`SessionStore::record`]. Lookups never
/// insert, so requests that do not produce a reading leave the store
/// untouched. Sessions idle longer than the TTL are dropped, and when the
/// store is full the least recently seen session makes room.
#[derive(Debug)]
pub struct SessionStore {
    sessions: Mutex<HashMap<Uuid, Entry>>,
    ttl: Duration,
    max_sessions: usize,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_limits(DEFAULT_SESSION_TTL, DEFAULT_MAX_SESSIONS)
    }
}

impl SessionStore {
    /// Create an empty store with the default limits
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store with an idle TTL and a size cap
    pub fn with_limits(ttl: Duration, max_sessions: usize) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            ttl,
            max_sessions: max_sessions.max(1),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, Entry>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_expired(&self, entry: &Entry, now: Instant) -> bool {
        now.duration_since(entry.last_seen) >= self.ttl
    }

    /// Return `id` if it names a live session and mark it as seen
    ///
    /// Unknown and expired ids yield `None`; nothing is created.
    pub fn lookup(&self, id: Option<Uuid>) -> Option<Uuid> {
        let id = id?;
        let now = Instant::now();
        let mut sessions = self.lock();

        let entry = sessions.get_mut(&id)?;
        if self.is_expired(entry, now) {
            sessions.remove(&id);
            debug!(session = %id, "Session expired");
            return None;
        }

        entry.last_seen = now;
        Some(id)
    }

    /// Snapshot of a session's history
    pub fn history(&self, id: Option<Uuid>) -> History {
        id.and_then(|id| {
            self.lock()
                .get(&id)
                .map(|entry| entry.session.history().clone())
        })
        .unwrap_or_default()
    }

    /// Append a successful reading, starting a session when `id` is not live
    ///
    /// Returns the id the reading was recorded under.
    pub fn record(
        &self,
        id: Option<Uuid>,
        question: impl Into<String>,
        result: ResultRecord,
    ) -> Uuid {
        let now = Instant::now();
        let mut sessions = self.lock();

        if let Some(id) = id {
            if let Some(entry) = sessions.get_mut(&id) {
                if !self.is_expired(entry, now) {
                    entry.last_seen = now;
                    entry.session.record(question, result);
                    return id;
                }
            }
        }

        self.make_room(&mut sessions, now);

        let id = Uuid::now_v7();
        let mut session = Session::new(id.to_string());
        session.record(question, result);
        sessions.insert(
            id,
            Entry {
                session,
                last_seen: now,
            },
        );
        debug!(session = %id, live = sessions.len(), "Session started");
        id
    }

    /// Drop expired sessions, then the least recently seen ones until a new
    /// session fits under the cap
    fn make_room(&self, sessions: &mut HashMap<Uuid, Entry>, now: Instant) {
        sessions.retain(|_, entry| !self.is_expired(entry, now));

        while sessions.len() >= self.max_sessions {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, entry)| entry.last_seen)
                .map(|(id, _)| *id);
            match oldest {
                Some(id) => {
                    sessions.remove(&id);
                    debug!(session = %id, "Session evicted");
                }
                None => break,
            }
        }
    }

    /// Number of live sessions
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether no session has been started
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

/// Session id from the request's `Cookie` header, if present and well-formed
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}

/// `Set-Cookie` value for a session id
pub fn session_cookie(id: Uuid) -> String {
    format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, id)
}
