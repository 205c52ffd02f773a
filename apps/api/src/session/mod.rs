//! Per-session result holders.
//!
//! Each browser session owns one slot for its latest `GenerationResult`.
//! Slots live in memory and are lost on restart. Idle sessions are swept
//! whenever a new one is opened, and the map never holds more than
//! `max_sessions` entries.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::GenerationResult;

pub const DEFAULT_IDLE_TTL: Duration = Duration::from_secs(60 * 60);
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

/// Where a session is in the generate cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationState {
    Idle,
    Generating,
    Succeeded,
    Failed,
}

/// State owned by a single user session.
#[derive(Debug, Clone, Serialize)]
pub struct ResumeSession {
    pub id: Uuid,
    pub state: GenerationState,
    pub result: Option<GenerationResult>,
    pub last_error: Option<String>,
    #[serde(skip)]
    last_active: Instant,
}

impl ResumeSession {
    fn new(id: Uuid) -> Self {
        Self {
            id,
            state: GenerationState::Idle,
            result: None,
            last_error: None,
            last_active: Instant::now(),
        }
    }

    /// Sessions mid-generation are never evicted; their task still reports back.
    fn evictable(&self) -> bool {
        self.state != GenerationState::Generating
    }
}

/// Shared map of sessions. Cloning shares the same map.
///
/// The lock is only held for map access, never across an `.await`.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Mutex<HashMap<Uuid, ResumeSession>>>,
    idle_ttl: Duration,
    max_sessions: usize,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_limits(DEFAULT_IDLE_TTL, DEFAULT_MAX_SESSIONS)
    }
}

impl SessionStore {
    pub fn with_limits(idle_ttl: Duration, max_sessions: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
            idle_ttl,
            max_sessions: max_sessions.max(1),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, ResumeSession>> {
        // A panic while holding the lock leaves plain data behind; keep serving.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Runs `f` on a live session and marks it active.
    fn with_session<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut ResumeSession) -> Result<T, AppError>,
    ) -> Result<T, AppError> {
        let mut sessions = self.lock();
        let session = sessions.get_mut(&id).ok_or(AppError::SessionNotFound(id))?;
        session.last_active = Instant::now();
        f(session)
    }

    /// Opens a fresh, idle session and returns its id.
    ///
    /// Drops sessions idle for longer than the TTL first; if the store is
    /// still full, the least recently active session goes.
    pub fn create(&self) -> Uuid {
        let mut sessions = self.lock();

        let ttl = self.idle_ttl;
        let before = sessions.len();
        sessions.retain(|_, s| !s.evictable() || s.last_active.elapsed() < ttl);

        while sessions.len() >= self.max_sessions {
            let oldest = sessions
                .values()
                .filter(|s| s.evictable())
                .min_by_key(|s| s.last_active)
                .map(|s| s.id);
            match oldest {
                Some(id) => {
                    sessions.remove(&id);
                }
                None => break,
            }
        }

        let evicted = before - sessions.len();
        if evicted > 0 {
            debug!("Evicted {evicted} idle sessions");
        }

        let id = Uuid::new_v4();
        sessions.insert(id, ResumeSession::new(id));
        id
    }

    /// Ends a session and drops its result.
    pub fn remove(&self, id: Uuid) -> Result<(), AppError> {
        self.lock()
            .remove(&id)
            .map(|_| ())
            .ok_or(AppError::SessionNotFound(id))
    }

    /// Snapshot of a session.
    pub fn get(&self, id: Uuid) -> Result<ResumeSession, AppError> {
        self.with_session(id, |s| Ok(s.clone()))
    }

    /// The stored result, if any.
    pub fn result(&self, id: Uuid) -> Result<Option<GenerationResult>, AppError> {
        self.with_session(id, |s| Ok(s.result.clone()))
    }

    /// Moves the session into `Generating`.
    ///
    /// Rejects overlapping requests: a session already generating stays as is.
    pub fn begin_generation(&self, id: Uuid) -> Result<(), AppError> {
        self.with_session(id, |session| {
            if session.state == GenerationState::Generating {
                return Err(AppError::GenerationInProgress);
            }
            session.state = GenerationState::Generating;
            Ok(())
        })
    }

    /// Stores a new result, replacing any previous one.
    pub fn succeed(&self, id: Uuid, result: GenerationResult) -> Result<(), AppError> {
        self.with_session(id, |session| {
            session.state = GenerationState::Succeeded;
            session.result = Some(result);
            session.last_error = None;
            Ok(())
        })
    }

    /// Records a failure. The previous result, if any, is left in place.
    pub fn fail(&self, id: Uuid, error: &AppError) -> Result<(), AppError> {
        self.with_session(id, |session| {
            session.state = GenerationState::Failed;
            session.last_error = Some(error.to_string());
            Ok(())
        })
    }
}

#[cfg(test)]
impl SessionStore {
    fn len(&self) -> usize {
        self.lock().len()
    }
}
