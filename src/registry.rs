//! Handle-based access to detection sessions.
//!
//! Hosts that cannot hold a [`DetectionSession`] directly (FFI, a UI event loop
//! keyed by screen) create sessions here and refer to them by [`SessionHandle`].
//! Sessions are stored by value and never share state with each other.

use crate::baseline::PriorBaseline;
use crate::config::SessionConfig;
use crate::features::FeatureExtractor;
use crate::session::{Detection, DetectionSession, ResetOptions};
use crate::{Error, Result};
use log::debug;
use std::collections::HashMap;
use std::fmt;

/// Opaque identifier of a registered session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionHandle(u64);

impl SessionHandle {
    /// Raw numeric value
    #[must_use]
    pub fn id(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

/// Owner of all live sessions of one modality
pub struct SessionRegistry<E: FeatureExtractor> {
    sessions: HashMap<SessionHandle, DetectionSession<E>>,
    next_id: u64,
}

impl<E: FeatureExtractor> Default for SessionRegistry<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: FeatureExtractor> SessionRegistry<E> {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            sessions: HashMap::new(),
            next_id: 1,
        }
    }

    /// Validate `config` and register a new session
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfiguration` and registers nothing if the config is unusable
    pub fn create_session(&mut self, config: SessionConfig, extractor: E) -> Result<SessionHandle> {
        let session = DetectionSession::new(config, extractor)?;
        let handle = SessionHandle(self.next_id);
        self.next_id += 1;
        self.sessions.insert(handle, session);
        debug!("Registered {handle}");
        Ok(handle)
    }

    /// Feed one observation to a session
    pub fn detect_frame(
        &mut self,
        handle: SessionHandle,
        observation: &E::Observation,
        timestamp_ms: f64,
    ) -> Result<Detection> {
        Ok(self.session_mut(handle)?.detect_frame(observation, timestamp_ms))
    }

    /// Replace a session's baseline with a prior one
    pub fn load_baseline(&mut self, handle: SessionHandle, prior: &PriorBaseline) -> Result<()> {
        self.session_mut(handle)?.load_baseline(prior)
    }

    /// Reset a session
    pub fn reset(&mut self, handle: SessionHandle, options: ResetOptions) -> Result<()> {
        self.session_mut(handle)?.reset(options);
        Ok(())
    }

    /// Tear a session down. Returns `false` if it was already gone.
    pub fn dispose(&mut self, handle: SessionHandle) -> bool {
        let removed = self.sessions.remove(&handle).is_some();
        if removed {
            debug!("Disposed {handle}");
        }
        removed
    }

    /// Borrow a session
    pub fn session(&self, handle: SessionHandle) -> Result<&DetectionSession<E>> {
        self.sessions.get(&handle).ok_or(Error::UnknownSession(handle.0))
    }

    /// Mutably borrow a session
    pub fn session_mut(&mut self, handle: SessionHandle) -> Result<&mut DetectionSession<E>> {
        self.sessions.get_mut(&handle).ok_or(Error::UnknownSession(handle.0))
    }

    /// Number of live sessions
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether no session is live
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
