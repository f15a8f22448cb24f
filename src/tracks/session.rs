//! Interactive track session
//!
//! `Idle` -> `Displaying` on `Init`, `Displaying` -> `Displaying` on
//! `Resample`, and `Exit` ends the session for good. The renderer only turns
//! key presses into [`SessionEvent`]s and draws whatever state is current.

use crate::error::Result;
use crate::orbital::{Propagator, TimeWindow};
use crate::tle::Catalog;
use crate::tracks::sampler::{SelectionState, resample, select_tracks};
use rand::Rng;

#[derive(Clone, Debug, PartialEq)]
pub enum SessionState {
    Idle,
    Displaying(Vec<SelectionState>),
    Terminated,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    Init,
    Resample,
    Exit,
    Other(String),
}

impl SessionEvent {
    /// Map a key name from the rendering surface to an event
    pub fn from_key_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "r" => SessionEvent::Resample,
            "escape" | "q" => SessionEvent::Exit,
            _ => SessionEvent::Other(name.to_string()),
        }
    }
}

/// Owns the selection shown on screen for the lifetime of an interactive run
#[derive(Debug)]
pub struct TrackSession {
    state: SessionState,
    count: usize,
}

impl TrackSession {
    pub fn new(count: usize) -> Self {
        Self {
            state: SessionState::Idle,
            count,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_terminated(&self) -> bool {
        matches!(self.state, SessionState::Terminated)
    }

    /// Current selections; empty unless displaying
    pub fn selections(&self) -> &[SelectionState] {
        match &self.state {
            SessionState::Displaying(selections) => selections,
            _ => &[],
        }
    }

    /// Apply one event. Returns whether the state changed.
    ///
    /// On error the previous state is kept untouched.
    pub fn handle<P: Propagator + ?Sized, R: Rng>(
        &mut self,
        event: SessionEvent,
        catalog: &Catalog,
        propagator: &P,
        window: &TimeWindow,
        rng: &mut R,
    ) -> Result<bool> {
        let next = match (&self.state, event) {
            (SessionState::Terminated, _) => return Ok(false),
            (_, SessionEvent::Exit) => SessionState::Terminated,
            (SessionState::Idle, SessionEvent::Init) => SessionState::Displaying(select_tracks(
                catalog, propagator, self.count, window, rng,
            )?),
            (SessionState::Displaying(current), SessionEvent::Resample) => {
                let fresh = match current.as_slice() {
                    [only] => vec![resample(catalog, propagator, only, window, rng)?],
                    _ => select_tracks(catalog, propagator, self.count, window, rng)?,
                };
                SessionState::Displaying(fresh)
            }
            (_, other) => {
                tracing::trace!("ignoring {:?} in {:?}", other, self.state_name());
                return Ok(false);
            }
        };
        tracing::debug!("session {} -> {}", self.state_name(), state_name(&next));
        self.state = next;
        Ok(true)
    }

    fn state_name(&self) -> &'static str {
        state_name(&self.state)
    }
}

fn state_name(state: &SessionState) -> &'static str {
    match state {
        SessionState::Idle => "Idle",
        SessionState::Displaying(_) => "Displaying",
        SessionState::Terminated => "Terminated",
    }
}
