//! Event logging system for displaying recent session events.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    /// A pipe was passed and the score went up.
    Passed,
    /// A bird hit a pipe.
    Collision,
    /// A bird hit the ground or flew off the top.
    OutOfBounds,
    /// The score exceeded the cap and the session ended.
    ScoreCap,
}

/// A logged event for display in the HUD.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggedEvent {
    /// Tick on which the event occurred
    pub tick: u64,
    /// Human-readable description of the event
    pub description: String,
    /// Category, used by the renderer to pick a colour
    pub kind: EventKind,
}

/// Event log that tracks recent session events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLog {
    /// Recent events, newest first
    events: VecDeque<LoggedEvent>,
    /// Maximum number of events to keep
    max_events: usize,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new(8)
    }
}

impl EventLog {
    /// Creates a new event log with specified capacity
    pub fn new(max_events: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(max_events),
            max_events,
        }
    }

    /// Adds a new event to the log and mirrors it to the tracing output.
    pub fn log(&mut self, tick: u64, description: String, kind: EventKind) {
        tracing::debug!(tick, ?kind, "{description}");

        self.events.push_front(LoggedEvent {
            tick,
            description,
            kind,
        });

        while self.events.len() > self.max_events {
            self.events.pop_back();
        }
    }

    /// Returns all events, newest first
    pub fn events(&self) -> &VecDeque<LoggedEvent> {
        &self.events
    }

    /// Clears all events
    pub fn clear(&mut self) {
        self.events.clear();
    }
}
