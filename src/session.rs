//! Rendering sink and session tokens
//!
//! This module defines the trait the controller uses to push render messages
//! to whatever front end hosts the quiz, and the generation marker used to
//! tell callbacks of the current run apart from stale ones.

use serde::{Deserialize, Serialize};

use super::{SyncMessage, UpdateMessage};

/// Trait for sending render messages to the front end
///
/// Implementations might write into a DOM, a terminal or a recording buffer
/// in tests. Sending never fails from the engine's point of view.
pub trait View {
    /// Sends an incremental update message
    ///
    /// # Arguments
    ///
    /// * `message` - The update message to send
    fn send_message(&self, message: &UpdateMessage);

    /// Sends a full state snapshot
    ///
    /// Snapshots are used when the front end has to redraw from scratch,
    /// typically right after it is mounted.
    ///
    /// # Arguments
    ///
    /// * `state` - The synchronization message to send
    fn send_state(&self, state: &SyncMessage);
}

/// Session token identifying one quiz run
///
/// A new generation starts on every mode selection and on every restart.
/// Alarms and audio callbacks capture the generation they were issued under
/// and are dropped when it is no longer current.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[display("gen#{_0}")]
pub struct Generation(u64);

impl Generation {
    /// Returns the generation that follows this one
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_generation_next_is_distinct() {
        let first = Generation::default();
        let second = first.next();

        assert_ne!(first, second);
        assert!(second > first);
        assert_eq!(second.next(), first.next().next());
    }

    #[test]
    fn test_generation_display() {
        assert_eq!(Generation::default().next().to_string(), "gen#1");
    }
}
