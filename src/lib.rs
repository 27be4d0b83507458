//! # Chime Quiz Library
//!
//! This library provides the logic of a multiple-choice study quiz with
//! background music and sound effects. It loads and validates the question
//! document, runs the quiz state machine, switches screens and sequences
//! audio around them, while the host supplies rendering, media playback,
//! timers and preference storage.

#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::similar_names)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::ignored_unit_patterns)]
#![allow(clippy::struct_field_names)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::wildcard_imports)]
use serde::{Deserialize, Serialize};

pub mod constants;

pub mod app;
pub mod audio;
pub mod config;
pub mod quiz;
pub mod screen;
pub mod session;
pub mod store;

pub use app::{Action, App};

/// Full state snapshots for a front end redrawing from scratch
#[derive(Debug, Serialize, Clone, PartialEq, derive_more::From)]
pub enum SyncMessage {
    /// What the current quiz phase shows
    Quiz(quiz::SyncMessage),
    /// Volume and music state for the settings overlay
    Audio(audio::SyncMessage),
}

impl SyncMessage {
    /// Converts the sync message to a JSON string for transmission
    ///
    /// # Panics
    ///
    /// This method panics if serialization fails, which should never happen
    /// with the default JSON serializer for well-formed data.
    pub fn to_message(&self) -> String {
        serde_json::to_string(self).expect("default serializer cannot fail")
    }
}

/// Incremental render messages
#[derive(Debug, Serialize, Clone, PartialEq, derive_more::From)]
pub enum UpdateMessage {
    /// Screen and overlay visibility
    Screen(screen::UpdateMessage),
    /// Outcome of the question load
    Store(store::UpdateMessage),
    /// Questions, feedback and results
    Quiz(quiz::UpdateMessage),
    /// Volume and playback notices
    Audio(audio::UpdateMessage),
}

impl UpdateMessage {
    /// Converts the update message to a JSON string for transmission
    ///
    /// # Panics
    ///
    /// This method panics if serialization fails, which should never happen
    /// with the default JSON serializer for well-formed data.
    pub fn to_message(&self) -> String {
        serde_json::to_string(self).expect("default serializer cannot fail")
    }
}

/// Alarm messages for timed events
///
/// The host keeps them opaque, waits the requested duration and hands them
/// back to [`App::receive_alarm`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::From, Serialize, Deserialize)]
pub enum AlarmMessage {
    /// Quiz alarms
    Quiz(quiz::AlarmMessage),
    /// Fades and effect fallbacks
    Audio(audio::AlarmMessage),
}
