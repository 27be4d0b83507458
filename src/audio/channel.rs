//! Music and effect channels

use enum_map::Enum;
use serde::{Deserialize, Serialize};

use crate::{constants::audio, quiz::Mode, session::Generation};

/// Background music tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Track {
    /// Calm ambient track for sound-accompanied study
    Ambient,
    /// Upbeat track for the scored quiz
    Upbeat,
}

impl Track {
    /// Track that belongs to `mode`, if the mode has music at all
    pub fn for_mode(mode: Mode) -> Option<Self> {
        match mode {
            Mode::Silent => None,
            Mode::Sound => Some(Self::Ambient),
            Mode::Quiz => Some(Self::Upbeat),
        }
    }

    /// Asset name of the track
    pub fn asset(self) -> &'static str {
        match self {
            Self::Ambient => audio::AMBIENT_TRACK,
            Self::Upbeat => audio::UPBEAT_TRACK,
        }
    }
}

/// Short sound effects, each on its own channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Enum, Serialize, Deserialize)]
pub enum Effect {
    /// A new question appears
    Question,
    /// The answer was correct
    Correct,
    /// The answer was wrong
    Incorrect,
    /// The result is about to be revealed
    Drumroll,
}

impl Effect {
    /// Effect that judges an answer
    pub fn for_answer(correct: bool) -> Self {
        if correct {
            Self::Correct
        } else {
            Self::Incorrect
        }
    }

    /// Asset name of the effect
    pub fn asset(self) -> &'static str {
        match self {
            Self::Question => audio::QUESTION_EFFECT,
            Self::Correct => audio::CORRECT_EFFECT,
            Self::Incorrect => audio::INCORRECT_EFFECT,
            Self::Drumroll => audio::DRUMROLL_EFFECT,
        }
    }
}

/// Identifies one playback request
///
/// Every completion the backend reports carries the ticket of the request it
/// belongs to, so the director can drop completions of superseded requests
/// and of previous runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ticket {
    /// Run the request was made in
    pub generation: Generation,
    /// Position of the request within the director's lifetime
    pub sequence: u64,
}

/// State of the shared background music channel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MusicChannel {
    /// Loaded track, `None` when the mode has no music
    pub track: Option<Track>,
    /// Whether playback was requested and not paused or rejected since
    pub playing: bool,
    /// Whether the channel is muted, e.g. after an autoplay rejection
    pub muted: bool,
}

impl MusicChannel {
    /// Whether music can currently be heard
    pub fn audible(&self) -> bool {
        self.track.is_some() && self.playing && !self.muted
    }
}

/// State of one effect channel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EffectChannel {
    /// Whether the effect was started and has not ended yet
    pub playing: bool,
    /// Ticket of the latest start of this effect
    pub ticket: Option<Ticket>,
}
