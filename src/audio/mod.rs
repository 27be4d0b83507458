//! Audio director
//!
//! This module sequences background music and sound effects against mode and
//! screen changes. It owns no media itself: every request goes out through
//! an [`AudioBackend`] and returns immediately, and the backend reports how
//! the request ended later as an [`AudioEvent`]. Nothing the controller does
//! for navigation ever waits on one of those reports.
//!
//! Effects are only heard in quiz mode. While one plays, the music is either
//! faded down or paused depending on [`DuckingPolicy`], and it is brought
//! back to the user level afterwards through an alarm even if the effect
//! never reports its end.

pub mod channel;
pub mod duck;
pub mod volume;

use enum_map::EnumMap;
use serde::{Deserialize, Serialize};

use crate::{
    config::{DuckingPolicy, Settings},
    quiz::Mode,
    session::Generation,
};

pub use channel::{Effect, EffectChannel, MusicChannel, Ticket, Track};
pub use duck::DuckState;
pub use volume::{MemoryStore, PreferenceStore, SavedVolume};

/// Media playback as provided by the host
///
/// All methods return immediately. Outcomes of `play_*` requests come back
/// through [`Director::receive_event`] carrying the ticket passed here.
pub trait AudioBackend {
    /// Swaps the music source, `None` clears it
    fn load_music(&mut self, track: Option<Track>);

    /// Requests music playback; a rejection is reported as
    /// [`AudioEvent::MusicRejected`]
    fn play_music(&mut self, ticket: Ticket);

    /// Pauses music playback
    fn pause_music(&mut self);

    /// Sets the music channel volume, in [0, 1]
    fn set_music_volume(&mut self, volume: f32);

    /// Mutes or unmutes the music channel
    fn set_music_muted(&mut self, muted: bool);

    /// Plays `effect` from its beginning; the end is reported as
    /// [`AudioEvent::EffectEnded`] or [`AudioEvent::EffectRejected`]
    fn play_effect(&mut self, effect: Effect, ticket: Ticket);

    /// Stops every effect channel
    fn stop_effects(&mut self);
}

/// Completions reported by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AudioEvent {
    /// The platform refused to start the music
    MusicRejected {
        /// Ticket of the rejected request
        ticket: Ticket,
    },
    /// An effect played to its end
    EffectEnded {
        /// Effect that ended
        effect: Effect,
        /// Ticket of the request
        ticket: Ticket,
    },
    /// The platform refused to start an effect
    EffectRejected {
        /// Effect that was refused
        effect: Effect,
        /// Ticket of the request
        ticket: Ticket,
    },
}

impl AudioEvent {
    /// Ticket the event belongs to
    pub fn ticket(&self) -> Ticket {
        match self {
            Self::MusicRejected { ticket }
            | Self::EffectEnded { ticket, .. }
            | Self::EffectRejected { ticket, .. } => *ticket,
        }
    }
}

/// Alarm messages driving fades and effect fallbacks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlarmMessage {
    /// Apply the next volume step of the fade owned by `ticket`
    FadeStep {
        /// Operation the step belongs to
        ticket: Ticket,
    },
    /// Treat the effect owned by `ticket` as finished if it still plays
    EffectTimeout {
        /// Operation the timeout belongs to
        ticket: Ticket,
    },
}

/// Update messages about audio the user should know of
#[derive(Debug, Serialize, Clone, Copy, PartialEq)]
pub enum UpdateMessage {
    /// Playback was blocked by the platform; sent at most once
    AutoplayBlocked,
    /// The volume slider should show this level
    Volume(f32),
}

/// Snapshot of the audio state for the settings overlay
#[derive(Debug, Serialize, Clone, Copy, PartialEq)]
pub struct SyncMessage {
    /// Live volume level
    pub volume: f32,
    /// Volume music is restored to when switched back on
    pub saved_volume: f32,
    /// Loaded track
    pub track: Option<Track>,
    /// Whether music is playing
    pub playing: bool,
    /// Whether the music channel is muted
    pub muted: bool,
}

/// Sequences music and effects for the active mode
#[derive(Debug, Clone)]
pub struct Director {
    settings: Settings,
    mode: Mode,
    generation: Generation,
    sequence: u64,
    music: MusicChannel,
    music_ticket: Option<Ticket>,
    effects: EnumMap<Effect, EffectChannel>,
    duck: DuckState,
    /// Fraction of the user level the music channel currently gets
    gain: f32,
    /// Music was paused for an effect and resumes when it ends
    held: bool,
    /// Live slider level, may be zero
    level: f32,
    saved: SavedVolume,
    notice_shown: bool,
}

impl Director {
    /// Creates a director with nothing loaded and the music at `saved`
    pub fn new(settings: Settings, saved: SavedVolume) -> Self {
        Self {
            settings,
            mode: Mode::Silent,
            generation: Generation::default(),
            sequence: 0,
            music: MusicChannel::default(),
            music_ticket: None,
            effects: EnumMap::default(),
            duck: DuckState::Idle,
            gain: 1.0,
            held: false,
            level: saved.get(),
            saved,
            notice_shown: false,
        }
    }

    /// State of the music channel
    pub fn music(&self) -> &MusicChannel {
        &self.music
    }

    /// State of an effect channel
    pub fn effect(&self, effect: Effect) -> &EffectChannel {
        &self.effects[effect]
    }

    /// Current duck operation
    pub fn duck_state(&self) -> DuckState {
        self.duck
    }

    /// Volume the music channel is set to right now
    pub fn music_volume(&self) -> f32 {
        self.level * self.gain
    }

    /// Live volume level
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Last non-zero volume the user chose
    pub fn saved_volume(&self) -> SavedVolume {
        self.saved
    }

    /// Snapshot for the settings overlay
    pub fn state_message(&self) -> SyncMessage {
        SyncMessage {
            volume: self.level,
            saved_volume: self.saved.get(),
            track: self.music.track,
            playing: self.music.playing,
            muted: self.music.muted,
        }
    }

    fn issue(&mut self) -> Ticket {
        self.sequence += 1;
        Ticket {
            generation: self.generation,
            sequence: self.sequence,
        }
    }

    fn apply_volume<B: AudioBackend>(&self, backend: &mut B) {
        backend.set_music_volume(self.music_volume());
    }

    fn fades(&self) -> bool {
        !self.settings.fade_duration.is_zero()
    }

    fn start_music<B: AudioBackend>(&mut self, backend: &mut B) {
        let ticket = self.issue();
        self.music_ticket = Some(ticket);
        self.music.playing = true;
        backend.play_music(ticket);
    }

    /// Stops everything and adopts `generation` as the current run
    fn reset<B: AudioBackend>(&mut self, generation: Generation, backend: &mut B) {
        self.generation = generation;

        backend.pause_music();
        self.music.playing = false;
        self.music_ticket = None;

        backend.stop_effects();
        self.effects = EnumMap::default();

        self.duck = DuckState::Idle;
        self.gain = 1.0;
        self.held = false;
    }

    /// Sets up the music for a run in `mode`
    ///
    /// The previous track is always stopped first. Modes with a track load
    /// it, unmute the channel and request playback at the user level.
    pub fn configure<B: AudioBackend>(
        &mut self,
        mode: Mode,
        generation: Generation,
        backend: &mut B,
    ) {
        self.reset(generation, backend);
        self.mode = mode;

        let track = Track::for_mode(mode);
        backend.load_music(track);
        self.music.track = track;

        if let Some(track) = track {
            log::debug!("starting {} for {mode} mode", track.asset());
            self.music.muted = false;
            backend.set_music_muted(false);
            self.apply_volume(backend);
            self.start_music(backend);
        }
    }

    /// Stops all audio and adopts `generation`, used on restart
    pub fn stop_all<B: AudioBackend>(&mut self, generation: Generation, backend: &mut B) {
        self.reset(generation, backend);
    }

    /// Pauses the music without resuming it after effects
    pub fn stop_music<B: AudioBackend>(&mut self, backend: &mut B) {
        backend.pause_music();
        self.music.playing = false;
        self.held = false;
    }

    /// Plays `effect` with the music out of its way
    ///
    /// Does nothing outside of quiz mode.
    pub fn play_effect<B: AudioBackend, S: FnMut(crate::AlarmMessage, web_time::Duration)>(
        &mut self,
        effect: Effect,
        backend: &mut B,
        mut schedule_message: S,
    ) {
        if !self.mode.plays_effects() {
            return;
        }
        let ticket = self.issue();

        match self.settings.ducking {
            DuckingPolicy::Pause => {
                if self.music.audible() {
                    backend.pause_music();
                    self.music.playing = false;
                    self.held = true;
                }
                self.start_effect(effect, ticket, backend, &mut schedule_message);
            }
            DuckingPolicy::Fade => {
                if self.duck.is_idle() && self.music.audible() && self.fades() {
                    self.duck = DuckState::Ducking {
                        effect,
                        ticket,
                        step: 0,
                    };
                    schedule_message(
                        AlarmMessage::FadeStep { ticket }.into(),
                        self.settings.fade_interval(),
                    );
                } else {
                    // Mid-fade, already ducked, or nothing to fade: jump straight down.
                    self.gain = self.settings.duck_level;
                    self.apply_volume(backend);

                    // An effect still waiting for its fade plays now instead of never.
                    match self.duck {
                        DuckState::Ducking {
                            effect: pending,
                            ticket: pending_ticket,
                            ..
                        } if pending != effect => {
                            self.start_effect(pending, pending_ticket, backend, &mut schedule_message);
                        }
                        _ => {}
                    }
                    self.start_effect(effect, ticket, backend, &mut schedule_message);
                }
            }
        }
    }

    fn start_effect<B: AudioBackend, S: FnMut(crate::AlarmMessage, web_time::Duration)>(
        &mut self,
        effect: Effect,
        ticket: Ticket,
        backend: &mut B,
        mut schedule_message: S,
    ) {
        self.duck = DuckState::EffectPlaying { effect, ticket };
        self.effects[effect] = EffectChannel {
            playing: true,
            ticket: Some(ticket),
        };
        backend.play_effect(effect, ticket);
        schedule_message(
            AlarmMessage::EffectTimeout { ticket }.into(),
            self.settings.effect_timeout,
        );
    }

    /// Ends the effect owned by `ticket` and starts bringing the music back
    fn finish_effect<B: AudioBackend, S: FnMut(crate::AlarmMessage, web_time::Duration)>(
        &mut self,
        ticket: Ticket,
        backend: &mut B,
        mut schedule_message: S,
    ) {
        let DuckState::EffectPlaying {
            effect,
            ticket: current,
        } = self.duck
        else {
            return;
        };
        if current != ticket {
            return;
        }
        self.effects[effect].playing = false;

        match self.settings.ducking {
            DuckingPolicy::Pause => {
                self.duck = DuckState::Idle;
                if self.held {
                    self.held = false;
                    if self.music.track.is_some() && !self.music.muted {
                        self.start_music(backend);
                    }
                }
            }
            DuckingPolicy::Fade => {
                if self.music.audible() && self.fades() {
                    self.duck = DuckState::Restoring { ticket, step: 0 };
                    schedule_message(
                        AlarmMessage::FadeStep { ticket }.into(),
                        self.settings.fade_interval(),
                    );
                } else {
                    self.duck = DuckState::Idle;
                    self.gain = 1.0;
                    self.apply_volume(backend);
                }
            }
        }
    }

    fn fade_step<B: AudioBackend, S: FnMut(crate::AlarmMessage, web_time::Duration)>(
        &mut self,
        ticket: Ticket,
        backend: &mut B,
        mut schedule_message: S,
    ) {
        let steps = self.settings.fade_steps;
        let duck_level = self.settings.duck_level;

        match self.duck {
            DuckState::Ducking {
                effect,
                ticket: current,
                step,
            } if current == ticket => {
                let step = step + 1;
                self.gain = duck::fade_gain(1.0, duck_level, step, steps);
                self.apply_volume(backend);
                if step >= steps {
                    self.start_effect(effect, ticket, backend, &mut schedule_message);
                } else {
                    self.duck = DuckState::Ducking {
                        effect,
                        ticket,
                        step,
                    };
                    schedule_message(
                        AlarmMessage::FadeStep { ticket }.into(),
                        self.settings.fade_interval(),
                    );
                }
            }
            DuckState::Restoring {
                ticket: current,
                step,
            } if current == ticket => {
                let step = step + 1;
                self.gain = duck::fade_gain(duck_level, 1.0, step, steps);
                self.apply_volume(backend);
                if step >= steps {
                    self.duck = DuckState::Idle;
                } else {
                    self.duck = DuckState::Restoring { ticket, step };
                    schedule_message(
                        AlarmMessage::FadeStep { ticket }.into(),
                        self.settings.fade_interval(),
                    );
                }
            }
            _ => log::debug!("dropping fade step of superseded operation {ticket:?}"),
        }
    }

    /// Handles a completion reported by the backend
    ///
    /// Completions of an earlier run or a superseded request are ignored.
    /// Returns a message when the user should hear about a blocked playback.
    pub fn receive_event<B: AudioBackend, S: FnMut(crate::AlarmMessage, web_time::Duration)>(
        &mut self,
        event: AudioEvent,
        backend: &mut B,
        schedule_message: S,
    ) -> Option<UpdateMessage> {
        if event.ticket().generation != self.generation {
            log::debug!("ignoring {event:?} from a previous run");
            return None;
        }

        match event {
            AudioEvent::MusicRejected { ticket } => {
                if self.music_ticket != Some(ticket) {
                    return None;
                }
                log::warn!("background music was blocked, muting the channel");
                self.music.playing = false;
                self.music.muted = true;
                self.held = false;
                backend.set_music_muted(true);
                self.blocked_notice()
            }
            AudioEvent::EffectRejected { effect, ticket } => {
                if self.effects[effect].ticket != Some(ticket) {
                    log::debug!("ignoring rejection of a replayed {}", effect.asset());
                    return None;
                }
                log::warn!("{} was blocked", effect.asset());
                self.effects[effect].playing = false;
                self.finish_effect(ticket, backend, schedule_message);
                self.blocked_notice()
            }
            AudioEvent::EffectEnded { effect, ticket } => {
                if self.effects[effect].ticket == Some(ticket) {
                    self.effects[effect].playing = false;
                }
                self.finish_effect(ticket, backend, schedule_message);
                None
            }
        }
    }

    fn blocked_notice(&mut self) -> Option<UpdateMessage> {
        if self.notice_shown {
            None
        } else {
            self.notice_shown = true;
            Some(UpdateMessage::AutoplayBlocked)
        }
    }

    /// Handles an alarm scheduled by this director
    pub fn receive_alarm<B: AudioBackend, S: FnMut(crate::AlarmMessage, web_time::Duration)>(
        &mut self,
        message: AlarmMessage,
        backend: &mut B,
        schedule_message: S,
    ) {
        match message {
            AlarmMessage::FadeStep { ticket } if ticket.generation == self.generation => {
                self.fade_step(ticket, backend, schedule_message);
            }
            AlarmMessage::EffectTimeout { ticket } if ticket.generation == self.generation => {
                self.finish_effect(ticket, backend, schedule_message);
            }
            _ => log::debug!("ignoring {message:?} from a previous run"),
        }
    }

    /// Switches the music back on from the settings overlay
    ///
    /// A zero level is replaced by the saved volume. Returns the level the
    /// slider should show.
    pub fn music_on<B: AudioBackend>(&mut self, backend: &mut B) -> UpdateMessage {
        if self.level <= 0.0 {
            self.level = self.saved.get();
        }

        if self.music.track.is_some() {
            self.music.muted = false;
            backend.set_music_muted(false);
            self.apply_volume(backend);

            let paused_for_effect = self.settings.ducking == DuckingPolicy::Pause
                && matches!(self.duck, DuckState::EffectPlaying { .. });
            if paused_for_effect {
                self.held = true;
            } else if !self.music.playing {
                self.start_music(backend);
            }
        }

        UpdateMessage::Volume(self.level)
    }

    /// Switches the music off from the settings overlay
    pub fn music_off<B: AudioBackend>(&mut self, backend: &mut B) {
        self.stop_music(backend);
    }

    /// Applies a slider value immediately and persists it unless zero
    ///
    /// Non-finite values are ignored. Returns the level the slider should
    /// show.
    pub fn set_volume<B: AudioBackend, P: PreferenceStore>(
        &mut self,
        value: f32,
        backend: &mut B,
        prefs: &mut P,
    ) -> UpdateMessage {
        if value.is_finite() {
            self.level = value.clamp(0.0, 1.0);
            self.apply_volume(backend);

            if let Some(saved) = SavedVolume::new(self.level) {
                self.saved = saved;
                saved.persist(prefs);
            }
        }

        UpdateMessage::Volume(self.level)
    }
}
