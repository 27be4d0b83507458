//! Controller
//!
//! [`App`] owns the question store, the quiz engine, the screen controller
//! and the audio director, and is the only way the host talks to any of
//! them. Every handler does its navigation first (switch the screen, send the
//! render message) and only then asks the audio director for sound, so a
//! stuck or rejected playback can never hold up what the user sees.

use std::fmt::Display;

use serde::Deserialize;

use crate::{
    AlarmMessage, SyncMessage, UpdateMessage,
    audio::{self, AudioBackend, AudioEvent, Director, Effect, PreferenceStore, SavedVolume},
    config::Settings,
    quiz::{self, Mode, Quiz, ResultSummary},
    screen::{Screen, ScreenController},
    session::{Generation, View},
    store::{self, QuestionStore},
};

/// User actions the host forwards to the controller
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub enum Action {
    /// One of the three mode buttons on the title screen
    SelectMode(Mode),
    /// An answer button, by option index
    Answer(usize),
    /// Go on to the next question
    Next,
    /// Go on to the result screen after the last question
    ShowResult,
    /// Back to the title screen
    Restart,
    /// Open the settings overlay
    OpenSettings,
    /// Close the settings overlay
    CloseSettings,
    /// Switch background music on
    MusicOn,
    /// Switch background music off
    MusicOff,
    /// Volume slider moved
    SetVolume(f32),
}

/// The quiz application
#[derive(Debug)]
pub struct App<B: AudioBackend, P: PreferenceStore> {
    settings: Settings,
    store: QuestionStore,
    quiz: Quiz,
    screens: ScreenController,
    director: Director,
    backend: B,
    prefs: P,
}

impl<B: AudioBackend, P: PreferenceStore> App<B, P> {
    /// Creates the application on the title screen
    ///
    /// The saved volume is read from `prefs` right away. Questions are
    /// pending until the host calls [`App::questions_loaded`].
    pub fn new(backend: B, prefs: P, settings: Settings) -> Self {
        let saved = SavedVolume::restore(&prefs);
        Self {
            director: Director::new(settings.clone(), saved),
            settings,
            store: QuestionStore::default(),
            quiz: Quiz::default(),
            screens: ScreenController::default(),
            backend,
            prefs,
        }
    }

    /// The question store
    pub fn store(&self) -> &QuestionStore {
        &self.store
    }

    /// The quiz engine
    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    /// The screen controller
    pub fn screens(&self) -> &ScreenController {
        &self.screens
    }

    /// The audio director
    pub fn director(&self) -> &Director {
        &self.director
    }

    /// The media backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The preference store
    pub fn prefs(&self) -> &P {
        &self.prefs
    }

    /// Takes over the outcome of the question fetch
    ///
    /// `document` is the fetched text or whatever error the host ran into.
    /// The store is replaced either way and the title screen learns the
    /// outcome.
    pub fn questions_loaded<E: Display, V: View>(&mut self, document: Result<&str, E>, view: &V) {
        let loaded = document
            .map_err(|e| store::Error::Fetch(e.to_string()))
            .and_then(QuestionStore::from_json);

        self.store = match loaded {
            Ok(store) => {
                log::info!("loaded {} questions", store.len());
                store
            }
            Err(e) => {
                log::warn!("questions are unavailable: {e}");
                QuestionStore::failed(&e)
            }
        };

        if let Some(message) = self.store.update_message() {
            view.send_message(&message.into());
        }
    }

    /// Handles a user action
    pub fn receive_action<V: View, S: FnMut(AlarmMessage, web_time::Duration)>(
        &mut self,
        action: Action,
        mut schedule_message: S,
        view: &V,
    ) {
        match action {
            Action::SelectMode(mode) => self.select_mode(mode, &mut schedule_message, view),
            Action::Answer(selected) => match self.quiz.submit_answer(selected, &self.store) {
                Ok(feedback) => {
                    let correct = feedback.correct;
                    self.show(Screen::Feedback, view);
                    view.send_message(&quiz::UpdateMessage::Feedback(feedback).into());

                    self.director.play_effect(
                        Effect::for_answer(correct),
                        &mut self.backend,
                        &mut schedule_message,
                    );
                }
                Err(e) => log::debug!("ignoring answer: {e}"),
            },
            Action::Next => match self.quiz.advance(&self.store) {
                Ok(question) => {
                    self.show(Screen::Quiz, view);
                    view.send_message(&quiz::UpdateMessage::QuestionAnnouncement(question).into());

                    self.director
                        .play_effect(Effect::Question, &mut self.backend, &mut schedule_message);
                }
                Err(e) => log::debug!("ignoring next: {e}"),
            },
            Action::ShowResult => self.show_result(&mut schedule_message, view),
            Action::Restart => {
                self.quiz.restart();
                self.show(Screen::Title, view);
                if let Some(message) = self.store.update_message() {
                    view.send_message(&message.into());
                }

                self.director
                    .stop_all(self.quiz.session().generation(), &mut self.backend);
            }
            Action::OpenSettings => {
                view.send_message(&self.screens.open_settings().into());
                view.send_message(&audio::UpdateMessage::Volume(self.director.level()).into());
            }
            Action::CloseSettings => {
                view.send_message(&self.screens.close_settings().into());
            }
            Action::MusicOn => {
                let message = self.director.music_on(&mut self.backend);
                view.send_message(&message.into());
            }
            Action::MusicOff => self.director.music_off(&mut self.backend),
            Action::SetVolume(value) => {
                let message = self
                    .director
                    .set_volume(value, &mut self.backend, &mut self.prefs);
                view.send_message(&message.into());
            }
        }
    }

    fn show<V: View>(&mut self, screen: Screen, view: &V) {
        view.send_message(&self.screens.show(screen).into());
    }

    fn select_mode<V: View, S: FnMut(AlarmMessage, web_time::Duration)>(
        &mut self,
        mode: Mode,
        schedule_message: S,
        view: &V,
    ) {
        if !self.store.is_ready() {
            log::debug!("ignoring {mode} mode, questions are not loaded");
            // Pending has no message; a failed load is repeated.
            if let Some(message) = self.store.update_message() {
                view.send_message(&message.into());
            }
            return;
        }

        let question = match self.quiz.start(mode, &self.store) {
            Ok(question) => question,
            Err(e) => {
                log::debug!("ignoring {mode} mode: {e}");
                return;
            }
        };
        let generation = self.quiz.session().generation();
        log::info!("starting a {mode} run ({generation})");

        self.show(Screen::Quiz, view);
        view.send_message(&quiz::UpdateMessage::QuestionAnnouncement(question).into());

        self.director.configure(mode, generation, &mut self.backend);
        self.director
            .play_effect(Effect::Question, &mut self.backend, schedule_message);
    }

    fn show_result<V: View, S: FnMut(AlarmMessage, web_time::Duration)>(
        &mut self,
        mut schedule_message: S,
        view: &V,
    ) {
        let score = match self.quiz.finish(&self.store) {
            Ok(score) => score,
            Err(e) => {
                log::debug!("ignoring result request: {e}");
                return;
            }
        };
        let generation = self.quiz.session().generation();
        log::info!("run {generation} finished with {}", score.label());

        self.show(Screen::Result, view);
        view.send_message(&quiz::UpdateMessage::ResultPending.into());

        self.director.stop_music(&mut self.backend);

        if self.quiz.session().mode().plays_effects() {
            schedule_message(
                quiz::AlarmMessage::RevealResult { generation }.into(),
                self.settings.reveal_delay,
            );
            self.director
                .play_effect(Effect::Drumroll, &mut self.backend, &mut schedule_message);
        } else {
            self.reveal(generation, view);
        }
    }

    fn reveal<V: View>(&mut self, generation: Generation, view: &V) {
        if let Some(score) = self.quiz.reveal(generation) {
            view.send_message(&quiz::UpdateMessage::ResultReveal(ResultSummary::from(score)).into());
        }
    }

    /// Handles an alarm scheduled by an earlier call
    pub fn receive_alarm<V: View, S: FnMut(AlarmMessage, web_time::Duration)>(
        &mut self,
        message: AlarmMessage,
        schedule_message: S,
        view: &V,
    ) {
        match message {
            AlarmMessage::Quiz(quiz::AlarmMessage::RevealResult { generation }) => {
                self.reveal(generation, view);
            }
            AlarmMessage::Audio(message) => {
                self.director
                    .receive_alarm(message, &mut self.backend, schedule_message);
            }
        }
    }

    /// Handles a media completion reported by the backend
    pub fn receive_audio_event<V: View, S: FnMut(AlarmMessage, web_time::Duration)>(
        &mut self,
        event: AudioEvent,
        schedule_message: S,
        view: &V,
    ) {
        if let Some(message) =
            self.director
                .receive_event(event, &mut self.backend, schedule_message)
        {
            view.send_message(&message.into());
        }
    }

    /// Snapshots of the quiz and the audio settings
    pub fn state_messages(&self) -> [SyncMessage; 2] {
        [
            self.quiz.state_message(&self.store).into(),
            self.director.state_message().into(),
        ]
    }

    /// Sends everything a freshly mounted front end needs to redraw
    pub fn sync<V: View>(&self, view: &V) {
        view.send_message(&UpdateMessage::from(crate::screen::UpdateMessage::Show(
            self.screens.current(),
        )));
        view.send_message(&UpdateMessage::from(crate::screen::UpdateMessage::Settings(
            self.screens.settings_open(),
        )));
        for state in self.state_messages() {
            view.send_state(&state);
        }
    }
}
