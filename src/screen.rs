//! Screen visibility
//!
//! Exactly one primary screen is visible at any time. The settings overlay
//! is layered on top of whichever screen is showing and toggles on its own.

use std::{fmt::Display, str::FromStr};

use enum_map::{Enum, EnumMap};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The primary screens of the quiz
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Enum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Screen {
    /// Mode selection and question count
    #[default]
    Title,
    /// A question with its answer options
    Quiz,
    /// Correctness, the correct answer and an explanation
    Feedback,
    /// Final score and grade
    Result,
}

impl Screen {
    /// Name of the screen as used by the page markup
    pub fn name(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Quiz => "quiz",
            Self::Feedback => "feedback",
            Self::Result => "result",
        }
    }
}

impl Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A screen name that does not belong to any primary screen
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown screen `{0}`")]
pub struct UnknownScreen(pub String);

impl FromStr for Screen {
    type Err = UnknownScreen;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" => Ok(Self::Title),
            "quiz" => Ok(Self::Quiz),
            "feedback" => Ok(Self::Feedback),
            "result" => Ok(Self::Result),
            other => Err(UnknownScreen(other.to_owned())),
        }
    }
}

/// Update messages about what is visible
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMessage {
    /// Show this screen and hide every other primary screen
    Show(Screen),
    /// Open or close the settings overlay
    Settings(bool),
}

/// Tracks which primary screen is visible and whether settings are open
#[derive(Debug, Clone)]
pub struct ScreenController {
    visible: EnumMap<Screen, bool>,
    settings_open: bool,
}

impl Default for ScreenController {
    fn default() -> Self {
        let mut visible = EnumMap::default();
        visible[Screen::Title] = true;
        Self {
            visible,
            settings_open: false,
        }
    }
}

impl ScreenController {
    /// Shows `screen` and hides all other primary screens
    ///
    /// The settings overlay is left as it is.
    pub fn show(&mut self, screen: Screen) -> UpdateMessage {
        for (candidate, visible) in &mut self.visible {
            *visible = candidate == screen;
        }
        UpdateMessage::Show(screen)
    }

    /// Shows a screen given by its markup name
    ///
    /// # Panics
    ///
    /// Panics if `name` is not one of the primary screens. Screen names are
    /// fixed by the page, so an unknown one is a programming error.
    pub fn show_named(&mut self, name: &str) -> UpdateMessage {
        let screen = name.parse().unwrap_or_else(|e: UnknownScreen| panic!("{e}"));
        self.show(screen)
    }

    /// The currently visible primary screen
    pub fn current(&self) -> Screen {
        self.visible
            .iter()
            .find_map(|(screen, visible)| visible.then_some(screen))
            .unwrap_or_default()
    }

    /// Whether `screen` is visible
    pub fn is_visible(&self, screen: Screen) -> bool {
        self.visible[screen]
    }

    /// Opens the settings overlay
    pub fn open_settings(&mut self) -> UpdateMessage {
        self.settings_open = true;
        UpdateMessage::Settings(true)
    }

    /// Closes the settings overlay
    pub fn close_settings(&mut self) -> UpdateMessage {
        self.settings_open = false;
        UpdateMessage::Settings(false)
    }

    /// Whether the settings overlay is open
    pub fn settings_open(&self) -> bool {
        self.settings_open
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_title_visible_by_default() {
        let screens = ScreenController::default();

        assert_eq!(screens.current(), Screen::Title);
        assert!(screens.is_visible(Screen::Title));
        assert!(!screens.settings_open());
    }

    #[test]
    fn test_show_is_exclusive() {
        let mut screens = ScreenController::default();

        assert_eq!(screens.show(Screen::Feedback), UpdateMessage::Show(Screen::Feedback));
        assert_eq!(screens.current(), Screen::Feedback);
        assert_eq!(
            [Screen::Title, Screen::Quiz, Screen::Feedback, Screen::Result]
                .into_iter()
                .filter(|s| screens.is_visible(*s))
                .count(),
            1
        );
    }

    #[test]
    fn test_settings_overlay_is_independent() {
        let mut screens = ScreenController::default();
        screens.show(Screen::Quiz);
        screens.open_settings();
        screens.show(Screen::Feedback);

        assert!(screens.settings_open());
        assert_eq!(screens.current(), Screen::Feedback);

        assert_eq!(screens.close_settings(), UpdateMessage::Settings(false));
        assert_eq!(screens.current(), Screen::Feedback);
    }

    #[test]
    fn test_screen_from_str() {
        assert_eq!("result".parse::<Screen>(), Ok(Screen::Result));
        assert_eq!(
            "settings".parse::<Screen>(),
            Err(UnknownScreen("settings".to_string()))
        );
        assert_eq!(Screen::Quiz.to_string(), "quiz");
    }

    #[test]
    fn test_show_named() {
        let mut screens = ScreenController::default();
        screens.show_named("quiz");

        assert_eq!(screens.current(), Screen::Quiz);
    }

    #[test]
    #[should_panic(expected = "unknown screen `lobby`")]
    fn test_show_named_unknown_panics() {
        ScreenController::default().show_named("lobby");
    }

    #[test]
    fn test_screen_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Screen::Feedback).unwrap(), "\"feedback\"");
    }
}
