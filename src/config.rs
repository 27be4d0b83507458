//! Runtime settings for the audio choreography
//!
//! Settings are plain data: they are deserialized from JSON (every field is
//! optional and falls back to its default) and validated with `garde` so the
//! director never has to deal with, say, a fade of zero steps.

use std::time::Duration;

use garde::Validate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::timing;

type ValidationResult = garde::Result;

/// Validates that a duration falls within bounds given in milliseconds
fn validate_millis<const MIN_MILLIS: u64, const MAX_MILLIS: u64>(
    field: &'static str,
    val: &Duration,
) -> ValidationResult {
    let millis = u64::try_from(val.as_millis()).unwrap_or(u64::MAX);
    if (MIN_MILLIS..=MAX_MILLIS).contains(&millis) {
        Ok(())
    } else {
        Err(garde::Error::new(format!(
            "{field} is outside of the bounds [{MIN_MILLIS},{MAX_MILLIS}] ms",
        )))
    }
}

fn validate_fade_duration(val: &Duration) -> ValidationResult {
    validate_millis::<{ timing::MIN_FADE_DURATION }, { timing::MAX_FADE_DURATION }>(
        "fade_duration",
        val,
    )
}

fn validate_effect_timeout(val: &Duration) -> ValidationResult {
    validate_millis::<{ timing::MIN_EFFECT_TIMEOUT }, { timing::MAX_EFFECT_TIMEOUT }>(
        "effect_timeout",
        val,
    )
}

fn validate_reveal_delay(val: &Duration) -> ValidationResult {
    validate_millis::<{ timing::MIN_REVEAL_DELAY }, { timing::MAX_REVEAL_DELAY }>(
        "reveal_delay",
        val,
    )
}

/// How background music gives way to a sound effect in quiz mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DuckingPolicy {
    /// Lower the music gradually, play the effect, raise it back gradually
    #[default]
    Fade,
    /// Pause the music for the effect and resume it afterwards
    Pause,
}

/// Tunable timings and levels of the audio director
#[serde_with::serde_as]
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Settings {
    /// Strategy used to keep music and effects from overlapping at full volume
    #[garde(skip)]
    pub ducking: DuckingPolicy,
    /// Fraction of the user level the music is lowered to while ducked
    #[garde(range(min = 0.0, max = 1.0))]
    pub duck_level: f32,
    /// Total duration of a fade out or a fade in
    #[garde(custom(|v, _| validate_fade_duration(v)))]
    #[serde_as(as = "serde_with::DurationMilliSeconds<u64>")]
    pub fade_duration: Duration,
    /// Number of volume steps a fade is split into
    #[garde(range(min = timing::MIN_FADE_STEPS, max = timing::MAX_FADE_STEPS))]
    pub fade_steps: u32,
    /// Upper bound on an effect's length; music is restored after it even if
    /// the effect never reports its end
    #[garde(custom(|v, _| validate_effect_timeout(v)))]
    #[serde_as(as = "serde_with::DurationMilliSeconds<u64>")]
    pub effect_timeout: Duration,
    /// Delay between the drumroll starting and the score being revealed
    #[garde(custom(|v, _| validate_reveal_delay(v)))]
    #[serde_as(as = "serde_with::DurationMilliSeconds<u64>")]
    pub reveal_delay: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ducking: DuckingPolicy::Fade,
            duck_level: 0.2,
            fade_duration: Duration::from_millis(400),
            fade_steps: 8,
            effect_timeout: Duration::from_millis(4000),
            reveal_delay: Duration::from_millis(1800),
        }
    }
}

/// Errors that can occur when reading settings
#[derive(Error, Debug)]
pub enum Error {
    /// The settings document is not valid JSON for [`Settings`]
    #[error("settings could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),
    /// A setting is outside of its allowed bounds
    #[error("settings are invalid: {0}")]
    Invalid(#[from] garde::Report),
}

impl Settings {
    /// Parses and validates settings from a JSON document
    ///
    /// Missing fields take their default value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] for malformed JSON and [`Error::Invalid`]
    /// when a value is out of bounds.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Interval between two volume steps of a fade
    pub fn fade_interval(&self) -> Duration {
        self.fade_duration / self.fade_steps.max(1)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_from_json_partial_document() {
        let settings = Settings::from_json(r#"{"ducking":"Pause","reveal_delay":1500}"#).unwrap();

        assert_eq!(settings.ducking, DuckingPolicy::Pause);
        assert_eq!(settings.reveal_delay, Duration::from_millis(1500));
        assert_eq!(settings.fade_steps, 8);
    }

    #[test]
    fn test_from_json_empty_object_is_default() {
        let settings = Settings::from_json("{}").unwrap();

        assert_eq!(settings.ducking, DuckingPolicy::Fade);
        assert_eq!(settings.effect_timeout, Duration::from_millis(4000));
    }

    #[test]
    fn test_from_json_malformed() {
        assert!(matches!(
            Settings::from_json("{not json"),
            Err(Error::Parse(_))
        ));
    }

    #[test]
    fn test_reveal_delay_too_long() {
        assert!(matches!(
            Settings::from_json(r#"{"reveal_delay":9000}"#),
            Err(Error::Invalid(_))
        ));
    }

    #[test]
    fn test_effect_timeout_too_short() {
        let settings = Settings {
            effect_timeout: Duration::from_millis(100),
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_duck_level_out_of_range() {
        let settings = Settings {
            duck_level: 1.5,
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_fade_steps_zero_rejected() {
        let settings = Settings {
            fade_steps: 0,
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_fade_interval() {
        let settings = Settings::default();
        assert_eq!(settings.fade_interval(), Duration::from_millis(50));
    }
}
