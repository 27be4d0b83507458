//! Configuration constants for the study quiz
//!
//! This module contains the limits, fixed texts, asset names and timing
//! bounds used throughout the crate, grouped by the concern they belong to.

/// Question document limits
pub mod question {
    /// Number of answer options every question carries
    pub const OPTION_COUNT: usize = 4;
    /// Maximum number of questions in one document
    pub const MAX_QUESTION_COUNT: usize = 500;
    /// Minimum length of a question prompt in characters
    pub const MIN_PROMPT_LENGTH: usize = 1;
    /// Maximum length of a question prompt in characters
    pub const MAX_PROMPT_LENGTH: usize = 1000;
    /// Maximum length of a single option in characters
    pub const MAX_OPTION_LENGTH: usize = 200;
    /// Maximum length of an explanation in characters
    pub const MAX_EXPLANATION_LENGTH: usize = 2000;
}

/// Texts shown on the feedback screen
pub mod feedback {
    /// Shown when the selected option is the correct one
    pub const CORRECT: &str = "正解○";
    /// Shown when the selected option is wrong
    pub const INCORRECT: &str = "不正解";
}

/// Grade thresholds and messages
///
/// A score lands in a tier when its percentage is strictly greater than the
/// tier's threshold.
pub mod grade {
    /// Threshold above which the top tier is reached
    pub const MASTER_THRESHOLD: usize = 80;
    /// Threshold above which the second tier is reached
    pub const STRONG_THRESHOLD: usize = 60;
    /// Threshold above which the third tier is reached
    pub const STANDARD_THRESHOLD: usize = 40;
    /// Threshold above which the fourth tier is reached
    pub const DEVELOPING_THRESHOLD: usize = 20;

    /// Top tier message
    pub const MASTER_MESSAGE: &str = "完璧！情報Iマスター！";
    /// Second tier message
    pub const STRONG_MESSAGE: &str = "好調！満点まであと少し！";
    /// Third tier message
    pub const STANDARD_MESSAGE: &str = "標準到達！あと一歩！";
    /// Fourth tier message
    pub const DEVELOPING_MESSAGE: &str = "もう少し！復習して再挑戦！";
    /// Fifth tier message
    pub const FOUNDATION_MESSAGE: &str = "焦らず基礎固め！";
}

/// Audio assets and volume persistence
pub mod audio {
    /// Volume used when nothing usable is persisted
    pub const DEFAULT_VOLUME: f32 = 0.5;
    /// Preference key the saved volume is stored under
    pub const VOLUME_KEY: &str = "quiz.bgm.volume";

    /// Background track for the sound-accompanied study mode
    pub const AMBIENT_TRACK: &str = "rain_sound_01_60min.mp3";
    /// Background track for the scored quiz mode
    pub const UPBEAT_TRACK: &str = "quiz_bgm.mp3";

    /// Effect played when a question is shown
    pub const QUESTION_EFFECT: &str = "sfx_question.mp3";
    /// Effect played on a correct answer
    pub const CORRECT_EFFECT: &str = "sfx_correct.mp3";
    /// Effect played on a wrong answer
    pub const INCORRECT_EFFECT: &str = "sfx_incorrect.mp3";
    /// Effect played before the result is revealed
    pub const DRUMROLL_EFFECT: &str = "sfx_drumroll.mp3";
}

/// Timing bounds for [`crate::config::Settings`], in milliseconds
pub mod timing {
    /// Minimum total fade duration
    pub const MIN_FADE_DURATION: u64 = 0;
    /// Maximum total fade duration
    pub const MAX_FADE_DURATION: u64 = 3000;
    /// Minimum number of volume steps in one fade
    pub const MIN_FADE_STEPS: u32 = 1;
    /// Maximum number of volume steps in one fade
    pub const MAX_FADE_STEPS: u32 = 50;
    /// Minimum time an effect may take before music is restored regardless
    pub const MIN_EFFECT_TIMEOUT: u64 = 500;
    /// Maximum time an effect may take before music is restored regardless
    pub const MAX_EFFECT_TIMEOUT: u64 = 15000;
    /// Minimum delay between the drumroll and the score reveal
    pub const MIN_REVEAL_DELAY: u64 = 500;
    /// Maximum delay between the drumroll and the score reveal
    pub const MAX_REVEAL_DELAY: u64 = 5000;
}
