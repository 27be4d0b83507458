//! Quiz engine
//!
//! This module implements the state machine that walks through the question
//! store: `Title → InQuestion → Feedback → … → Result`. The engine only keeps
//! session state and produces render data; the controller decides what to
//! show and which sounds go with it.

pub mod grade;

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use thiserror::Error;

use crate::{constants::feedback, session::Generation, store::QuestionStore};

pub use grade::{Grade, Score};

/// Run configuration chosen on the title screen
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Study without any audio
    #[default]
    #[display("silent")]
    Silent,
    /// Study with ambient background music
    #[display("sound")]
    Sound,
    /// Scored quiz with upbeat music and sound effects
    #[display("quiz")]
    Quiz,
}

impl Mode {
    /// Whether sound effects belong to this mode
    pub fn plays_effects(self) -> bool {
        matches!(self, Self::Quiz)
    }
}

/// A mode name that does not belong to any mode
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown mode `{0}`")]
pub struct UnknownMode(pub String);

impl FromStr for Mode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "silent" => Ok(Self::Silent),
            "sound" => Ok(Self::Sound),
            "quiz" => Ok(Self::Quiz),
            other => Err(UnknownMode(other.to_owned())),
        }
    }
}

/// Phase of the quiz state machine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
pub enum Phase {
    /// Waiting for a mode selection
    #[default]
    Title,
    /// A question is shown and awaits an answer
    InQuestion,
    /// The answer was judged and feedback is shown
    Feedback,
    /// The run is over and the result screen is up
    Result,
}

/// Mutable state of one quiz run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Session {
    mode: Mode,
    index: usize,
    correct: usize,
    generation: Generation,
}

impl Session {
    /// Active mode
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Zero-based index of the current question
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of correct answers so far
    pub fn correct(&self) -> usize {
        self.correct
    }

    /// Token of the current run
    pub fn generation(&self) -> Generation {
        self.generation
    }
}

/// Render data for one question
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionView {
    /// Zero-based index of the question
    pub index: usize,
    /// Total number of questions
    pub count: usize,
    /// Counter label, e.g. `問3`
    pub label: String,
    /// Prompt text
    pub question: String,
    /// Option texts in display order
    pub options: Vec<String>,
}

/// Outcome of one answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Feedback {
    /// Whether the selected option was the correct one
    pub correct: bool,
    /// Either the correct or the incorrect indicator text
    pub message: &'static str,
    /// Text of the correct option
    pub correct_answer: String,
    /// Explanation of the question
    pub explanation: String,
    /// Whether the next step is the result rather than another question
    pub is_last: bool,
}

/// Everything the result screen shows once revealed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultSummary {
    /// Score label, e.g. `3/10`
    pub score: String,
    /// Percentage of correct answers
    pub percentage: f64,
    /// Grade tier
    pub grade: Grade,
    /// Grade message
    pub message: &'static str,
}

impl From<Score> for ResultSummary {
    fn from(score: Score) -> Self {
        Self {
            score: score.label(),
            percentage: score.percentage(),
            grade: score.grade(),
            message: score.grade().message(),
        }
    }
}

/// Update messages sent while a run progresses
#[derive(Debug, Serialize, Clone, PartialEq)]
pub enum UpdateMessage {
    /// A question to render
    QuestionAnnouncement(QuestionView),
    /// Feedback for the answer just given
    Feedback(Feedback),
    /// The result screen is up but the score is still hidden
    ResultPending,
    /// Reveal the score and grade
    ResultReveal(ResultSummary),
}

/// Full snapshot of the quiz for a front end redrawing from scratch
#[skip_serializing_none]
#[derive(Debug, Serialize, Clone, PartialEq)]
pub enum SyncMessage {
    /// Title screen, with the question count label once loaded
    Title {
        /// Label such as `全10問`
        label: Option<String>,
    },
    /// A question awaiting an answer
    Question(QuestionView),
    /// Feedback for the current question
    Feedback(Feedback),
    /// Result screen; `summary` stays empty until revealed
    Result {
        /// Score and grade, once revealed
        summary: Option<ResultSummary>,
    },
}

/// Alarm messages for timed events of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlarmMessage {
    /// Reveal the score of the run identified by `generation`
    RevealResult {
        /// Run the alarm was scheduled for
        generation: Generation,
    },
}

/// Rejected engine operations
///
/// None of these change the session state.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Error {
    /// The store holds no questions, so no run can take place
    #[error("no questions are loaded")]
    NoQuestions,
    /// The operation does not apply to the current phase
    #[error("{operation} is not allowed in phase {phase}")]
    InvalidTransition {
        /// Name of the rejected operation
        operation: &'static str,
        /// Phase the engine was in
        phase: Phase,
    },
    /// The selected option does not exist
    #[error("option {0} does not exist")]
    OptionOutOfRange(usize),
    /// There is no question after this index
    #[error("question {0} is the last one")]
    NoNextQuestion(usize),
    /// The result can only be computed from the last question
    #[error("question {0} is not the last one")]
    NotLastQuestion(usize),
}

/// The quiz state machine
#[derive(Debug, Clone, Default)]
pub struct Quiz {
    session: Session,
    phase: Phase,
    feedback: Option<Feedback>,
    score: Option<Score>,
    revealed: bool,
}

impl Quiz {
    /// Current session state
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether the score of the current run has been revealed
    pub fn revealed(&self) -> bool {
        self.revealed
    }

    fn expect_phase(&self, operation: &'static str, phase: Phase) -> Result<(), Error> {
        if self.phase == phase {
            Ok(())
        } else {
            Err(Error::InvalidTransition {
                operation,
                phase: self.phase,
            })
        }
    }

    fn question_view(&self, store: &QuestionStore) -> Result<QuestionView, Error> {
        let question = store.get(self.session.index).ok_or(Error::NoQuestions)?;
        Ok(QuestionView {
            index: self.session.index,
            count: store.len(),
            label: format!("問{}", self.session.index + 1),
            question: question.question.clone(),
            options: store.options(self.session.index),
        })
    }

    /// Starts a run in `mode` from the title screen
    ///
    /// Resets the pointer and the counter and issues a new generation.
    ///
    /// # Errors
    ///
    /// [`Error::NoQuestions`] when the store is not ready, and
    /// [`Error::InvalidTransition`] outside of the title phase.
    pub fn start(&mut self, mode: Mode, store: &QuestionStore) -> Result<QuestionView, Error> {
        self.expect_phase("start", Phase::Title)?;
        if !store.is_ready() {
            return Err(Error::NoQuestions);
        }

        self.session = Session {
            mode,
            index: 0,
            correct: 0,
            generation: self.session.generation.next(),
        };
        self.phase = Phase::InQuestion;
        self.feedback = None;
        self.score = None;
        self.revealed = false;

        self.question_view(store)
    }

    /// Judges the option at `selected` for the current question
    ///
    /// # Errors
    ///
    /// [`Error::InvalidTransition`] unless a question is awaiting an answer,
    /// [`Error::OptionOutOfRange`] for an index past the options.
    pub fn submit_answer(
        &mut self,
        selected: usize,
        store: &QuestionStore,
    ) -> Result<Feedback, Error> {
        self.expect_phase("submit_answer", Phase::InQuestion)?;
        let question = store.get(self.session.index).ok_or(Error::NoQuestions)?;
        if selected >= question.options.len() {
            return Err(Error::OptionOutOfRange(selected));
        }

        let correct = question.is_correct(selected);
        if correct {
            self.session.correct += 1;
        }

        let feedback = Feedback {
            correct,
            message: if correct {
                feedback::CORRECT
            } else {
                feedback::INCORRECT
            },
            correct_answer: question.correct_option().to_owned(),
            explanation: question.explanation.clone(),
            is_last: self.session.index + 1 == store.len(),
        };

        self.phase = Phase::Feedback;
        self.feedback = Some(feedback.clone());

        Ok(feedback)
    }

    /// Moves from feedback to the next question
    ///
    /// # Errors
    ///
    /// [`Error::InvalidTransition`] outside of feedback and
    /// [`Error::NoNextQuestion`] on the last question.
    pub fn advance(&mut self, store: &QuestionStore) -> Result<QuestionView, Error> {
        self.expect_phase("advance", Phase::Feedback)?;
        if self.session.index + 1 >= store.len() {
            return Err(Error::NoNextQuestion(self.session.index));
        }

        self.session.index += 1;
        self.phase = Phase::InQuestion;
        self.feedback = None;

        self.question_view(store)
    }

    /// Ends the run after feedback on the last question
    ///
    /// The pointer moves to the store length, the only time it leaves the
    /// valid index range. The score stays hidden until [`Quiz::reveal`].
    ///
    /// # Errors
    ///
    /// [`Error::InvalidTransition`] outside of feedback and
    /// [`Error::NotLastQuestion`] when questions remain.
    pub fn finish(&mut self, store: &QuestionStore) -> Result<Score, Error> {
        self.expect_phase("finish", Phase::Feedback)?;
        if self.session.index + 1 != store.len() {
            return Err(Error::NotLastQuestion(self.session.index));
        }
        let score = Score::new(self.session.correct, store.len()).ok_or(Error::NoQuestions)?;

        self.session.index = store.len();
        self.phase = Phase::Result;
        self.feedback = None;
        self.score = Some(score);
        self.revealed = false;

        Ok(score)
    }

    /// Reveals the score of run `generation`
    ///
    /// Returns the score the first time it is called for the current run on
    /// the result screen and `None` on every other call.
    pub fn reveal(&mut self, generation: Generation) -> Option<Score> {
        if generation != self.session.generation || self.phase != Phase::Result || self.revealed {
            return None;
        }
        self.revealed = true;
        self.score
    }

    /// Returns to the title screen from any phase
    ///
    /// Issues a new generation so callbacks of the abandoned run go stale.
    pub fn restart(&mut self) {
        self.session = Session {
            mode: self.session.mode,
            index: 0,
            correct: 0,
            generation: self.session.generation.next(),
        };
        self.phase = Phase::Title;
        self.feedback = None;
        self.score = None;
        self.revealed = false;
    }

    /// Snapshot of what the current phase shows
    pub fn state_message(&self, store: &QuestionStore) -> SyncMessage {
        match self.phase {
            Phase::Title => SyncMessage::Title {
                label: store.count_label(),
            },
            Phase::InQuestion => match self.question_view(store) {
                Ok(view) => SyncMessage::Question(view),
                Err(_) => SyncMessage::Title {
                    label: store.count_label(),
                },
            },
            Phase::Feedback => match &self.feedback {
                Some(feedback) => SyncMessage::Feedback(feedback.clone()),
                None => SyncMessage::Title {
                    label: store.count_label(),
                },
            },
            Phase::Result => SyncMessage::Result {
                summary: self
                    .score
                    .filter(|_| self.revealed)
                    .map(ResultSummary::from),
            },
        }
    }
}
