//! Question store
//!
//! Holds the ordered, immutable sequence of questions loaded once at startup.
//! The host fetches the question document however it likes and hands the
//! outcome over; the store parses and validates it and remembers whether the
//! load succeeded, so the controller can refuse to start a quiz without
//! questions.

use garde::Validate;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::question;

/// A single multiple-choice question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Question {
    /// The prompt shown above the options
    #[garde(length(chars, min = question::MIN_PROMPT_LENGTH, max = question::MAX_PROMPT_LENGTH))]
    pub question: String,
    /// The answer options, always exactly [`question::OPTION_COUNT`] of them
    #[garde(
        length(equal = question::OPTION_COUNT),
        inner(length(chars, max = question::MAX_OPTION_LENGTH))
    )]
    pub options: Vec<String>,
    /// Zero-based index of the correct option
    #[garde(range(max = question::OPTION_COUNT - 1))]
    pub answer: usize,
    /// Explanation shown on the feedback screen
    #[garde(length(chars, max = question::MAX_EXPLANATION_LENGTH))]
    pub explanation: String,
}

impl Question {
    /// Whether `selected` is the index of the correct option
    pub fn is_correct(&self, selected: usize) -> bool {
        selected == self.answer
    }

    /// Text of the correct option
    pub fn correct_option(&self) -> &str {
        self.options
            .get(self.answer)
            .map_or("", std::string::String::as_str)
    }
}

/// Where the store is in its one-shot load
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub enum LoadStatus {
    /// The host has not reported the fetch outcome yet
    #[default]
    Pending,
    /// Questions were parsed and validated
    Loaded,
    /// Fetching or parsing failed; only a reload recovers
    Failed(String),
}

/// Errors that can occur while loading the question document
#[derive(Error, Debug)]
pub enum Error {
    /// The host could not fetch the document
    #[error("question document could not be fetched: {0}")]
    Fetch(String),
    /// The document is not a JSON array of questions
    #[error("question document could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),
    /// A question breaks one of the document limits
    #[error("question {index} is invalid: {report}")]
    Invalid {
        /// Zero-based position of the offending question
        index: usize,
        /// What exactly is wrong with it
        report: garde::Report,
    },
    /// The document holds more questions than allowed
    #[error("question document holds {0} questions, more than allowed")]
    TooMany(usize),
    /// The document holds no questions at all
    #[error("question document holds no questions")]
    Empty,
}

/// Update messages describing the load outcome
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub enum UpdateMessage {
    /// Questions are available; carries the title label, e.g. `全10問`
    QuestionCount {
        /// Number of loaded questions
        count: usize,
        /// Label to show on the title screen
        label: String,
    },
    /// Questions could not be loaded
    LoadFailed(String),
}

/// The ordered sequence of questions for the whole page lifetime
#[derive(Debug, Clone, Default)]
pub struct QuestionStore {
    questions: Vec<Question>,
    status: LoadStatus,
}

impl QuestionStore {
    /// Parses and validates a question document
    ///
    /// # Errors
    ///
    /// Returns an error when the document is malformed, any question is
    /// invalid, or the document is empty or too long.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let questions: Vec<Question> = serde_json::from_str(json)?;
        Self::from_questions(questions)
    }

    /// Builds a store from already deserialized questions
    ///
    /// # Errors
    ///
    /// Same as [`QuestionStore::from_json`] minus parsing.
    pub fn from_questions(questions: Vec<Question>) -> Result<Self, Error> {
        if questions.is_empty() {
            return Err(Error::Empty);
        }
        if questions.len() > question::MAX_QUESTION_COUNT {
            return Err(Error::TooMany(questions.len()));
        }

        questions
            .iter()
            .enumerate()
            .try_for_each(|(index, q)| {
                q.validate().map_err(|report| Error::Invalid { index, report })
            })?;

        Ok(Self {
            questions,
            status: LoadStatus::Loaded,
        })
    }

    /// A store that failed to load and will never hold questions
    pub fn failed(error: &Error) -> Self {
        Self {
            questions: Vec::new(),
            status: LoadStatus::Failed(error.to_string()),
        }
    }

    /// Current load status
    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    /// Whether a quiz can be started from this store
    pub fn is_ready(&self) -> bool {
        matches!(self.status, LoadStatus::Loaded) && !self.questions.is_empty()
    }

    /// Returns the question at `index`, if any
    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    /// Number of questions
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Whether the store holds no questions
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Label for the title screen, `None` unless loaded
    pub fn count_label(&self) -> Option<String> {
        self.is_ready().then(|| format!("全{}問", self.len()))
    }

    /// Message describing the load outcome, `None` while still pending
    pub fn update_message(&self) -> Option<UpdateMessage> {
        match &self.status {
            LoadStatus::Pending => None,
            LoadStatus::Loaded => Some(UpdateMessage::QuestionCount {
                count: self.len(),
                label: self.count_label().unwrap_or_default(),
            }),
            LoadStatus::Failed(reason) => Some(UpdateMessage::LoadFailed(reason.clone())),
        }
    }

    /// Option texts of the question at `index`
    pub fn options(&self, index: usize) -> Vec<String> {
        self.get(index)
            .map(|q| q.options.iter().cloned().collect_vec())
            .unwrap_or_default()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sample_question(n: usize, answer: usize) -> Question {
        Question {
            question: format!("Question {n}"),
            options: (0..question::OPTION_COUNT)
                .map(|i| format!("Option {n}-{i}"))
                .collect(),
            answer,
            explanation: format!("Explanation {n}"),
        }
    }

    pub(crate) fn sample_store(count: usize) -> QuestionStore {
        QuestionStore::from_questions((0..count).map(|n| sample_question(n, n % 4)).collect())
            .unwrap()
    }

    #[test]
    fn test_from_json_valid_document() {
        let json = r#"[
            {"question": "CPUの略は？", "options": ["a", "b", "c", "d"], "answer": 2, "explanation": "中央処理装置"},
            {"question": "1バイトは何ビット？", "options": ["4", "8", "16", "32"], "answer": 1, "explanation": "8ビット"}
        ]"#;

        let store = QuestionStore::from_json(json).unwrap();

        assert_eq!(store.len(), 2);
        assert!(store.is_ready());
        assert_eq!(store.status(), &LoadStatus::Loaded);
        assert_eq!(store.get(1).unwrap().correct_option(), "8");
        assert_eq!(store.count_label().as_deref(), Some("全2問"));
    }

    #[test]
    fn test_from_json_malformed() {
        assert!(matches!(
            QuestionStore::from_json("{\"question\":"),
            Err(Error::Parse(_))
        ));
    }

    #[test]
    fn test_from_json_empty_array() {
        assert!(matches!(QuestionStore::from_json("[]"), Err(Error::Empty)));
    }

    #[test]
    fn test_answer_index_out_of_range() {
        let mut q = sample_question(0, 0);
        q.answer = 4;

        let err = QuestionStore::from_questions(vec![sample_question(1, 1), q]).unwrap_err();
        assert!(matches!(err, Error::Invalid { index: 1, .. }));
    }

    #[test]
    fn test_wrong_option_count() {
        let mut q = sample_question(0, 0);
        q.options.pop();

        assert!(matches!(
            QuestionStore::from_questions(vec![q]),
            Err(Error::Invalid { index: 0, .. })
        ));
    }

    #[test]
    fn test_empty_prompt_rejected() {
        let mut q = sample_question(0, 0);
        q.question = String::new();

        assert!(QuestionStore::from_questions(vec![q]).is_err());
    }

    #[test]
    fn test_too_many_questions() {
        let questions = (0..=question::MAX_QUESTION_COUNT)
            .map(|n| sample_question(n, 0))
            .collect();

        assert!(matches!(
            QuestionStore::from_questions(questions),
            Err(Error::TooMany(_))
        ));
    }

    #[test]
    fn test_failed_store_is_not_ready() {
        let store = QuestionStore::failed(&Error::Fetch("404".to_string()));

        assert!(!store.is_ready());
        assert!(store.is_empty());
        assert!(store.count_label().is_none());
        assert_eq!(
            store.update_message(),
            Some(UpdateMessage::LoadFailed(
                "question document could not be fetched: 404".to_string()
            ))
        );
    }

    #[test]
    fn test_pending_store_has_no_message() {
        let store = QuestionStore::default();

        assert!(!store.is_ready());
        assert!(store.update_message().is_none());
    }

    #[test]
    fn test_is_correct() {
        let q = sample_question(0, 3);

        assert!(q.is_correct(3));
        assert!(!q.is_correct(0));
        assert_eq!(q.correct_option(), "Option 0-3");
    }
}
