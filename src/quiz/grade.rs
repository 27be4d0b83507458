//! Final score and grade messages

use serde::Serialize;

use crate::constants::grade;

/// One of the five grade tiers
///
/// Tiers are chosen with strictly-greater comparisons, so a score sitting
/// exactly on a threshold falls into the tier below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Grade {
    /// More than 80 %
    Master,
    /// More than 60 %, at most 80 %
    Strong,
    /// More than 40 %, at most 60 %
    Standard,
    /// More than 20 %, at most 40 %
    Developing,
    /// 20 % or less
    Foundation,
}

/// Tiers ordered from the highest threshold down
const TIERS: [(usize, Grade); 4] = [
    (grade::MASTER_THRESHOLD, Grade::Master),
    (grade::STRONG_THRESHOLD, Grade::Strong),
    (grade::STANDARD_THRESHOLD, Grade::Standard),
    (grade::DEVELOPING_THRESHOLD, Grade::Developing),
];

impl Grade {
    /// Grade for `correct` out of `total`, compared without rounding
    ///
    /// `correct / total * 100 > threshold` is evaluated as
    /// `correct * 100 > threshold * total`.
    fn from_ratio(correct: usize, total: usize) -> Self {
        TIERS
            .iter()
            .find(|(threshold, _)| correct * 100 > threshold * total)
            .map_or(Self::Foundation, |(_, grade)| *grade)
    }

    /// The message shown on the result screen
    pub fn message(self) -> &'static str {
        match self {
            Self::Master => grade::MASTER_MESSAGE,
            Self::Strong => grade::STRONG_MESSAGE,
            Self::Standard => grade::STANDARD_MESSAGE,
            Self::Developing => grade::DEVELOPING_MESSAGE,
            Self::Foundation => grade::FOUNDATION_MESSAGE,
        }
    }
}

/// Correct answers out of a non-zero number of questions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Score {
    correct: usize,
    total: usize,
}

impl Score {
    /// Creates a score, `None` when there were no questions
    pub fn new(correct: usize, total: usize) -> Option<Self> {
        (total > 0).then(|| Self {
            correct: correct.min(total),
            total,
        })
    }

    /// Number of correct answers
    pub fn correct(&self) -> usize {
        self.correct
    }

    /// Number of questions
    pub fn total(&self) -> usize {
        self.total
    }

    /// Percentage of correct answers
    pub fn percentage(&self) -> f64 {
        (self.correct * 100) as f64 / self.total as f64
    }

    /// Grade tier of this score
    pub fn grade(&self) -> Grade {
        Grade::from_ratio(self.correct, self.total)
    }

    /// Score as shown on the result screen, e.g. `3/10`
    pub fn label(&self) -> String {
        format!("{}/{}", self.correct, self.total)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds_are_strict() {
        assert_eq!(Grade::from_ratio(100, 100), Grade::Master);
        assert_eq!(Grade::from_ratio(161, 200), Grade::Master);
        assert_eq!(Grade::from_ratio(80, 100), Grade::Strong);
        assert_eq!(Grade::from_ratio(60, 100), Grade::Standard);
        assert_eq!(Grade::from_ratio(40, 100), Grade::Developing);
        assert_eq!(Grade::from_ratio(20, 100), Grade::Foundation);
        assert_eq!(Grade::from_ratio(0, 100), Grade::Foundation);
    }

    #[test]
    fn test_ratio_on_threshold_falls_below() {
        assert_eq!(Score::new(4, 5).unwrap().grade(), Grade::Strong);
        assert_eq!(Score::new(3, 5).unwrap().grade(), Grade::Standard);
        assert_eq!(Score::new(2, 5).unwrap().grade(), Grade::Developing);
        assert_eq!(Score::new(1, 5).unwrap().grade(), Grade::Foundation);
        assert_eq!(Score::new(5, 5).unwrap().grade(), Grade::Master);
    }

    #[test]
    fn test_ratio_and_percentage_agree() {
        for total in 1..=30 {
            for correct in 0..=total {
                let percentage = Score::new(correct, total).unwrap().percentage();
                let expected = TIERS
                    .iter()
                    .find(|(threshold, _)| percentage > *threshold as f64)
                    .map_or(Grade::Foundation, |(_, grade)| *grade);
                assert_eq!(Grade::from_ratio(correct, total), expected);
            }
        }
    }

    #[test]
    fn test_thirty_percent_is_fourth_tier() {
        let score = Score::new(3, 10).unwrap();

        assert!((score.percentage() - 30.0).abs() < f64::EPSILON);
        assert_eq!(score.grade(), Grade::Developing);
        assert_eq!(score.grade().message(), grade::DEVELOPING_MESSAGE);
        assert_eq!(score.label(), "3/10");
    }

    #[test]
    fn test_zero_total_has_no_score() {
        assert!(Score::new(0, 0).is_none());
    }

    #[test]
    fn test_messages_are_distinct() {
        let messages = [
            Grade::Master,
            Grade::Strong,
            Grade::Standard,
            Grade::Developing,
            Grade::Foundation,
        ]
        .map(Grade::message);

        for (i, a) in messages.iter().enumerate() {
            for b in &messages[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
