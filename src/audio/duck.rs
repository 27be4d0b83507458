//! Ducking state machine
//!
//! One effect at a time pushes the music out of the way:
//! `Idle → Ducking → EffectPlaying → Restoring → Idle`. Each state that is
//! not `Idle` has an alarm scheduled that moves it on, so the machine never
//! waits on a media event alone.

use serde::Serialize;

use super::channel::{Effect, Ticket};

/// Where the current duck operation stands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum DuckState {
    /// Music is at the user level and no effect is pending
    #[default]
    Idle,
    /// Music is fading down before `effect` starts
    Ducking {
        /// Effect waiting for the fade to finish
        effect: Effect,
        /// Ticket of the operation
        ticket: Ticket,
        /// Fade steps already applied
        step: u32,
    },
    /// `effect` is playing with the music lowered or paused
    EffectPlaying {
        /// Effect being played
        effect: Effect,
        /// Ticket of the operation
        ticket: Ticket,
    },
    /// Music is fading back up to the user level
    Restoring {
        /// Ticket of the operation
        ticket: Ticket,
        /// Fade steps already applied
        step: u32,
    },
}

impl DuckState {
    /// Ticket of the operation in progress, `None` when idle
    pub fn ticket(&self) -> Option<Ticket> {
        match self {
            Self::Idle => None,
            Self::Ducking { ticket, .. }
            | Self::EffectPlaying { ticket, .. }
            | Self::Restoring { ticket, .. } => Some(*ticket),
        }
    }

    /// Whether no operation is in progress
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// Gain after `step` of `steps` on a linear fade from `from` to `to`
///
/// The last step lands exactly on `to`.
pub fn fade_gain(from: f32, to: f32, step: u32, steps: u32) -> f32 {
    if step >= steps {
        to
    } else {
        from + (to - from) * step as f32 / steps as f32
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::session::Generation;

    #[test]
    fn test_fade_gain_endpoints() {
        assert!((fade_gain(1.0, 0.2, 0, 4) - 1.0).abs() < f32::EPSILON);
        assert!((fade_gain(1.0, 0.2, 2, 4) - 0.6).abs() < 1e-6);
        assert!((fade_gain(1.0, 0.2, 4, 4) - 0.2).abs() < f32::EPSILON);
        assert!((fade_gain(0.2, 1.0, 9, 4) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_fade_gain_is_monotonic() {
        let mut previous = 1.0;
        for step in 1..=8 {
            let gain = fade_gain(1.0, 0.0, step, 8);
            assert!(gain < previous);
            previous = gain;
        }
    }

    #[test]
    fn test_ticket_of_state() {
        let ticket = Ticket {
            generation: Generation::default(),
            sequence: 3,
        };

        assert_eq!(DuckState::Idle.ticket(), None);
        assert!(DuckState::Idle.is_idle());
        assert_eq!(
            DuckState::Restoring { ticket, step: 1 }.ticket(),
            Some(ticket)
        );
        assert!(
            !DuckState::EffectPlaying {
                effect: Effect::Correct,
                ticket
            }
            .is_idle()
        );
    }
}
