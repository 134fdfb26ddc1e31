use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Result, SquatError};

pub const ENTER_THRESHOLD: u8 = 60;
pub const EXIT_THRESHOLD: u8 = 20;
pub const VALID_REP_THRESHOLD: u8 = 60;

/// Depth thresholds driving the standing/squatting hysteresis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepThresholds {
    /// Depth strictly above which a standing user is considered squatting.
    pub enter: u8,
    /// Depth strictly below which a squatting user is considered standing.
    pub exit: u8,
    /// Peak depth a squat must reach for the rep to count.
    pub valid: u8,
}

impl Default for RepThresholds {
    fn default() -> Self {
        Self {
            enter: ENTER_THRESHOLD,
            exit: EXIT_THRESHOLD,
            valid: VALID_REP_THRESHOLD,
        }
    }
}

impl RepThresholds {
    pub fn validate(&self) -> Result<()> {
        if self.enter > 100 || self.exit > 100 || self.valid > 100 {
            return Err(SquatError::config(format!(
                "thresholds must not exceed 100 (enter {}, exit {}, valid {})",
                self.enter, self.exit, self.valid
            )));
        }

        if self.exit >= self.enter {
            return Err(SquatError::config(format!(
                "exit threshold {} must be below enter threshold {}",
                self.exit, self.enter
            )));
        }

        Ok(())
    }
}

/// Everything the counter remembers between frames.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepCounterState {
    pub rep_count: u32,
    pub is_squatting: bool,
    pub max_depth_this_rep: u8,
}

/// What a single frame did to the counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepStep {
    pub state: RepCounterState,
    /// The user stood back up on this frame.
    pub rep_completed: bool,
    /// The completed rep was deep enough to be counted.
    pub rep_counted: bool,
}

impl RepCounterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one frame's depth and returns the resulting state.
    pub fn advance(self, depth: u8, thresholds: &RepThresholds) -> Self {
        self.step(depth, thresholds).state
    }

    /// Same as [`advance`](Self::advance), also reporting rep completion.
    pub fn step(self, depth: u8, thresholds: &RepThresholds) -> RepStep {
        let mut next = self;
        let mut rep_completed = false;
        let mut rep_counted = false;

        if !next.is_squatting {
            if depth > thresholds.enter {
                next.is_squatting = true;
                next.max_depth_this_rep = depth;
            }
        } else {
            next.max_depth_this_rep = next.max_depth_this_rep.max(depth);

            if depth < thresholds.exit {
                rep_completed = true;
                if next.max_depth_this_rep >= thresholds.valid {
                    next.rep_count += 1;
                    rep_counted = true;
                }
                next.is_squatting = false;
                next.max_depth_this_rep = 0;
            }
        }

        RepStep {
            state: next,
            rep_completed,
            rep_counted,
        }
    }
}

/// Display classification of the current depth. Has no influence on the
/// counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SquatStatus {
    Ready,
    Descending,
    KeepGoing,
    DepthReached,
}

/// Visual tone for status indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusTone {
    Ready,
    Squatting,
    Success,
}

impl StatusTone {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::Squatting => "squatting",
            Self::Success => "success",
        }
    }
}

impl SquatStatus {
    pub fn classify(depth: u8) -> Self {
        match depth {
            0..=29 => Self::Ready,
            30..=49 => Self::Descending,
            50..=79 => Self::KeepGoing,
            _ => Self::DepthReached,
        }
    }

    /// Headline shown in the status indicator.
    pub fn indicator(self) -> &'static str {
        match self {
            Self::Ready => "Standing",
            Self::Descending => "Going Down...",
            Self::KeepGoing => "Keep Going...",
            Self::DepthReached => "DEPTH REACHED! ✓",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Ready => "Ready",
            Self::Descending | Self::KeepGoing => "Squatting",
            Self::DepthReached => "Target Depth!",
        }
    }

    pub fn tone(self) -> StatusTone {
        match self {
            Self::Ready => StatusTone::Ready,
            Self::Descending | Self::KeepGoing => StatusTone::Squatting,
            Self::DepthReached => StatusTone::Success,
        }
    }
}

impl fmt::Display for SquatStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.indicator())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(depths: &[u8]) -> u32 {
        let thresholds = RepThresholds::default();
        depths
            .iter()
            .fold(RepCounterState::new(), |state, &depth| {
                state.advance(depth, &thresholds)
            })
            .rep_count
    }

    #[test]
    fn counts_reference_sequences() {
        assert_eq!(count(&[10, 10, 70, 90, 70, 10]), 1);
        assert_eq!(count(&[10, 65, 45, 10]), 1);
        assert_eq!(count(&[10, 65, 25, 65, 10]), 1);
        assert_eq!(count(&[10, 40, 10]), 0);
        assert_eq!(count(&[10, 70, 10, 70, 10]), 2);
    }

    #[test]
    fn enter_threshold_is_strict() {
        assert_eq!(count(&[60, 10]), 0);
        assert_eq!(count(&[61, 10]), 1);
    }

    #[test]
    fn exit_threshold_is_strict() {
        assert_eq!(count(&[70, 20]), 0);
        assert_eq!(count(&[70, 20, 19]), 1);
    }

    #[test]
    fn tracks_peak_and_resets_on_exit() {
        let thresholds = RepThresholds::default();
        let state = RepCounterState::new().advance(70, &thresholds);
        assert!(state.is_squatting);
        assert_eq!(state.max_depth_this_rep, 70);

        let state = state.advance(95, &thresholds).advance(40, &thresholds);
        assert_eq!(state.max_depth_this_rep, 95);

        let step = state.step(5, &thresholds);
        assert!(step.rep_completed);
        assert!(step.rep_counted);
        assert_eq!(
            step.state,
            RepCounterState {
                rep_count: 1,
                is_squatting: false,
                max_depth_this_rep: 0,
            }
        );
    }

    #[test]
    fn shallow_rep_completes_without_counting() {
        let thresholds = RepThresholds {
            enter: 40,
            exit: 20,
            valid: 60,
        };
        let state = RepCounterState::new().advance(50, &thresholds);
        let step = state.step(10, &thresholds);

        assert!(step.rep_completed);
        assert!(!step.rep_counted);
        assert_eq!(step.state.rep_count, 0);
        assert_eq!(step.state.max_depth_this_rep, 0);
    }

    #[test]
    fn rep_count_never_decreases() {
        let thresholds = RepThresholds::default();
        let depths = [0, 100, 0, 55, 61, 19, 20, 80, 59, 21, 18, 100, 100, 0, 3];
        let mut state = RepCounterState::new();
        let mut previous = 0;

        for depth in depths {
            state = state.advance(depth, &thresholds);
            assert!(state.rep_count >= previous);
            previous = state.rep_count;
        }

        assert_eq!(state.rep_count, 4);
    }

    #[test]
    fn classifies_status_bands() {
        assert_eq!(SquatStatus::classify(0), SquatStatus::Ready);
        assert_eq!(SquatStatus::classify(29), SquatStatus::Ready);
        assert_eq!(SquatStatus::classify(30), SquatStatus::Descending);
        assert_eq!(SquatStatus::classify(49), SquatStatus::Descending);
        assert_eq!(SquatStatus::classify(50), SquatStatus::KeepGoing);
        assert_eq!(SquatStatus::classify(79), SquatStatus::KeepGoing);
        assert_eq!(SquatStatus::classify(80), SquatStatus::DepthReached);
        assert_eq!(SquatStatus::classify(100), SquatStatus::DepthReached);

        assert_eq!(SquatStatus::KeepGoing.label(), "Squatting");
        assert_eq!(SquatStatus::DepthReached.tone(), StatusTone::Success);
        assert_eq!(SquatStatus::Descending.tone().as_str(), "squatting");
        assert_eq!(SquatStatus::Ready.to_string(), "Standing");
    }

    #[test]
    fn validates_thresholds() {
        assert!(RepThresholds::default().validate().is_ok());

        let inverted = RepThresholds {
            enter: 20,
            exit: 60,
            valid: 60,
        };
        assert!(inverted.validate().is_err());

        let out_of_range = RepThresholds {
            enter: 120,
            ..Default::default()
        };
        assert!(out_of_range.validate().is_err());
    }
}
