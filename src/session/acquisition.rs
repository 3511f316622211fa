// src/session/acquisition.rs

use core::fmt::Debug;

use crate::common::error::Sht3xError;
use crate::common::types::{Mode, Repeatability, SampleRate};

/// The single-shot/periodic mode state machine.
///
/// Pure bookkeeping: the session consults it *before* touching the bus and
/// commits a transition only *after* the device accepted the corresponding
/// command. The guard methods never mutate and the commit methods are
/// infallible, so a rejected or failed transition leaves no partial state.
///
/// The sampling rate and repeatability are carried inside the state they
/// belong to, so "Periodic without a rate" is unrepresentable.
#[derive(Debug, Default)]
pub struct AcquisitionController {
    state: State,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
enum State {
    #[default]
    Idle,
    SingleShotPending {
        repeatability: Repeatability,
    },
    Periodic {
        rate: SampleRate,
        repeatability: Repeatability,
    },
}

impl AcquisitionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current mode.
    pub fn mode(&self) -> Mode {
        match self.state {
            State::Idle => Mode::Idle,
            State::SingleShotPending { .. } => Mode::SingleShotPending,
            State::Periodic { .. } => Mode::Periodic,
        }
    }

    /// Sampling rate frozen by periodic mode, if active.
    pub fn sample_rate(&self) -> Option<SampleRate> {
        match self.state {
            State::Periodic { rate, .. } => Some(rate),
            _ => None,
        }
    }

    /// Repeatability frozen by the active mode, if any.
    pub fn repeatability(&self) -> Option<Repeatability> {
        match self.state {
            State::SingleShotPending { repeatability } | State::Periodic { repeatability, .. } => {
                Some(repeatability)
            }
            State::Idle => None,
        }
    }

    /// Guard: fails with `InvalidState` unless the current mode is
    /// `required`. Never mutates.
    pub fn require<E: Debug>(&self, required: Mode) -> Result<(), Sht3xError<E>> {
        if self.mode() == required {
            Ok(())
        } else {
            Err(Sht3xError::InvalidState { current: self.mode() })
        }
    }

    /// Guard: fails unless periodic mode is active; returns the frozen rate.
    pub fn require_periodic<E: Debug>(&self) -> Result<SampleRate, Sht3xError<E>> {
        match self.state {
            State::Periodic { rate, .. } => Ok(rate),
            _ => Err(Sht3xError::InvalidState { current: self.mode() }),
        }
    }

    /// Commit: Idle -> SingleShotPending.
    pub fn begin_single_shot(&mut self, repeatability: Repeatability) {
        self.state = State::SingleShotPending { repeatability };
    }

    /// Commit: SingleShotPending -> Idle. Runs on success *and* failure of
    /// the conversion, so the transient state never outlives one call.
    pub fn finish_single_shot(&mut self) {
        self.state = State::Idle;
    }

    /// Commit: Idle -> Periodic with freshly specified parameters.
    pub fn enter_periodic(&mut self, rate: SampleRate, repeatability: Repeatability) {
        self.state = State::Periodic { rate, repeatability };
    }

    /// Commit: Periodic -> Idle.
    pub fn leave_periodic(&mut self) {
        self.state = State::Idle;
    }

    /// Unconditional escape hatch: any state -> Idle. Backs the soft reset.
    pub fn reset(&mut self) {
        self.state = State::Idle;
    }
}
