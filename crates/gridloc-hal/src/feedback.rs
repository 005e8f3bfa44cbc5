//! Generic `Feedback` trait for operator cues (beeps, LEDs, …).

use gridloc_types::GridError;

/// A state change worth signalling to a human operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// The filter is confident about the robot's pose.
    Converged,
    /// The robot reached the destination.
    Complete,
    /// The run stopped without completing.
    Failed,
}

/// A device that can emit audible or visual cues.
pub trait Feedback: Send {
    /// Signal `cue` to the operator.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::HardwareFault`] if the device is unavailable.
    /// Callers treat cues as best-effort.
    fn cue(&mut self, cue: Cue) -> Result<(), GridError>;
}
