//! Generic `Drive` trait for the robot's drive base.
//!
//! The drive base follows the road lines between intersections, so the only
//! motions the rest of the system asks for are "advance one segment" and
//! "turn by a multiple of 90°".

use gridloc_types::GridError;

/// How the robot rotates during a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PivotMode {
    /// Counter-rotate both wheels and spin around the robot's centre.
    InPlace,
    /// Hold the left wheel and swing around it.
    LeftWheel,
    /// Hold the right wheel and swing around it.
    RightWheel,
}

/// The robot's drive base.
pub trait Drive: Send {
    /// Stable identifier, e.g. `"drive_base"`.
    fn id(&self) -> &str;

    /// Drive forward to the next intersection, correcting back onto the road
    /// if drift is detected.
    ///
    /// At the edge of the grid the robot reverses and drives one segment back
    /// instead.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::HardwareFault`] if the motion cannot be completed.
    fn advance_segment(&mut self) -> Result<(), GridError>;

    /// Rotate by `degrees` (positive = clockwise / right).
    ///
    /// # Errors
    ///
    /// Returns [`GridError::HardwareFault`] if the turn cannot be applied.
    fn turn(&mut self, degrees: i32, pivot: PivotMode) -> Result<(), GridError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal drive that integrates commanded rotation, used only for tests.
    struct MockDrive {
        id: String,
        segments: u32,
        rotation: i32,
    }

    impl Drive for MockDrive {
        fn id(&self) -> &str {
            &self.id
        }

        fn advance_segment(&mut self) -> Result<(), GridError> {
            self.segments += 1;
            Ok(())
        }

        fn turn(&mut self, degrees: i32, _pivot: PivotMode) -> Result<(), GridError> {
            self.rotation = (self.rotation + degrees).rem_euclid(360);
            Ok(())
        }
    }

    #[test]
    fn mock_drive_accumulates_motion() {
        let mut drive = MockDrive {
            id: "drive_base".to_string(),
            segments: 0,
            rotation: 0,
        };
        assert_eq!(drive.id(), "drive_base");

        drive.advance_segment().unwrap();
        drive.turn(90, PivotMode::InPlace).unwrap();
        drive.turn(180, PivotMode::LeftWheel).unwrap();
        drive.advance_segment().unwrap();

        assert_eq!(drive.segments, 2);
        assert_eq!(drive.rotation, 270);
    }
}
