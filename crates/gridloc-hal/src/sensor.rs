//! Generic `ColorSensor` trait for the downward-facing color sensor.

use gridloc_types::{Color, Diagonal, GridCellObservation, GridError};

/// A color sensor mounted on the robot.
///
/// Implementations are expected to filter raw samples themselves (see
/// [`majority_vote`][crate::vote::majority_vote]) and return one settled
/// reading per call.
pub trait ColorSensor: Send {
    /// Stable identifier for this sensor, e.g. `"color_down"`.
    fn id(&self) -> &str;

    /// Read the color directly under the sensor.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::HardwareFault`] if the sensor cannot be read.
    fn sample_color(&mut self) -> Result<Color, GridError>;

    /// Reorient to inspect one diagonal neighbour of the current intersection
    /// and return its color.
    ///
    /// `direction` is relative to the robot: [`Diagonal::FRONT_RIGHT`],
    /// [`Diagonal::BACK_RIGHT`], [`Diagonal::BACK_LEFT`] or
    /// [`Diagonal::FRONT_LEFT`].
    ///
    /// # Errors
    ///
    /// Returns [`GridError::HardwareFault`] if the scan cannot be completed.
    fn scan_diagonal(&mut self, direction: Diagonal) -> Result<Color, GridError>;
}

/// Scan all four diagonal neighbours and return them as a robot-frame
/// observation.
pub fn observe<S: ColorSensor + ?Sized>(sensor: &mut S) -> Result<GridCellObservation, GridError> {
    let mut colors = [Color::Unknown; 4];
    for direction in Diagonal::ALL {
        colors[direction.index()] = sensor.scan_diagonal(direction)?;
    }
    Ok(GridCellObservation::from_array(colors))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Sensor that reports a fixed color per robot-frame slot and records the
    /// scan order.
    struct MockSensor {
        id: String,
        slots: [Color; 4],
        scanned: Vec<Diagonal>,
        fail_on: Option<Diagonal>,
    }

    impl ColorSensor for MockSensor {
        fn id(&self) -> &str {
            &self.id
        }

        fn sample_color(&mut self) -> Result<Color, GridError> {
            Ok(Color::Black)
        }

        fn scan_diagonal(&mut self, direction: Diagonal) -> Result<Color, GridError> {
            if self.fail_on == Some(direction) {
                return Err(GridError::HardwareFault {
                    component: self.id.clone(),
                    details: "scan timed out".to_string(),
                });
            }
            self.scanned.push(direction);
            Ok(self.slots[direction.index()])
        }
    }

    fn mock(fail_on: Option<Diagonal>) -> MockSensor {
        MockSensor {
            id: "color_down".to_string(),
            slots: [Color::Red, Color::Green, Color::Blue, Color::Yellow],
            scanned: Vec::new(),
            fail_on,
        }
    }

    #[test]
    fn observe_scans_every_slot_clockwise() {
        let mut sensor = mock(None);
        let obs = observe(&mut sensor).unwrap();
        assert_eq!(
            obs,
            GridCellObservation::new(Color::Red, Color::Green, Color::Blue, Color::Yellow)
        );
        assert_eq!(sensor.scanned, Diagonal::ALL.to_vec());
    }

    #[test]
    fn observe_works_through_trait_object() {
        let mut sensor = mock(None);
        let dyn_sensor: &mut dyn ColorSensor = &mut sensor;
        assert_eq!(dyn_sensor.id(), "color_down");
        assert!(observe(dyn_sensor).is_ok());
    }

    #[test]
    fn observe_propagates_scan_fault() {
        let mut sensor = mock(Some(Diagonal::BACK_LEFT));
        let err = observe(&mut sensor).unwrap_err();
        assert!(matches!(err, GridError::HardwareFault { .. }));
        assert_eq!(sensor.scanned.len(), 2);
    }
}
