//! Quantized stepping of a single coordinate axis.
//!
//! Every value produced here is rounded to a fixed number of decimals, so a
//! sequence of steps lands on the same grid of values no matter how many times
//! it is advanced. The trajectory controller relies on that to detect arrival
//! with plain equality.

use std::iter::FusedIterator;

use crate::geo::round_to;
use crate::types::sim_error::SimError;

/// Degrees added or removed by a single step.
pub const STEP_UNIT: f64 = 0.00001;
/// Decimal places every stepped value is rounded to.
pub const STEP_PRECISION: i32 = 5;
/// Length of the bounded range computed on each tick.
pub const DEFAULT_STEPS_PER_TICK: usize = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Increasing,
    Decreasing,
}

impl Direction {
    /// Direction that moves `current` closer to `target`, or `None` if they are equal.
    pub fn towards(current: f64, target: f64) -> Option<Direction> {
        if current < target {
            Some(Direction::Increasing)
        } else if current > target {
            Some(Direction::Decreasing)
        } else {
            None
        }
    }

    fn sign(self) -> f64 {
        match self {
            Direction::Increasing => 1.0,
            Direction::Decreasing => -1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateStepper {
    step_unit: f64,
    precision: i32,
}

impl Default for CoordinateStepper {
    fn default() -> Self {
        CoordinateStepper {
            step_unit: STEP_UNIT,
            precision: STEP_PRECISION,
        }
    }
}

impl CoordinateStepper {
    pub fn new(step_unit: f64, precision: i32) -> Result<Self, SimError> {
        if !step_unit.is_finite() || step_unit <= 0.0 {
            return Err(SimError::InvalidInput);
        }
        if !(0..=10).contains(&precision) {
            return Err(SimError::InvalidInput);
        }
        Ok(CoordinateStepper {
            step_unit,
            precision,
        })
    }

    pub fn step_unit(&self) -> f64 {
        self.step_unit
    }

    /// Rounds a value onto the stepping grid.
    pub fn quantize(&self, value: f64) -> f64 {
        round_to(value, self.precision)
    }

    /// Moves `value` one step in `direction`.
    pub fn next_step(&self, value: f64, direction: Direction) -> f64 {
        self.quantize(value + direction.sign() * self.step_unit)
    }

    /// Lazily yields `count` values: `value`, `value ± step`, `value ± 2·step`, ...
    pub fn step_range(&self, value: f64, direction: Direction, count: usize) -> StepRange {
        StepRange {
            start: value,
            delta: direction.sign() * self.step_unit,
            precision: self.precision,
            index: 0,
            count,
        }
    }
}

/// Finite sequence produced by [`CoordinateStepper::step_range`]. Once
/// exhausted it stays exhausted.
#[derive(Debug, Clone)]
pub struct StepRange {
    start: f64,
    delta: f64,
    precision: i32,
    index: usize,
    count: usize,
}

impl Iterator for StepRange {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if self.index >= self.count {
            return None;
        }
        let value = round_to(self.start + self.delta * self.index as f64, self.precision);
        self.index += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count.saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for StepRange {}

impl FusedIterator for StepRange {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_step_moves_by_one_unit() {
        let stepper = CoordinateStepper::default();
        assert_eq!(stepper.next_step(0.5, Direction::Increasing), 0.50001);
        assert_eq!(stepper.next_step(0.5, Direction::Decreasing), 0.49999);
        assert_eq!(stepper.next_step(-118.408, Direction::Decreasing), -118.40801);
    }

    #[test]
    fn test_next_step_is_stable_under_requantization() {
        let stepper = CoordinateStepper::default();
        let value = stepper.next_step(33.942501, Direction::Increasing);
        assert_eq!(stepper.quantize(value), value);
        assert_eq!(stepper.quantize(stepper.quantize(value)), value);
    }

    #[test]
    fn test_step_range_values() {
        let stepper = CoordinateStepper::default();
        let values: Vec<f64> = stepper.step_range(1.0, Direction::Decreasing, 4).collect();
        assert_eq!(values, vec![1.0, 0.99999, 0.99998, 0.99997]);
    }

    #[test]
    fn test_step_range_is_bounded_and_fused() {
        let stepper = CoordinateStepper::default();
        let mut range = stepper.step_range(0.0, Direction::Increasing, DEFAULT_STEPS_PER_TICK);
        assert_eq!(range.len(), DEFAULT_STEPS_PER_TICK);
        let last = range.by_ref().last();
        assert_eq!(last, Some(0.04999));
        assert_eq!(range.next(), None);
        assert_eq!(range.next(), None);
    }

    #[test]
    fn test_empty_range() {
        let stepper = CoordinateStepper::default();
        assert_eq!(stepper.step_range(5.0, Direction::Increasing, 0).count(), 0);
    }

    #[test]
    fn test_direction_towards() {
        assert_eq!(Direction::towards(1.0, 2.0), Some(Direction::Increasing));
        assert_eq!(Direction::towards(2.0, 1.0), Some(Direction::Decreasing));
        assert_eq!(Direction::towards(1.0, 1.0), None);
    }

    #[test]
    fn test_invalid_step_unit_is_rejected() {
        assert!(CoordinateStepper::new(0.0, 5).is_err());
        assert!(CoordinateStepper::new(f64::NAN, 5).is_err());
        assert!(CoordinateStepper::new(0.001, 3).is_ok());
    }
}
