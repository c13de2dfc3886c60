//! Engine

use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::valves::{LashSpec, ValveKind, ValveMeasurement};

/// Errors related to engine construction.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The same valve was measured twice.
    #[error("Duplicate measurement for {kind} valve #{number}")]
    DuplicateValve {
        /// Which side of the head the valve sits on
        kind: ValveKind,
        /// The valve's number on its side
        number: u8,
    },
}

/// An engine under adjustment: its lash specifications and the full set of
/// valve measurements taken with the current shims in place.
#[derive(Debug)]
pub struct Engine {
    name: String,
    intake: LashSpec,
    exhaust: LashSpec,
    valves: Vec<ValveMeasurement>,
}

impl Engine {
    /// Creates an engine from its specifications and measurements.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] if the same valve appears twice in the
    /// measurement list.
    pub fn new(
        name: impl Into<String>,
        intake: LashSpec,
        exhaust: LashSpec,
        valves: impl Into<Vec<ValveMeasurement>>,
    ) -> Result<Self, EngineError> {
        let valves = valves.into();

        let mut seen: FxHashSet<(ValveKind, u8)> = FxHashSet::default();

        for measurement in &valves {
            if !seen.insert((measurement.kind(), measurement.number())) {
                return Err(EngineError::DuplicateValve {
                    kind: measurement.kind(),
                    number: measurement.number(),
                });
            }
        }

        Ok(Self {
            name: name.into(),
            intake,
            exhaust,
            valves,
        })
    }

    /// The engine's display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The lash specification for the given valve kind.
    #[must_use]
    pub const fn spec(&self, kind: ValveKind) -> &LashSpec {
        match kind {
            ValveKind::Intake => &self.intake,
            ValveKind::Exhaust => &self.exhaust,
        }
    }

    /// The valve measurements in the order they were taken.
    pub fn valves(&self) -> &[ValveMeasurement] {
        &self.valves
    }

    /// The number of measured valves.
    pub fn len(&self) -> usize {
        self.valves.len()
    }

    /// Returns `true` if no valves were measured.
    pub fn is_empty(&self) -> bool {
        self.valves.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{shims::ShimSize, units::Inches};

    use super::*;

    fn inches(s: &str) -> Inches {
        s.parse().expect("valid decimal literal")
    }

    fn intake_spec() -> LashSpec {
        LashSpec::new(inches("0.007"), inches("0.0095"), inches("0.012"))
            .expect("valid intake window")
    }

    fn exhaust_spec() -> LashSpec {
        LashSpec::new(inches("0.012"), inches("0.0142"), inches("0.017"))
            .expect("valid exhaust window")
    }

    #[test]
    fn engine_exposes_the_spec_per_kind() -> TestResult {
        let engine = Engine::new("test", intake_spec(), exhaust_spec(), [])?;

        assert_eq!(engine.spec(ValveKind::Intake).target(), inches("0.0095"));
        assert_eq!(engine.spec(ValveKind::Exhaust).target(), inches("0.0142"));
        assert!(engine.is_empty());

        Ok(())
    }

    #[test]
    fn engine_keeps_measurement_order() -> TestResult {
        let valves = [
            ValveMeasurement::new(ValveKind::Intake, 2, ShimSize::new(382), inches("0.012")),
            ValveMeasurement::new(ValveKind::Intake, 1, ShimSize::new(402), inches("0.008")),
        ];

        let engine = Engine::new("test", intake_spec(), exhaust_spec(), valves)?;

        let numbers: Vec<u8> = engine.valves().iter().map(ValveMeasurement::number).collect();

        assert_eq!(numbers, vec![2, 1]);

        Ok(())
    }

    #[test]
    fn duplicate_valve_is_rejected() {
        let valves = [
            ValveMeasurement::new(ValveKind::Intake, 1, ShimSize::new(382), inches("0.012")),
            ValveMeasurement::new(ValveKind::Intake, 1, ShimSize::new(402), inches("0.008")),
        ];

        let result = Engine::new("test", intake_spec(), exhaust_spec(), valves);

        assert!(matches!(
            result,
            Err(EngineError::DuplicateValve {
                kind: ValveKind::Intake,
                number: 1
            })
        ));
    }

    #[test]
    fn same_number_on_different_sides_is_fine() -> TestResult {
        let valves = [
            ValveMeasurement::new(ValveKind::Intake, 1, ShimSize::new(382), inches("0.012")),
            ValveMeasurement::new(ValveKind::Exhaust, 1, ShimSize::new(342), inches("0.014")),
        ];

        let engine = Engine::new("test", intake_spec(), exhaust_spec(), valves)?;

        assert_eq!(engine.len(), 2);

        Ok(())
    }
}
