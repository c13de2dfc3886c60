//! Engine Fixtures

use serde::Deserialize;

use crate::{
    engine::Engine,
    fixtures::FixtureError,
    shims::ShimSize,
    units::Inches,
    valves::{LashSpec, ValveKind, ValveMeasurement},
};

/// Wrapper for an engine in YAML
#[derive(Debug, Deserialize)]
pub struct EngineFixture {
    /// Engine name
    pub name: String,

    /// Intake lash window
    pub intake: LashWindowFixture,

    /// Exhaust lash window
    pub exhaust: LashWindowFixture,

    /// Measured valves in head order
    pub valves: Vec<ValveFixture>,
}

/// Lash window in YAML
#[derive(Debug, Deserialize)]
pub struct LashWindowFixture {
    /// Minimum acceptable lash (e.g., "0.007")
    pub min: String,

    /// Target lash
    pub target: String,

    /// Maximum acceptable lash
    pub max: String,
}

/// One measured valve in YAML
#[derive(Debug, Deserialize)]
pub struct ValveFixture {
    /// Which side of the head the valve sits on
    pub kind: ValveKindFixture,

    /// Valve number within its side
    pub number: u8,

    /// Catalog id of the currently fitted shim
    pub fitted: u16,

    /// Measured lash with the fitted shim (e.g., "0.012")
    pub lash: String,
}

/// Valve kind in YAML
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValveKindFixture {
    /// Intake side
    Intake,

    /// Exhaust side
    Exhaust,
}

impl From<ValveKindFixture> for ValveKind {
    fn from(kind: ValveKindFixture) -> Self {
        match kind {
            ValveKindFixture::Intake => ValveKind::Intake,
            ValveKindFixture::Exhaust => ValveKind::Exhaust,
        }
    }
}

impl TryFrom<LashWindowFixture> for LashSpec {
    type Error = FixtureError;

    fn try_from(fixture: LashWindowFixture) -> Result<Self, Self::Error> {
        let min = parse_inches(&fixture.min)?;
        let target = parse_inches(&fixture.target)?;
        let max = parse_inches(&fixture.max)?;

        Ok(LashSpec::new(min, target, max)?)
    }
}

impl TryFrom<ValveFixture> for ValveMeasurement {
    type Error = FixtureError;

    fn try_from(fixture: ValveFixture) -> Result<Self, Self::Error> {
        let lash = parse_inches(&fixture.lash)?;

        Ok(ValveMeasurement::new(
            fixture.kind.into(),
            fixture.number,
            ShimSize::new(fixture.fitted),
            lash,
        ))
    }
}

impl TryFrom<EngineFixture> for Engine {
    type Error = FixtureError;

    fn try_from(fixture: EngineFixture) -> Result<Self, Self::Error> {
        let intake = LashSpec::try_from(fixture.intake)?;
        let exhaust = LashSpec::try_from(fixture.exhaust)?;

        let valves = fixture
            .valves
            .into_iter()
            .map(ValveMeasurement::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Engine::new(fixture.name, intake, exhaust, valves)?)
    }
}

/// Parse a measurement string (e.g., "0.012") into inches
///
/// # Errors
///
/// Returns an error if the string is not a plain decimal number.
pub fn parse_inches(s: &str) -> Result<Inches, FixtureError> {
    s.trim()
        .parse()
        .map_err(|_err| FixtureError::InvalidMeasurement(s.to_string()))
}
