//! Valves and lash specifications

use std::fmt;

use thiserror::Error;

use crate::{shims::ShimSize, units::Inches};

/// Which side of the head a valve sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValveKind {
    /// Intake valve.
    Intake,

    /// Exhaust valve.
    Exhaust,
}

impl fmt::Display for ValveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValveKind::Intake => write!(f, "intake"),
            ValveKind::Exhaust => write!(f, "exhaust"),
        }
    }
}

/// Lash specification errors
#[derive(Debug, Error)]
pub enum LashSpecError {
    /// The minimum lash is not strictly below the maximum.
    #[error("Lash window is empty: min {min} is not below max {max}")]
    EmptyWindow {
        /// Minimum acceptable lash
        min: Inches,
        /// Maximum acceptable lash
        max: Inches,
    },

    /// The target lash falls outside the acceptable window.
    #[error("Target lash {target} is outside the window {min} to {max}")]
    TargetOutsideWindow {
        /// Target lash
        target: Inches,
        /// Minimum acceptable lash
        min: Inches,
        /// Maximum acceptable lash
        max: Inches,
    },
}

/// The acceptable lash window and its ideal target for one valve kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LashSpec {
    min: Inches,
    target: Inches,
    max: Inches,
}

impl LashSpec {
    /// Creates a lash specification.
    ///
    /// # Errors
    ///
    /// Returns a [`LashSpecError`] if `min` is not strictly below `max`, or
    /// if `target` lies outside `[min, max]`.
    pub fn new(min: Inches, target: Inches, max: Inches) -> Result<Self, LashSpecError> {
        if min >= max {
            return Err(LashSpecError::EmptyWindow { min, max });
        }

        if target < min || target > max {
            return Err(LashSpecError::TargetOutsideWindow { target, min, max });
        }

        Ok(Self { min, target, max })
    }

    /// Minimum acceptable lash.
    #[must_use]
    pub const fn min(&self) -> Inches {
        self.min
    }

    /// Ideal lash.
    #[must_use]
    pub const fn target(&self) -> Inches {
        self.target
    }

    /// Maximum acceptable lash.
    #[must_use]
    pub const fn max(&self) -> Inches {
        self.max
    }
}

/// One measured valve: which valve it is, what is fitted now, and the lash
/// measured with that shim in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValveMeasurement {
    kind: ValveKind,
    number: u8,
    fitted: ShimSize,
    lash: Inches,
}

impl ValveMeasurement {
    /// Creates a measurement record.
    #[must_use]
    pub const fn new(kind: ValveKind, number: u8, fitted: ShimSize, lash: Inches) -> Self {
        Self {
            kind,
            number,
            fitted,
            lash,
        }
    }

    /// Which side of the head the valve sits on.
    #[must_use]
    pub const fn kind(&self) -> ValveKind {
        self.kind
    }

    /// The valve's number on its side, starting at 1.
    #[must_use]
    pub const fn number(&self) -> u8 {
        self.number
    }

    /// The size of the currently fitted shim.
    #[must_use]
    pub const fn fitted(&self) -> ShimSize {
        self.fitted
    }

    /// The measured lash with the current shim in place.
    #[must_use]
    pub const fn lash(&self) -> Inches {
        self.lash
    }

    /// The fixed cam-to-bucket distance the next shim must fill: current
    /// shim thickness plus measured lash. Whatever shim goes in next, its
    /// lash is this gap minus its thickness.
    #[must_use]
    pub fn gap(&self) -> Inches {
        self.fitted.thickness() + self.lash
    }
}
