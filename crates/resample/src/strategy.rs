//! Gap fill policies.

use std::fmt;
use std::str::FromStr;

use crate::ResampleError;

/// Policy for grid dates that received no observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FillStrategy {
    /// Treat a missing date as zero accrued return.
    ZeroFill,
    /// Leave missing dates explicitly undefined, distinguishable from a
    /// true zero return.
    NaFill,
    /// Mark missing dates undefined, then fill interior gaps by linear
    /// interpolation between the bracketing observed values. Gaps at the
    /// head or tail of an entity's span stay undefined.
    InterpolateLinear,
}

impl FillStrategy {
    /// Canonical configuration name for this strategy.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ZeroFill => "zero-fill",
            Self::NaFill => "na-fill",
            Self::InterpolateLinear => "interpolate-linear",
        }
    }
}

impl fmt::Display for FillStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FillStrategy {
    type Err = ResampleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "zero-fill" => Ok(Self::ZeroFill),
            "na-fill" => Ok(Self::NaFill),
            "interpolate-linear" => Ok(Self::InterpolateLinear),
            other => Err(ResampleError::UnknownStrategy(other.to_string())),
        }
    }
}
