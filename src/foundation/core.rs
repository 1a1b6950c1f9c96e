use crate::foundation::error::{SourceError, SourceResult};
use std::fmt;

/// Presentation time in nanoseconds.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct ClockTime(pub u64);

impl ClockTime {
    /// Zero time.
    pub const ZERO: Self = Self(0);
    /// Nanoseconds in one second; the time unit all rates are expressed against.
    pub const SECOND: Self = Self(1_000_000_000);

    /// Build from whole seconds (saturating).
    pub const fn from_seconds(secs: u64) -> Self {
        Self(secs.saturating_mul(Self::SECOND.0))
    }

    /// Raw nanosecond value.
    pub const fn nseconds(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ns = self.0;
        let secs = ns / Self::SECOND.0;
        write!(
            f,
            "{}:{:02}:{:02}.{:09}",
            secs / 3600,
            (secs / 60) % 60,
            secs % 60,
            ns % Self::SECOND.0
        )
    }
}

/// Frame-rate fraction as declared by the `framerate-num` / `framerate-den` properties.
///
/// The numerator counts frames and the denominator counts seconds, so one frame lasts
/// `SECOND * den / num`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameRate {
    /// Numerator (frames), must be > 0.
    pub num: u32,
    /// Denominator (seconds), must be > 0.
    pub den: u32,
}

impl FrameRate {
    /// Create a validated rate.
    pub fn new(num: u32, den: u32) -> SourceResult<Self> {
        if num == 0 {
            return Err(SourceError::invalid_value("frame rate numerator must be > 0"));
        }
        if den == 0 {
            return Err(SourceError::invalid_value(
                "frame rate denominator must be > 0",
            ));
        }
        Ok(Self { num, den })
    }
}

impl Default for FrameRate {
    fn default() -> Self {
        Self { num: 1, den: 1 }
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

/// Compute `val * num / den` rounding down, without intermediate overflow.
///
/// Results that do not fit into `u64` saturate. A zero `den` yields `u64::MAX`.
pub fn uint64_scale(val: u64, num: u64, den: u64) -> u64 {
    if den == 0 {
        return u64::MAX;
    }
    let wide = u128::from(val) * u128::from(num) / u128::from(den);
    u64::try_from(wide).unwrap_or(u64::MAX)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
