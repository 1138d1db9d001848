//! Command time-to-live conversions.
//!
//! The gateway takes TTLs in nanoseconds, with `0` meaning "no expiry".
//! Humans type them in whatever unit reads best, so this module converts
//! between display units and wire nanoseconds and picks the most
//! readable unit for a given wire value.

use strum::{Display, EnumString};
use thiserror::Error;

/// Smallest accepted non-infinite TTL.
pub const MINIMAL_TTL_MS: u64 = 100;

/// A human-entered TTL that can't be used.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TtlError {
    #[error("cannot parse {0:?} as a TTL (expected e.g. 500ms, 1.5s, 2min, or infinite)")]
    Unparseable(String),
    #[error("TTL {0:?} is below the {MINIMAL_TTL_MS} ms minimum (0 means no expiry)")]
    BelowMinimum(String),
}

/// Display unit for a TTL value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
pub enum TtlUnit {
    /// The zero TTL; the command never expires.
    #[strum(serialize = "infinite")]
    Infinite,
    #[strum(serialize = "ns")]
    Ns,
    #[default]
    #[strum(serialize = "ms")]
    Ms,
    #[strum(serialize = "s")]
    S,
    #[strum(serialize = "min")]
    Min,
    #[strum(serialize = "h")]
    H,
}

impl TtlUnit {
    /// Nanoseconds per one unit. `Infinite` scales like `Ns` so a zero
    /// value stays zero through any conversion.
    #[must_use]
    pub fn nanos(self) -> f64 {
        match self {
            Self::Infinite | Self::Ns => 1.0,
            Self::Ms => 1e6,
            Self::S => 1e9,
            Self::Min => 60e9,
            Self::H => 3600e9,
        }
    }
}

/// Convert a display value to wire nanoseconds, rounded to the nearest
/// whole nanosecond. Negative inputs clamp to zero.
#[must_use]
pub fn to_nanos(value: f64, unit: TtlUnit) -> u64 {
    let nanos = (value * unit.nanos()).round();
    if nanos.is_finite() && nanos > 0.0 {
        // Precision above u64::MAX nanoseconds (~584 years) is moot.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        {
            nanos.min(u64::MAX as f64) as u64
        }
    } else {
        0
    }
}

/// Convert a value between display units.
#[must_use]
pub fn convert(value: f64, from: TtlUnit, to: TtlUnit) -> f64 {
    normalize(value * from.nanos() / to.nanos())
}

/// Round to five decimal places, enough for any unit pair we convert
/// between without showing float noise.
#[must_use]
pub fn normalize(value: f64) -> f64 {
    (value * 1e5).round() / 1e5
}

/// The largest unit that renders the value at or above one, so
/// `1500ms` displays as seconds and `200ns` stays nanoseconds.
#[must_use]
pub fn closest_unit(nanos: u64) -> TtlUnit {
    if nanos == 0 {
        return TtlUnit::Infinite;
    }
    #[allow(clippy::cast_precision_loss)]
    let nanos = nanos as f64;
    if nanos < TtlUnit::Ms.nanos() {
        TtlUnit::Ns
    } else if nanos < TtlUnit::S.nanos() {
        TtlUnit::Ms
    } else if nanos < TtlUnit::Min.nanos() {
        TtlUnit::S
    } else if nanos < TtlUnit::H.nanos() {
        TtlUnit::Min
    } else {
        TtlUnit::H
    }
}

/// Render wire nanoseconds in the closest display unit.
#[must_use]
pub fn display(nanos: u64) -> String {
    let unit = closest_unit(nanos);
    if unit == TtlUnit::Infinite {
        return unit.to_string();
    }
    #[allow(clippy::cast_precision_loss)]
    let value = normalize(nanos as f64 / unit.nanos());
    format!("{value}{unit}")
}

/// Parse a human TTL like `500ms`, `1.5s`, `2min`, or `infinite` into
/// wire nanoseconds, enforcing the minimum. A bare `0` also means
/// infinite; a bare number without a unit is rejected.
pub fn parse(input: &str) -> Result<u64, TtlError> {
    let input = input.trim();
    if input == "0" {
        return Ok(0);
    }
    let unit_start = input
        .find(|c: char| c.is_ascii_alphabetic())
        .ok_or_else(|| TtlError::Unparseable(input.to_owned()))?;
    let (number, unit) = input.split_at(unit_start);
    let unit: TtlUnit = unit
        .parse()
        .map_err(|_| TtlError::Unparseable(input.to_owned()))?;
    let value: f64 = if number.is_empty() && unit == TtlUnit::Infinite {
        0.0
    } else {
        number
            .trim()
            .parse()
            .map_err(|_| TtlError::Unparseable(input.to_owned()))?
    };
    if is_below_minimum(value, unit) {
        return Err(TtlError::BelowMinimum(input.to_owned()));
    }
    Ok(to_nanos(value, unit))
}

/// Whether a value is below the minimal accepted TTL. Zero is always
/// valid; it means infinite.
#[must_use]
pub fn is_below_minimum(value: f64, unit: TtlUnit) -> bool {
    if value == 0.0 {
        return false;
    }
    #[allow(clippy::cast_precision_loss)]
    let min_nanos = (MINIMAL_TTL_MS as f64) * TtlUnit::Ms.nanos();
    value * unit.nanos() < min_nanos
}
