//! Angular unit conversions and antimeridian helpers.
//!
//! Packed DMS encodes degrees, minutes and seconds in a single value as
//! `deg * 1e6 + min * 1e3 + sec`. It is the form expected by the projection
//! parameter slots and by the HDF-EOS structural metadata grammar.

use std::f64::consts::PI;

use espa_common::{EspaError, EspaResult};

const MAX_MINUTES: f64 = 60060.0;
const MAX_SECONDS: f64 = 60.0;

/// Angular unit for longitude arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AngleUnit {
    Radians,
    Seconds,
    Degrees,
    /// Packed degrees/minutes/seconds.
    Dms,
}

/// Unit of the value handed to [`degdms`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AngleCode {
    Degrees,
    Minutes,
    Seconds,
    /// The value is already packed DMS and is only validated.
    Dms,
}

/// Semantic class of an angle, which selects its legal range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AngleCheck {
    /// -90 to 90 degrees.
    Lat,
    /// -180 to 180 degrees.
    Lon,
    /// 0 to 360 degrees.
    Other,
}

impl AngleCheck {
    /// Packed DMS bounds (min, max) for this class.
    fn dms_range(self) -> (f64, f64) {
        match self {
            AngleCheck::Lat => (-90_000_000.0, 90_000_000.0),
            AngleCheck::Lon => (-180_000_000.0, 180_000_000.0),
            AngleCheck::Other => (0.0, 360_000_000.0),
        }
    }
}

/// Pack decimal degrees into DMS, truncating toward zero and carrying
/// 60 seconds into minutes and 60 minutes into degrees.
pub fn deg_to_dms(degrees: f64) -> f64 {
    let sign = if degrees < 0.0 { -1.0 } else { 1.0 };
    let value = degrees.abs();

    let mut deg = value.trunc();
    let mut min = ((value - deg) * 60.0).trunc();
    let mut sec = (value - deg - min / 60.0) * 3600.0;

    if sec >= 60.0 {
        sec -= 60.0;
        min += 1.0;
    }
    if min >= 60.0 {
        min -= 60.0;
        deg += 1.0;
    }

    sign * (deg * 1_000_000.0 + min * 1000.0 + sec)
}

/// Unpack a DMS value into decimal degrees.
///
/// Fails with `InvalidAngle` if the minutes or seconds field is 60 or more.
pub fn dms_to_deg(dms: f64) -> EspaResult<f64> {
    let sign = if dms < 0.0 { -1.0 } else { 1.0 };
    let value = dms.abs();

    let deg = (value / 1_000_000.0).trunc();
    let min = ((value - deg * 1_000_000.0) / 1000.0).trunc();
    let sec = value - deg * 1_000_000.0 - min * 1000.0;

    if min >= 60.0 || sec >= 60.0 {
        return Err(EspaError::invalid_angle(format!(
            "packed DMS value {} has minutes {} seconds {}",
            dms, min, sec
        )));
    }

    Ok(sign * (deg + min / 60.0 + sec / 3600.0))
}

/// Unpack a DMS value straight into radians.
pub fn dms_to_rad(dms: f64) -> EspaResult<f64> {
    Ok(dms_to_deg(dms)?.to_radians())
}

fn find_deg(angle: f64) -> i64 {
    let value = angle.abs();
    let mut deg = value.trunc() as i64;
    let mut minute = ((value - deg as f64) * 60.0).trunc() as i64;
    let sec = ((value - deg as f64) * 60.0 - minute as f64) * 60.0;

    if sec >= 59.999 {
        minute += 1;
    }
    if minute >= 60 {
        deg += 1;
    }

    if angle < 0.0 {
        -deg
    } else {
        deg
    }
}

fn find_min(angle: f64) -> i64 {
    let value = angle.abs().fract();
    let mut minute = (value * 60.0).trunc() as i64;
    let sec = (value * 60.0 - minute as f64) * 60.0;

    if sec > 59.999 {
        minute += 1;
    }
    if minute >= 60 {
        minute -= 60;
    }
    minute
}

fn find_sec(angle: f64) -> f64 {
    let mut value = (angle.abs().fract() * 60.0).fract() * 60.0;
    if value > 59.999 {
        value -= 60.0;
    }
    // Truncate to 0.001 second.
    (value * 1000.0).trunc() / 1000.0
}

/// Convert degrees, minutes or seconds to packed DMS, or validate a value
/// that is already packed DMS.
///
/// The result is checked against the range of `check`. Already-packed values
/// additionally have their minute and second remainders checked, and
/// `AngleCheck::Other` values must be positive.
pub fn degdms(value: f64, code: AngleCode, check: AngleCheck) -> EspaResult<f64> {
    let (min_dms, max_dms) = check.dms_range();

    if code != AngleCode::Dms {
        let degrees = match code {
            AngleCode::Minutes => value / 60.0,
            AngleCode::Seconds => value / 3600.0,
            _ => value,
        };

        let tdeg = find_deg(degrees).abs() as f64;
        let tmin = find_min(degrees) as f64;
        let tsec = find_sec(degrees);
        let sign = if degrees < 0.0 { -1.0 } else { 1.0 };
        let dms = (tdeg * 1_000_000.0 + tmin * 1000.0 + tsec) * sign;

        if dms > max_dms || dms < min_dms {
            return Err(EspaError::invalid_angle(format!(
                "{} converts to DMS {} outside {:?} range",
                value, dms, check
            )));
        }
        return Ok(dms);
    }

    if value > max_dms || value < min_dms {
        return Err(EspaError::invalid_angle(format!(
            "DMS value {} outside {:?} range",
            value, check
        )));
    }
    if check == AngleCheck::Other && value <= 0.0 {
        return Err(EspaError::invalid_angle(format!(
            "DMS value {} must be positive",
            value
        )));
    }

    let minutes = value - (value / 1_000_000.0).trunc() * 1_000_000.0;
    if minutes.abs() > MAX_MINUTES {
        return Err(EspaError::invalid_angle(format!(
            "DMS value {} has an invalid minutes field",
            value
        )));
    }
    let seconds = value - (value / 1000.0).trunc() * 1000.0;
    if seconds.abs() > MAX_SECONDS {
        return Err(EspaError::invalid_angle(format!(
            "DMS value {} has an invalid seconds field",
            value
        )));
    }

    Ok(value)
}

/// Distance representing one full revolution in the given unit.
pub fn once_around(unit: AngleUnit) -> f64 {
    match unit {
        AngleUnit::Radians => 2.0 * PI,
        AngleUnit::Seconds => 360.0 * 3600.0,
        AngleUnit::Degrees => 360.0,
        AngleUnit::Dms => 360_000_000.0,
    }
}

/// Heuristic test for a scene whose corners straddle the antimeridian.
///
/// Returns false when all four corners share a sign. Otherwise returns true
/// if any corner pair is more than half a revolution apart. Skewed scenes
/// can be misclassified; callers needing a rigorous answer should not rely
/// on it.
pub fn crosses_180(unit: AngleUnit, corner_longitudes: &[f64; 4]) -> bool {
    let positive = corner_longitudes.iter().filter(|&&lon| lon > 0.0).count();
    if positive == 0 || positive == 4 {
        return false;
    }

    let revolution = once_around(unit);
    for i in 0..4 {
        for j in (i + 1)..4 {
            let fraction = (corner_longitudes[i] - corner_longitudes[j]).abs() / revolution;
            if fraction > 0.5 {
                return true;
            }
        }
    }
    false
}

/// Shift a longitude east by one revolution without changing the location
/// it names.
///
/// Packed DMS cannot always be shifted by plain addition: when the sum
/// changes sign the per-field layout breaks, so the value is routed through
/// decimal degrees instead.
pub fn add_once_around(unit: AngleUnit, lon: f64) -> EspaResult<f64> {
    let shifted = lon + once_around(unit);
    if unit != AngleUnit::Dms || (shifted < 0.0) == (lon < 0.0) {
        return Ok(shifted);
    }

    let degrees = dms_to_deg(lon)? + once_around(AngleUnit::Degrees);
    Ok(deg_to_dms(degrees))
}

/// Wrap a longitude in radians into [-PI, PI].
pub fn adjust_lon(lon: f64) -> f64 {
    let mut value = lon;
    // Bounded so that a non-finite input cannot spin forever.
    for _ in 0..4 {
        if value.abs() <= PI {
            break;
        }
        value -= 2.0 * PI * value.signum();
    }
    if value.abs() > PI {
        value = (value + PI).rem_euclid(2.0 * PI) - PI;
    }
    value
}
