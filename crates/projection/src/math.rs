//! Series and iteration helpers shared by the ellipsoidal projections.

use std::f64::consts::FRAC_PI_2;

use espa_common::{EspaError, EspaResult};

pub(crate) const EPSLN: f64 = 1.0e-10;

pub(crate) fn e0fn(es: f64) -> f64 {
    1.0 - 0.25 * es * (1.0 + es / 16.0 * (3.0 + 1.25 * es))
}

pub(crate) fn e1fn(es: f64) -> f64 {
    0.375 * es * (1.0 + 0.25 * es * (1.0 + 0.468_75 * es))
}

pub(crate) fn e2fn(es: f64) -> f64 {
    0.058_593_75 * es * es * (1.0 + 0.75 * es)
}

pub(crate) fn e3fn(es: f64) -> f64 {
    es * es * es * (35.0 / 3072.0)
}

/// Meridional distance factor for latitude `phi`.
pub(crate) fn mlfn(e0: f64, e1: f64, e2: f64, e3: f64, phi: f64) -> f64 {
    e0 * phi - e1 * (2.0 * phi).sin() + e2 * (4.0 * phi).sin() - e3 * (6.0 * phi).sin()
}

/// Radius-of-parallel ratio.
pub(crate) fn msfnz(eccent: f64, sinphi: f64, cosphi: f64) -> f64 {
    let con = eccent * sinphi;
    cosphi / (1.0 - con * con).sqrt()
}

/// Conformal latitude helper used by the stereographic family.
pub(crate) fn tsfnz(eccent: f64, phi: f64, sinphi: f64) -> f64 {
    let con = eccent * sinphi;
    let com = 0.5 * eccent;
    let con = ((1.0 - con) / (1.0 + con)).powf(com);
    (0.5 * (FRAC_PI_2 - phi)).tan() / con
}

/// Authalic latitude helper used by the equal-area conics.
pub(crate) fn qsfnz(eccent: f64, sinphi: f64) -> f64 {
    if eccent > 1.0e-7 {
        let con = eccent * sinphi;
        (1.0 - eccent * eccent)
            * (sinphi / (1.0 - con * con) - (0.5 / eccent) * ((1.0 - con) / (1.0 + con)).ln())
    } else {
        2.0 * sinphi
    }
}

/// Latitude from the stereographic `ts` value.
pub(crate) fn phi2z(eccent: f64, ts: f64) -> EspaResult<f64> {
    let eccnth = 0.5 * eccent;
    let mut phi = FRAC_PI_2 - 2.0 * ts.atan();
    for _ in 0..15 {
        let sinpi = phi.sin();
        let con = eccent * sinpi;
        let dphi =
            FRAC_PI_2 - 2.0 * (ts * ((1.0 - con) / (1.0 + con)).powf(eccnth)).atan() - phi;
        phi += dphi;
        if dphi.abs() <= EPSLN {
            return Ok(phi);
        }
    }
    Err(EspaError::projection_failure(
        "latitude failed to converge after 15 iterations",
    ))
}

/// Latitude from the equal-area `qs` value.
pub(crate) fn phi1z(eccent: f64, qs: f64) -> EspaResult<f64> {
    let mut phi = (0.5 * qs).asin();
    if eccent < EPSLN {
        return Ok(phi);
    }

    let eccnts = eccent * eccent;
    for _ in 0..25 {
        let (sinphi, cosphi) = phi.sin_cos();
        let con = eccent * sinphi;
        let com = 1.0 - con * con;
        let dphi = 0.5 * com * com / cosphi
            * (qs / (1.0 - eccnts) - sinphi / com + 0.5 / eccent * ((1.0 - con) / (1.0 + con)).ln());
        phi += dphi;
        if dphi.abs() <= 1.0e-7 {
            return Ok(phi);
        }
    }
    Err(EspaError::projection_failure(
        "latitude failed to converge after 25 iterations",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phi2z_inverts_tsfnz() {
        let e = 0.081_819_190_842_622;
        for deg in [10.0_f64, 45.0, 71.0, 89.0] {
            let phi = deg.to_radians();
            let ts = tsfnz(e, phi, phi.sin());
            let back = phi2z(e, ts).unwrap();
            assert!((back - phi).abs() < 1e-9, "{} -> {}", phi, back);
        }
    }

    #[test]
    fn test_phi1z_inverts_qsfnz() {
        let e = 0.081_819_191_042_8;
        for deg in [-60.0_f64, -10.0, 0.0, 33.0, 80.0] {
            let phi = deg.to_radians();
            let qs = qsfnz(e, phi.sin());
            let back = phi1z(e, qs).unwrap();
            assert!((back - phi).abs() < 1e-7, "{} -> {}", phi, back);
        }
    }

    #[test]
    fn test_qsfnz_sphere() {
        assert_eq!(qsfnz(0.0, 0.5), 1.0);
    }
}
