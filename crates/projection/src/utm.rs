//! Universal Transverse Mercator.
//!
//! Ellipsoidal transverse Mercator with the UTM zone conventions: scale
//! factor 0.9996 on a central meridian of `6 * zone - 183` degrees, a false
//! easting of 500 km and, for southern zones (negative zone numbers), a false
//! northing of 10 000 km.

use std::f64::consts::{FRAC_PI_2, PI};

use espa_common::{EspaError, EspaResult};

use crate::angle::adjust_lon;
use crate::math::{e0fn, e1fn, e2fn, e3fn, mlfn, EPSLN};
use crate::spheroid::Spheroid;
use crate::transform::Projection;

const SCALE_FACTOR: f64 = 0.9996;
const FALSE_EASTING: f64 = 500_000.0;
const SOUTH_FALSE_NORTHING: f64 = 10_000_000.0;

#[derive(Debug, Clone)]
pub struct TransverseMercator {
    /// Semi-major axis in meters
    r_major: f64,
    es: f64,
    esp: f64,
    e0: f64,
    e1: f64,
    e2: f64,
    e3: f64,
    ml0: f64,
    /// Central meridian in radians
    lon_center: f64,
    false_easting: f64,
    false_northing: f64,
}

impl TransverseMercator {
    /// UTM projection for `zone` in 1..=60, negated for the south.
    pub fn utm(zone: i32, spheroid: Spheroid) -> EspaResult<Self> {
        if zone == 0 || zone.abs() > 60 {
            return Err(EspaError::invalid_parameter(
                "zone",
                format!("UTM zone {} is outside 1..=60", zone),
            ));
        }

        let lon_center = ((6 * zone.abs() - 183) as f64).to_radians();
        let false_northing = if zone < 0 { SOUTH_FALSE_NORTHING } else { 0.0 };
        Ok(Self::new(spheroid, lon_center, 0.0, FALSE_EASTING, false_northing))
    }

    fn new(
        spheroid: Spheroid,
        lon_center: f64,
        lat_origin: f64,
        false_easting: f64,
        false_northing: f64,
    ) -> Self {
        let r_major = spheroid.semi_major;
        let es = spheroid.es();
        let e0 = e0fn(es);
        let e1 = e1fn(es);
        let e2 = e2fn(es);
        let e3 = e3fn(es);
        let ml0 = r_major * mlfn(e0, e1, e2, e3, lat_origin);
        let esp = es / (1.0 - es);

        Self {
            r_major,
            es,
            esp,
            e0,
            e1,
            e2,
            e3,
            ml0,
            lon_center,
            false_easting,
            false_northing,
        }
    }

    pub fn central_meridian(&self) -> f64 {
        self.lon_center
    }
}

impl Projection for TransverseMercator {
    fn forward(&self, lon: f64, lat: f64) -> EspaResult<(f64, f64)> {
        let delta_lon = adjust_lon(lon - self.lon_center);
        if delta_lon.abs() > FRAC_PI_2 + EPSLN {
            return Err(EspaError::projection_failure(format!(
                "point {:.6} degrees from the central meridian projects to infinity",
                delta_lon.to_degrees()
            )));
        }
        let (sin_phi, cos_phi) = lat.sin_cos();

        let al = cos_phi * delta_lon;
        let als = al * al;
        let c = self.esp * cos_phi * cos_phi;
        let tq = lat.tan();
        let t = tq * tq;
        let con = 1.0 - self.es * sin_phi * sin_phi;
        let n = self.r_major / con.sqrt();
        let ml = self.r_major * mlfn(self.e0, self.e1, self.e2, self.e3, lat);

        let x = SCALE_FACTOR
            * n
            * al
            * (1.0
                + als / 6.0
                    * (1.0 - t + c
                        + als / 20.0 * (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * self.esp)))
            + self.false_easting;

        let y = SCALE_FACTOR
            * (ml - self.ml0
                + n * tq
                    * (als
                        * (0.5
                            + als / 24.0
                                * (5.0 - t + 9.0 * c + 4.0 * c * c
                                    + als / 30.0
                                        * (61.0 - 58.0 * t + t * t + 600.0 * c
                                            - 330.0 * self.esp)))))
            + self.false_northing;

        Ok((x, y))
    }

    fn inverse(&self, x: f64, y: f64) -> EspaResult<(f64, f64)> {
        let x = x - self.false_easting;
        let y = y - self.false_northing;

        let con = (self.ml0 + y / SCALE_FACTOR) / self.r_major;
        let mut phi = con;
        let mut converged = false;
        for _ in 0..6 {
            let delta_phi = ((con + self.e1 * (2.0 * phi).sin() - self.e2 * (4.0 * phi).sin()
                + self.e3 * (6.0 * phi).sin())
                / self.e0)
                - phi;
            phi += delta_phi;
            if delta_phi.abs() <= EPSLN {
                converged = true;
                break;
            }
        }
        if !converged {
            return Err(EspaError::projection_failure(
                "latitude failed to converge after 6 iterations",
            ));
        }

        if phi.abs() >= FRAC_PI_2 {
            let lat = if y < 0.0 { -FRAC_PI_2 } else { FRAC_PI_2 };
            return Ok((self.lon_center, lat));
        }

        let (sin_phi, cos_phi) = phi.sin_cos();
        let tan_phi = phi.tan();
        let c = self.esp * cos_phi * cos_phi;
        let cs = c * c;
        let t = tan_phi * tan_phi;
        let ts = t * t;
        let con = 1.0 - self.es * sin_phi * sin_phi;
        let n = self.r_major / con.sqrt();
        let r = n * (1.0 - self.es) / con;
        let d = x / (n * SCALE_FACTOR);
        let ds = d * d;

        let lat = phi
            - (n * tan_phi * ds / r)
                * (0.5
                    - ds / 24.0
                        * (5.0 + 3.0 * t + 10.0 * c - 4.0 * cs - 9.0 * self.esp
                            - ds / 30.0
                                * (61.0 + 90.0 * t + 298.0 * c + 45.0 * ts
                                    - 252.0 * self.esp
                                    - 3.0 * cs)));
        let lon = adjust_lon(
            self.lon_center
                + (d * (1.0
                    - ds / 6.0
                        * (1.0 + 2.0 * t + c
                            - ds / 20.0
                                * (5.0 - 2.0 * c + 28.0 * t - 3.0 * cs
                                    + 8.0 * self.esp
                                    + 24.0 * ts)))
                    / cos_phi),
        );

        if !lon.is_finite() || !lat.is_finite() || lat.abs() > PI {
            return Err(EspaError::projection_failure(format!(
                "inverse UTM produced a non-finite coordinate for ({}, {})",
                x, y
            )));
        }
        Ok((lon, lat))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_central_meridian() {
        let tm = TransverseMercator::utm(13, Spheroid::WGS84).unwrap();
        assert!((tm.central_meridian().to_degrees() + 105.0).abs() < 1e-12);
        let south = TransverseMercator::utm(-56, Spheroid::WGS84).unwrap();
        assert!((south.central_meridian().to_degrees() - 153.0).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_zone() {
        assert!(TransverseMercator::utm(0, Spheroid::WGS84).is_err());
        assert!(TransverseMercator::utm(61, Spheroid::WGS84).is_err());
        assert!(TransverseMercator::utm(-61, Spheroid::WGS84).is_err());
    }

    #[test]
    fn test_central_meridian_maps_to_false_easting() {
        let tm = TransverseMercator::utm(13, Spheroid::WGS84).unwrap();
        let (x, y) = tm
            .forward((-105.0_f64).to_radians(), 0.0)
            .unwrap();
        assert!((x - 500_000.0).abs() < 1e-6);
        assert!(y.abs() < 1e-6);
    }

    #[test]
    fn test_known_point() {
        // 40N 105W in zone 13, WGS84.
        let tm = TransverseMercator::utm(13, Spheroid::WGS84).unwrap();
        let (x, y) = tm
            .forward((-105.0_f64).to_radians(), 40.0_f64.to_radians())
            .unwrap();
        assert!((x - 500_000.0).abs() < 1e-3, "x = {}", x);
        assert!((y - 4_427_757.2).abs() < 1.0, "y = {}", y);
    }

    #[test]
    fn test_round_trip_south() {
        let tm = TransverseMercator::utm(-23, Spheroid::WGS84).unwrap();
        let lon = (-46.6_f64).to_radians();
        let lat = (-23.5_f64).to_radians();
        let (x, y) = tm.forward(lon, lat).unwrap();
        assert!(y > 7_000_000.0 && y < 8_000_000.0, "y = {}", y);
        let (lon2, lat2) = tm.inverse(x, y).unwrap();
        assert!((lon2 - lon).abs() < 1e-9);
        assert!((lat2 - lat).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_far_meridian() {
        let tm = TransverseMercator::utm(13, Spheroid::WGS84).unwrap();
        assert!(tm.forward(75.0_f64.to_radians(), 0.0).is_err());
    }
}
