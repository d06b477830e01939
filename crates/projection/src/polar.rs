//! Polar Stereographic projection.
//!
//! The hemisphere follows the sign of the latitude of true scale. A latitude
//! of true scale at the pole itself uses the pole-tangent scale factor.

use std::f64::consts::FRAC_PI_2;

use espa_common::EspaResult;

use crate::angle::adjust_lon;
use crate::math::{msfnz, phi2z, tsfnz, EPSLN};
use crate::spheroid::Spheroid;
use crate::transform::Projection;

#[derive(Debug, Clone)]
pub struct PolarStereographic {
    r_major: f64,
    e: f64,
    e4: f64,
    /// Longitude down below the pole, radians
    center_lon: f64,
    /// Latitude of true scale, radians
    center_lat: f64,
    /// -1 for the southern hemisphere
    fac: f64,
    ind: bool,
    mcs: f64,
    tcs: f64,
    false_easting: f64,
    false_northing: f64,
}

impl PolarStereographic {
    /// Angles in radians.
    pub fn new(
        spheroid: Spheroid,
        center_lon: f64,
        center_lat: f64,
        false_easting: f64,
        false_northing: f64,
    ) -> Self {
        let r_major = spheroid.semi_major;
        let e = spheroid.eccentricity();
        let e4 = ((1.0 + e).powf(1.0 + e) * (1.0 - e).powf(1.0 - e)).sqrt();
        let fac = if center_lat < 0.0 { -1.0 } else { 1.0 };

        let mut ind = false;
        let mut mcs = 0.0;
        let mut tcs = 0.0;
        if (center_lat.abs() - FRAC_PI_2).abs() > EPSLN {
            ind = true;
            let con1 = fac * center_lat;
            let (sinphi, cosphi) = con1.sin_cos();
            mcs = msfnz(e, sinphi, cosphi);
            tcs = tsfnz(e, con1, sinphi);
        }

        Self {
            r_major,
            e,
            e4,
            center_lon,
            center_lat,
            fac,
            ind,
            mcs,
            tcs,
            false_easting,
            false_northing,
        }
    }

    pub fn latitude_true_scale(&self) -> f64 {
        self.center_lat
    }
}

impl Projection for PolarStereographic {
    fn forward(&self, lon: f64, lat: f64) -> EspaResult<(f64, f64)> {
        let con1 = self.fac * adjust_lon(lon - self.center_lon);
        let con2 = self.fac * lat;
        let ts = tsfnz(self.e, con2, con2.sin());

        let rh = if self.ind {
            self.r_major * self.mcs * ts / self.tcs
        } else {
            2.0 * self.r_major * ts / self.e4
        };

        let x = self.fac * rh * con1.sin() + self.false_easting;
        let y = -self.fac * rh * con1.cos() + self.false_northing;
        Ok((x, y))
    }

    fn inverse(&self, x: f64, y: f64) -> EspaResult<(f64, f64)> {
        let x = (x - self.false_easting) * self.fac;
        let y = (y - self.false_northing) * self.fac;
        let rh = x.hypot(y);

        let ts = if self.ind {
            rh * self.tcs / (self.r_major * self.mcs)
        } else {
            rh * self.e4 / (2.0 * self.r_major)
        };

        let lat = self.fac * phi2z(self.e, ts)?;
        let lon = if rh == 0.0 {
            self.fac * self.center_lon
        } else {
            adjust_lon(self.fac * x.atan2(-y) + self.center_lon)
        };
        Ok((lon, lat))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pole_maps_to_origin() {
        let ps = PolarStereographic::new(
            Spheroid::WGS84,
            (-45.0_f64).to_radians(),
            70.0_f64.to_radians(),
            0.0,
            0.0,
        );
        let (x, y) = ps.forward(0.3, FRAC_PI_2).unwrap();
        assert!(x.abs() < 1e-6 && y.abs() < 1e-6, "({}, {})", x, y);
    }

    #[test]
    fn test_south_round_trip() {
        let ps = PolarStereographic::new(
            Spheroid::WGS84,
            0.0,
            (-71.0_f64).to_radians(),
            0.0,
            0.0,
        );
        let lon = 120.0_f64.to_radians();
        let lat = (-75.0_f64).to_radians();
        let (x, y) = ps.forward(lon, lat).unwrap();
        let (lon2, lat2) = ps.inverse(x, y).unwrap();
        assert!((lon2 - lon).abs() < 1e-9);
        assert!((lat2 - lat).abs() < 1e-9);
    }

    #[test]
    fn test_tangent_at_pole() {
        let ps = PolarStereographic::new(Spheroid::WGS84, 0.0, FRAC_PI_2, 0.0, 0.0);
        let lat = 80.0_f64.to_radians();
        let (x, y) = ps.forward(0.5, lat).unwrap();
        let (lon2, lat2) = ps.inverse(x, y).unwrap();
        assert!((lon2 - 0.5).abs() < 1e-9);
        assert!((lat2 - lat).abs() < 1e-9);
    }
}
