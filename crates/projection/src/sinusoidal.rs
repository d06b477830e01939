//! Spherical Sinusoidal projection (the MODIS land grid).

use std::f64::consts::FRAC_PI_2;

use espa_common::{EspaError, EspaResult};

use crate::angle::adjust_lon;
use crate::math::EPSLN;
use crate::transform::Projection;

#[derive(Debug, Clone)]
pub struct Sinusoidal {
    radius: f64,
    lon_center: f64,
    false_easting: f64,
    false_northing: f64,
}

impl Sinusoidal {
    pub fn new(radius: f64, lon_center: f64, false_easting: f64, false_northing: f64) -> Self {
        Self {
            radius,
            lon_center,
            false_easting,
            false_northing,
        }
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }
}

impl Projection for Sinusoidal {
    fn forward(&self, lon: f64, lat: f64) -> EspaResult<(f64, f64)> {
        let delta_lon = adjust_lon(lon - self.lon_center);
        let x = self.radius * delta_lon * lat.cos() + self.false_easting;
        let y = self.radius * lat + self.false_northing;
        Ok((x, y))
    }

    fn inverse(&self, x: f64, y: f64) -> EspaResult<(f64, f64)> {
        let x = x - self.false_easting;
        let y = y - self.false_northing;

        let lat = y / self.radius;
        if lat.abs() > FRAC_PI_2 + EPSLN {
            return Err(EspaError::projection_failure(format!(
                "northing {} lies beyond the pole",
                y
            )));
        }

        let con = lat.abs() - FRAC_PI_2;
        let lon = if con.abs() > EPSLN {
            let lon = self.lon_center + x / (self.radius * lat.cos());
            adjust_lon(lon)
        } else {
            self.lon_center
        };
        Ok((lon, lat))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spheroid::Spheroid;

    #[test]
    fn test_equator_is_scaled_longitude() {
        let sin = Sinusoidal::new(Spheroid::MODIS_SPHERE.semi_major, 0.0, 0.0, 0.0);
        let (x, y) = sin.forward(1.0, 0.0).unwrap();
        assert!((x - 6_371_007.181).abs() < 1e-6);
        assert_eq!(y, 0.0);
    }

    #[test]
    fn test_round_trip() {
        let sin = Sinusoidal::new(6_371_007.181, 0.0, 0.0, 0.0);
        let lon = (-70.0_f64).to_radians();
        let lat = 10.0_f64.to_radians();
        let (x, y) = sin.forward(lon, lat).unwrap();
        let (lon2, lat2) = sin.inverse(x, y).unwrap();
        assert!((lon2 - lon).abs() < 1e-12);
        assert!((lat2 - lat).abs() < 1e-12);
    }

    #[test]
    fn test_pole_returns_center() {
        let sin = Sinusoidal::new(1.0, 0.25, 0.0, 0.0);
        let (lon, _) = sin.inverse(0.0, FRAC_PI_2).unwrap();
        assert_eq!(lon, 0.25);
        assert!(sin.inverse(0.0, 2.0).is_err());
    }
}
