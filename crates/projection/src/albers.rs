//! Albers Conical Equal Area projection.

use espa_common::{EspaError, EspaResult};

use crate::angle::adjust_lon;
use crate::math::{msfnz, phi1z, qsfnz, EPSLN};
use crate::spheroid::Spheroid;
use crate::transform::Projection;

#[derive(Debug, Clone)]
pub struct Albers {
    r_major: f64,
    es: f64,
    e3: f64,
    /// Central meridian, radians
    lon_center: f64,
    /// Cone constant
    ns0: f64,
    c: f64,
    rh: f64,
    false_easting: f64,
    false_northing: f64,
}

impl Albers {
    /// Angles in radians.
    pub fn new(
        spheroid: Spheroid,
        lat1: f64,
        lat2: f64,
        lon_center: f64,
        lat_origin: f64,
        false_easting: f64,
        false_northing: f64,
    ) -> EspaResult<Self> {
        if (lat1 + lat2).abs() < EPSLN {
            return Err(EspaError::invalid_parameter(
                "standard_parallel",
                "standard parallels are equal and opposite",
            ));
        }

        let r_major = spheroid.semi_major;
        let es = spheroid.es();
        let e3 = es.sqrt();

        let (sin_po, cos_po) = lat1.sin_cos();
        let ms1 = msfnz(e3, sin_po, cos_po);
        let qs1 = qsfnz(e3, sin_po);

        let (sin_po2, cos_po2) = lat2.sin_cos();
        let ms2 = msfnz(e3, sin_po2, cos_po2);
        let qs2 = qsfnz(e3, sin_po2);

        let qs0 = qsfnz(e3, lat_origin.sin());

        let ns0 = if (lat1 - lat2).abs() > EPSLN {
            (ms1 * ms1 - ms2 * ms2) / (qs2 - qs1)
        } else {
            sin_po
        };
        let c = ms1 * ms1 + ns0 * qs1;
        let rh = r_major * (c - ns0 * qs0).sqrt() / ns0;

        Ok(Self {
            r_major,
            es,
            e3,
            lon_center,
            ns0,
            c,
            rh,
            false_easting,
            false_northing,
        })
    }
}

impl Projection for Albers {
    fn forward(&self, lon: f64, lat: f64) -> EspaResult<(f64, f64)> {
        let qs = qsfnz(self.e3, lat.sin());
        let rh1 = self.r_major * (self.c - self.ns0 * qs).sqrt() / self.ns0;
        let theta = self.ns0 * adjust_lon(lon - self.lon_center);

        let x = rh1 * theta.sin() + self.false_easting;
        let y = self.rh - rh1 * theta.cos() + self.false_northing;
        Ok((x, y))
    }

    fn inverse(&self, x: f64, y: f64) -> EspaResult<(f64, f64)> {
        let x = x - self.false_easting;
        let y = self.rh - y + self.false_northing;

        let (rh1, con) = if self.ns0 >= 0.0 {
            (x.hypot(y), 1.0)
        } else {
            (-x.hypot(y), -1.0)
        };
        let theta = if rh1 != 0.0 {
            (con * x).atan2(con * y)
        } else {
            0.0
        };

        let con = rh1 * self.ns0 / self.r_major;
        let qs = (self.c - con * con) / self.ns0;

        let lat = if self.e3 >= 1e-10 {
            let limit = 1.0
                - 0.5 * (1.0 - self.es) * ((1.0 - self.e3) / (1.0 + self.e3)).ln() / self.e3;
            if (limit.abs() - qs.abs()).abs() > 1.0e-10 {
                phi1z(self.e3, qs)?
            } else if qs >= 0.0 {
                std::f64::consts::FRAC_PI_2
            } else {
                -std::f64::consts::FRAC_PI_2
            }
        } else {
            phi1z(self.e3, qs)?
        };

        let lon = adjust_lon(theta / self.ns0 + self.lon_center);
        Ok((lon, lat))
    }
}
