//! Reference ellipsoids and the GCTP sphere codes that name them.

use serde::{Deserialize, Serialize};

/// Reference ellipsoid defined by its semi-axes in meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spheroid {
    pub semi_major: f64,
    pub semi_minor: f64,
}

impl Spheroid {
    pub const CLARKE_1866: Spheroid = Spheroid {
        semi_major: 6_378_206.4,
        semi_minor: 6_356_583.8,
    };

    pub const GRS80: Spheroid = Spheroid {
        semi_major: 6_378_137.0,
        semi_minor: 6_356_752.314_140_3,
    };

    pub const WGS84: Spheroid = Spheroid {
        semi_major: 6_378_137.0,
        semi_minor: 6_356_752.314_245_179_3,
    };

    /// Authalic sphere used by MODIS/IAS sinusoidal grids.
    pub const MODIS_SPHERE: Spheroid = Spheroid {
        semi_major: 6_371_007.181,
        semi_minor: 6_371_007.181,
    };

    /// A sphere of the given radius.
    pub fn sphere(radius: f64) -> Self {
        Self {
            semi_major: radius,
            semi_minor: radius,
        }
    }

    /// Squared eccentricity.
    pub fn es(&self) -> f64 {
        let ratio = self.semi_minor / self.semi_major;
        1.0 - ratio * ratio
    }

    /// First eccentricity.
    pub fn eccentricity(&self) -> f64 {
        self.es().sqrt()
    }
}

/// GCTP sphere codes for the spheroids this system supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SphereCode {
    Clarke1866,
    Grs80,
    Wgs84,
    ModisSphere,
}

impl SphereCode {
    /// Integer code as written to `SphereCode=` in structural metadata.
    pub fn code(self) -> i32 {
        match self {
            SphereCode::Clarke1866 => 0,
            SphereCode::Grs80 => 8,
            SphereCode::Wgs84 => 12,
            SphereCode::ModisSphere => 31,
        }
    }

    pub fn spheroid(self) -> Spheroid {
        match self {
            SphereCode::Clarke1866 => Spheroid::CLARKE_1866,
            SphereCode::Grs80 => Spheroid::GRS80,
            SphereCode::Wgs84 => Spheroid::WGS84,
            SphereCode::ModisSphere => Spheroid::MODIS_SPHERE,
        }
    }
}
