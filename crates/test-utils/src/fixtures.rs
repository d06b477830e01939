//! Common test fixtures for geolocation and masking tests.
//!
//! Scene documents use the YAML layout read by `geoloc::SceneMetadata`.

/// Geographic bounding boxes as (min_lon, min_lat, max_lon, max_lat).
pub mod bbox {
    /// Whole globe
    pub const GLOBAL: (f64, f64, f64, f64) = (-180.0, -90.0, 180.0, 90.0);

    /// Continental United States
    pub const CONUS: (f64, f64, f64, f64) = (-130.0, 20.0, -60.0, 55.0);

    /// A one degree tile over Colorado
    pub const SMALL_TILE: (f64, f64, f64, f64) = (-105.0, 39.0, -104.0, 40.0);

    /// Crosses the antimeridian; min_lon > max_lon
    pub const PACIFIC: (f64, f64, f64, f64) = (160.0, -50.0, -140.0, 50.0);
}

/// Scene metadata documents.
pub mod scenes {
    /// 2x2 geographic scene, 1 degree pixels, UL of UL pixel at (0, 0).
    pub const GEO_2X2: &str = r#"
projection:
  kind: geographic
  datum: WGS84
  units: degrees
  grid_origin: UL
  ul_corner: [0.0, 0.0]
  lr_corner: [1.0, -1.0]
orientation_angle: 0.0
bands:
  - name: band1
    product: sr_refl
    short_name: LC8SR
    file_name: geo_band1.img
    data_type: INT16
    nlines: 2
    nsamps: 2
    pixel_size: [1.0, 1.0]
"#;

    /// 100x100 UTM zone 13N scene with 30 m pixels near Denver.
    pub const UTM_13N: &str = r#"
projection:
  kind: utm
  datum: WGS84
  units: meters
  grid_origin: UL
  ul_corner: [500000.0, 4430000.0]
  lr_corner: [502970.0, 4427030.0]
  utm_zone: 13
orientation_angle: 0.0
bands:
  - name: band1
    product: L1T
    short_name: LT5SR
    file_name: LT50330322010153_sr_band1.img
    data_type: INT16
    nlines: 100
    nsamps: 100
    pixel_size: [30.0, 30.0]
  - name: band2
    product: L1T
    short_name: LT5SR
    file_name: LT50330322010153_sr_band2.img
    data_type: INT16
    nlines: 100
    nsamps: 100
    pixel_size: [30.0, 30.0]
  - name: band6
    product: L1T
    short_name: LT5BT
    file_name: LT50330322010153_toa_band6.img
    data_type: INT16
    nlines: 25
    nsamps: 25
    pixel_size: [120.0, 120.0]
"#;

    /// 60x60 CONUS Albers scene with 1 km pixels, pixel-center origin.
    pub const ALBERS_CONUS: &str = r#"
projection:
  kind: albers
  datum: NAD83
  units: meters
  grid_origin: CENTER
  ul_corner: [1500500.0, 1999500.0]
  lr_corner: [1559500.0, 1940500.0]
  standard_parallel1: 29.5
  standard_parallel2: 45.5
  central_meridian: -96.0
  origin_latitude: 23.0
  false_easting: 0.0
  false_northing: 0.0
orientation_angle: 0.0
bands:
  - name: band1
    product: sr_refl
    short_name: LE7SR
    file_name: albers_band1.img
    data_type: UINT8
    nlines: 60
    nsamps: 60
    pixel_size: [1000.0, 1000.0]
"#;

    /// 50x50 Antarctic polar stereographic scene with 1 km pixels.
    pub const PS_SOUTH: &str = r#"
projection:
  kind: polar_stereographic
  datum: WGS84
  units: meters
  grid_origin: UL
  ul_corner: [-1500000.0, 1000000.0]
  lr_corner: [-1451000.0, 951000.0]
  longitude_pole: 0.0
  latitude_true_scale: -71.0
  false_easting: 0.0
  false_northing: 0.0
orientation_angle: 0.0
bands:
  - name: band1
    product: sr_refl
    short_name: LC8SR
    file_name: ps_band1.img
    data_type: INT16
    nlines: 50
    nsamps: 50
    pixel_size: [1000.0, 1000.0]
"#;

    /// 40x40 MODIS-style sinusoidal scene on the reference sphere.
    pub const SIN_MODIS: &str = r#"
projection:
  kind: sinusoidal
  datum: NoDatum
  units: meters
  grid_origin: UL
  ul_corner: [-7783653.637667, 1111950.519667]
  lr_corner: [-7747515.245780, 1075812.127780]
  sphere_radius: 6371007.181
  central_meridian: 0.0
  false_easting: 0.0
  false_northing: 0.0
orientation_angle: 0.0
bands:
  - name: band1
    product: MOD09A1
    short_name: MOD09A1
    file_name: sin_band1.img
    data_type: INT16
    nlines: 40
    nsamps: 40
    pixel_size: [926.625433, 926.625433]
"#;

    /// 100x100 UTM zone 60N scene with 2 km pixels straddling 180 degrees.
    pub const UTM_60N_DATELINE: &str = r#"
projection:
  kind: utm
  datum: WGS84
  units: meters
  grid_origin: UL
  ul_corner: [550000.0, 6700000.0]
  lr_corner: [748000.0, 6502000.0]
  utm_zone: 60
orientation_angle: 0.0
bands:
  - name: band1
    product: L1T
    short_name: LC8SR
    file_name: dateline_band1.img
    data_type: INT16
    nlines: 100
    nsamps: 100
    pixel_size: [2000.0, 2000.0]
"#;

    /// 80x80 geographic scene with quarter degree pixels over lon 0..20,
    /// lat 10..-10.
    pub const GEO_QUARTER_DEGREE: &str = r#"
projection:
  kind: geographic
  datum: WGS84
  units: degrees
  grid_origin: UL
  ul_corner: [0.0, 10.0]
  lr_corner: [19.75, -9.75]
orientation_angle: 0.0
bands:
  - name: band1
    product: sr_refl
    short_name: LC8SR
    file_name: geo_quarter_band1.img
    data_type: UINT8
    nlines: 80
    nsamps: 80
    pixel_size: [0.25, 0.25]
"#;

    /// UTM scene that also carries Albers parallels.
    pub const UTM_WITH_ALBERS_FIELDS: &str = r#"
projection:
  kind: utm
  datum: WGS84
  units: meters
  grid_origin: UL
  ul_corner: [500000.0, 4430000.0]
  lr_corner: [502970.0, 4427030.0]
  utm_zone: 13
  standard_parallel1: 29.5
orientation_angle: 0.0
bands:
  - name: band1
    product: L1T
    short_name: LT5SR
    file_name: band1.img
    data_type: INT16
    nlines: 100
    nsamps: 100
    pixel_size: [30.0, 30.0]
"#;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_documents_name_band1() {
        for doc in [
            scenes::GEO_2X2,
            scenes::UTM_13N,
            scenes::ALBERS_CONUS,
            scenes::PS_SOUTH,
            scenes::SIN_MODIS,
            scenes::UTM_60N_DATELINE,
            scenes::GEO_QUARTER_DEGREE,
        ] {
            assert!(doc.contains("name: band1"));
        }
    }

    #[test]
    fn test_pacific_wraps() {
        let (min_lon, _, max_lon, _) = bbox::PACIFIC;
        assert!(min_lon > max_lon);
    }
}
