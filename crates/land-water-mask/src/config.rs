//! Mask generation settings.

use std::path::PathBuf;

/// Environment variable naming the land-mass polygon file.
pub const POLYGON_FILE_ENV: &str = "ESPA_LAND_MASS_POLYGON";

/// Environment variable enabling the pre-rasterization summary.
pub const SUMMARY_ENV: &str = "ESPA_LWMASK_SUMMARY";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaskConfig {
    /// Land-mass polygon file; there is no built-in default
    pub polygon_file: Option<PathBuf>,

    /// Log the image and projection summary before rasterizing
    pub summary: bool,
}

impl MaskConfig {
    pub fn new(polygon_file: impl Into<PathBuf>) -> Self {
        Self {
            polygon_file: Some(polygon_file.into()),
            summary: false,
        }
    }

    /// Create from environment variables (ESPA_LAND_MASS_POLYGON,
    /// ESPA_LWMASK_SUMMARY).
    pub fn from_env() -> Self {
        Self {
            polygon_file: std::env::var(POLYGON_FILE_ENV)
                .ok()
                .filter(|s| !s.is_empty())
                .map(PathBuf::from),
            summary: std::env::var(SUMMARY_ENV)
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(false),
        }
    }

    pub fn with_summary(mut self, summary: bool) -> Self {
        self.summary = summary;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        let path = self.polygon_file.as_ref().ok_or_else(|| {
            format!(
                "no land mass polygon file configured; set {}",
                POLYGON_FILE_ENV
            )
        })?;
        if !path.is_file() {
            return Err(format!(
                "land mass polygon file {} does not exist",
                path.display()
            ));
        }
        Ok(())
    }
}
