//! Bodies of the startup snapshot reads.

use serde::{Deserialize, Serialize};

/// Top of the on-screen volume scale.
pub const MAX_VOLUME_LEVEL: u8 = 15;

/// Output volume, as returned by `GET /volume` and carried by `volume` events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeStatus {
    /// Volume in percent, 0..=100.
    pub volume_percent: u8,
    /// Whether the sink is muted.
    pub muted: bool,
}

impl VolumeStatus {
    /// Volume on the 0..=[`MAX_VOLUME_LEVEL`] display scale, rounded to nearest.
    ///
    /// Out-of-range percentages are clamped to 100.
    pub fn level(&self) -> u8 {
        let percent = u32::from(self.volume_percent.min(100));
        ((percent * u32::from(MAX_VOLUME_LEVEL) + 50) / 100) as u8
    }
}

/// Metadata of the current picture, as returned by `GET /picture/meta`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PictureMeta {
    /// Stored file name.
    pub filename: String,
    /// MIME type of the stored file.
    pub content_type: String,
    /// Last update, seconds since the Unix epoch.
    pub updated_at: f64,
    /// Address to load the picture from.
    pub url: String,
}
