//! Configuration for point-of-interest selection.

use serde::Deserialize;
use validator::Validate;

use crate::error::PoiError;

/// Tunable parameters of the transfer scheduler and the view-cone test.
#[derive(Debug, Clone, PartialEq, Deserialize, Validate)]
pub struct PoiConfig {
    /// Whether the host should run selection at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Mean interval between transfer checks (seconds).
    #[serde(default = "default_check_mean_interval")]
    #[validate(range(exclusive_min = 0.0))]
    pub check_mean_interval: f32,

    /// Standard deviation of the transfer-check interval (seconds).
    #[serde(default = "default_check_std_dev")]
    #[validate(range(min = 0.0))]
    pub check_std_dev: f32,

    /// Candidates closer than this are never admissible.
    #[serde(default = "default_near_clip")]
    #[validate(range(min = 0.0))]
    pub near_clip: f32,

    /// Candidates farther than this are never admissible.
    #[serde(default = "default_far_clip")]
    #[validate(range(exclusive_min = 0.0))]
    pub far_clip: f32,

    /// Drop occluded candidates during selection.
    #[serde(default)]
    pub occlusion_test: bool,
}

impl Default for PoiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            check_mean_interval: default_check_mean_interval(),
            check_std_dev: default_check_std_dev(),
            near_clip: default_near_clip(),
            far_clip: default_far_clip(),
            occlusion_test: false,
        }
    }
}

impl PoiConfig {
    /// Check every field against its permitted range.
    ///
    /// # Errors
    ///
    /// Returns [`PoiError::NonFinite`], [`PoiError::InvalidConfig`], or
    /// [`PoiError::InvertedClip`] when `near_clip >= far_clip`.
    pub fn check(&self) -> Result<(), PoiError> {
        let fields = [
            ("check_mean_interval", self.check_mean_interval),
            ("check_std_dev", self.check_std_dev),
            ("near_clip", self.near_clip),
            ("far_clip", self.far_clip),
        ];
        if let Some(&(field, _)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(PoiError::NonFinite { field });
        }
        self.validate()?;
        if self.near_clip >= self.far_clip {
            return Err(PoiError::InvertedClip {
                near: self.near_clip,
                far: self.far_clip,
            });
        }
        Ok(())
    }
}

const fn default_true() -> bool {
    true
}

const fn default_check_mean_interval() -> f32 {
    0.3
}

const fn default_check_std_dev() -> f32 {
    0.07
}

const fn default_near_clip() -> f32 {
    0.1
}

const fn default_far_clip() -> f32 {
    50.0
}
