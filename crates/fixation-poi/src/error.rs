//! Error types for the `fixation-poi` crate.
//!
//! Only construction and registration can fail. Selection itself never
//! errors: an empty candidate set is the normal "no target" state.

/// Errors that can occur when configuring or populating a registry.
#[derive(Debug, thiserror::Error)]
pub enum PoiError {
    /// A configuration field is outside its permitted range.
    #[error("invalid point-of-interest config: {source}")]
    InvalidConfig {
        /// The underlying field-level validation errors.
        #[from]
        source: validator::ValidationErrors,
    },

    /// A configuration field is NaN or infinite.
    #[error("point-of-interest config field `{field}` is not finite")]
    NonFinite {
        /// Name of the offending field.
        field: &'static str,
    },

    /// The near clip distance is not below the far clip distance.
    #[error("near clip {near} must be below far clip {far}")]
    InvertedClip {
        /// Configured near clip distance.
        near: f32,
        /// Configured far clip distance.
        far: f32,
    },

    /// A view half-angle has the wrong sign or exceeds 180 degrees.
    #[error("invalid view angle: {reason}")]
    InvalidViewAngle {
        /// Explanation of what is wrong with the view angle.
        reason: String,
    },

    /// A point of interest was registered with a negative or non-finite weight.
    #[error("point of interest `{key}` has invalid weight {weight}")]
    InvalidWeight {
        /// Registry key of the rejected point.
        key: String,
        /// The rejected weight.
        weight: f32,
    },
}
