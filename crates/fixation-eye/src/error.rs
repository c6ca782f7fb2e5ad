//! Error types for the `fixation-eye` crate.

/// Errors that can occur when building or reconfiguring an eye simulator.
#[derive(Debug, thiserror::Error)]
pub enum EyeError {
    /// A configuration field is outside its permitted range.
    #[error("invalid eye movement config: {source}")]
    InvalidConfig {
        /// The underlying field-level validation errors.
        #[from]
        source: validator::ValidationErrors,
    },

    /// A configuration field is NaN or infinite.
    #[error("eye movement config field `{field}` is not finite")]
    NonFinite {
        /// Name of the offending field.
        field: &'static str,
    },
}
