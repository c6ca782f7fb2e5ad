//! Error types for the engine binary.

/// Top-level error for the engine binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading or validation failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: fixation_core::ConfigError,
    },

    /// Building or addressing a character failed.
    #[error("arena error: {source}")]
    Arena {
        /// The underlying arena error.
        #[from]
        source: fixation_core::ArenaError,
    },

    /// The debug trace could not be written.
    #[error("debug trace error: {source}")]
    Trace {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// A debug snapshot could not be serialized.
    #[error("debug trace serialization error: {source}")]
    Serialize {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },
}
