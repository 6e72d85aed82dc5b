//! Error types for sound engines.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur while driving a sound engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// No engine executable could be located.
    #[error("engine executable '{program}' not found. Install it, pass --engine, or set GBSRIP_ENGINE")]
    EngineNotFound { program: String },

    /// The engine process could not be started.
    #[error("failed to spawn engine {program}: {source}")]
    SpawnFailed {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The engine process exited unsuccessfully.
    #[error("engine process exited with {}", describe_exit(.code))]
    ProcessFailed { code: Option<i32> },

    /// Rendering was requested before a track was selected.
    #[error("no track selected; call select_track before run_step")]
    NotStarted,

    /// The song image is not usable.
    #[error("invalid song image: {reason}")]
    InvalidImage { reason: String },

    /// An unrecognized hardware model name.
    #[error("unknown model '{name}'")]
    UnknownModel { name: String },

    /// The sample callback failed (usually while writing output).
    #[error("failed to write rendered samples: {0}")]
    Output(#[source] std::io::Error),

    /// I/O error talking to the engine.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "no status (terminated by signal)".to_string(),
    }
}

impl EngineError {
    /// Creates an invalid image error.
    pub fn invalid_image(reason: impl Into<String>) -> Self {
        EngineError::InvalidImage {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn process_failed_display() {
        assert_eq!(
            EngineError::ProcessFailed { code: Some(3) }.to_string(),
            "engine process exited with status 3"
        );
        assert!(EngineError::ProcessFailed { code: None }
            .to_string()
            .contains("signal"));
    }

    #[test]
    fn not_found_mentions_override() {
        let msg = EngineError::EngineNotFound {
            program: "gbsplay".into(),
        }
        .to_string();
        assert!(msg.contains("gbsplay"));
        assert!(msg.contains("GBSRIP_ENGINE"));
    }
}
