//! Typed error hierarchy for the decode engine.
//!
//! Uses `thiserror` for library-grade errors.  The taxonomy splits into
//! two classes: fatal errors (device runtime, codec state, allocation,
//! file-list exhaustion) which abort the whole run, and per-file
//! recoverable errors (unreadable file, unparseable headers, unsupported
//! subsampling) which drop or skip one image and continue.
//!
//! # Error codes
//!
//! Each variant maps to a stable integer code via [`EngineError::error_code`]
//! so the CLI can use it as the process exit status without string parsing.

use std::path::PathBuf;

use crate::ffi_types::{cudaError_t, nvjpegStatus_t};

/// All errors originating from the nvjet engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    // ── CUDA runtime ──────────────────────────────────────────────────
    #[error("CUDA runtime failure: '#{code}' in {call}")]
    Cuda { call: &'static str, code: cudaError_t },

    #[error("Failed to load CUDA/nvJPEG libraries: {0}")]
    DriverLoad(String),

    // ── nvJPEG codec ──────────────────────────────────────────────────
    #[error("NVJPEG failure: '#{code}' in {call}")]
    Nvjpeg {
        call: &'static str,
        code: nvjpegStatus_t,
    },

    /// Header-only parse of one image failed.  Per-file recoverable.
    #[error("Cannot parse JPEG headers ({call} returned #{code})")]
    HeaderParse {
        call: &'static str,
        code: nvjpegStatus_t,
    },

    /// The codec reported an unknown chroma subsampling for one image.
    /// Per-file recoverable: the image is skipped, the run continues.
    #[error("Unknown chroma subsampling, image skipped")]
    UnsupportedSubsampling,

    // ── Input / output ────────────────────────────────────────────────
    /// One input file could not be opened or fully read.  Per-file
    /// recoverable: the path is removed from the candidate list.
    #[error("Cannot read image {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Every candidate file has been removed from the input list.
    #[error("No valid images left in the input list")]
    FileListExhausted,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // ── Pipeline ──────────────────────────────────────────────────────
    #[error("Pipeline error: {0}")]
    Pipeline(String),

    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    // ── Configuration ─────────────────────────────────────────────────
    #[error("Configuration error: {0}")]
    Config(String),
}

impl EngineError {
    /// Whether this error belongs to the per-file recoverable class.
    ///
    /// Recoverable errors are logged and cost one file or one image slot;
    /// everything else aborts the run (partial device state after a failed
    /// runtime call is not safe to continue from).
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::FileRead { .. } | Self::HeaderParse { .. } | Self::UnsupportedSubsampling
        )
    }

    /// Stable integer error code for exit statuses and telemetry.
    ///
    /// Codes are grouped by category:
    /// - 1xx: CUDA runtime / driver loading
    /// - 2xx: nvJPEG codec
    /// - 3xx: input/output
    /// - 4xx: pipeline
    /// - 5xx: configuration
    pub fn error_code(&self) -> u32 {
        match self {
            Self::Cuda { .. } => 100,
            Self::DriverLoad(_) => 101,
            Self::Nvjpeg { .. } => 200,
            Self::HeaderParse { .. } => 201,
            Self::UnsupportedSubsampling => 202,
            Self::FileRead { .. } => 300,
            Self::FileListExhausted => 301,
            Self::Io(_) => 302,
            Self::Pipeline(_) => 400,
            Self::InvariantViolation(_) => 401,
            Self::Config(_) => 500,
        }
    }
}

/// Engine-wide result alias.
pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recoverable_classification_matches_taxonomy() {
        let unreadable = EngineError::FileRead {
            path: PathBuf::from("a.jpg"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(unreadable.is_recoverable());
        assert!(EngineError::UnsupportedSubsampling.is_recoverable());
        assert!(EngineError::HeaderParse {
            call: "nvjpegGetImageInfo",
            code: 5,
        }
        .is_recoverable());

        assert!(!EngineError::FileListExhausted.is_recoverable());
        assert!(!EngineError::Cuda {
            call: "cudaMalloc",
            code: 2,
        }
        .is_recoverable());
    }

    #[test]
    fn error_codes_are_grouped_by_category() {
        assert_eq!(
            EngineError::Cuda {
                call: "cudaMalloc",
                code: 2
            }
            .error_code(),
            100
        );
        assert_eq!(EngineError::FileListExhausted.error_code(), 301);
        assert_eq!(EngineError::Config("dup".into()).error_code(), 500);
    }
}
