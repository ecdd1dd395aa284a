//! Transcript Grab - pull the spoken-word transcript of a YouTube video
//!
//! This library obtains transcript data from whichever source the host page currently
//! offers (a rendered transcript panel, the embedded player response, or the timedtext
//! API) and normalizes it into one canonical, timestamped plain-text document.

pub mod captions;
pub mod cli;
pub mod config;
pub mod extractors;
pub mod fetch;
pub mod output;
pub mod page;
pub mod pipeline;
pub mod utils;

pub use captions::{select_track, CaptionTrack};
pub use cli::{Cli, Commands};
pub use config::{Config, PipelineConfig};
pub use extractors::{RawTranscriptPayload, TranscriptSource};
pub use fetch::{FetchedBody, HttpFetcher, ReqwestFetcher};
pub use page::{html::HtmlPage, Control, HostPage, PanelSegment};
pub use pipeline::{normalizer::normalize, CanonicalTranscript, TranscriptLine, TranscriptPipeline};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, TranscriptError>;

/// Error types specific to transcript acquisition
#[derive(thiserror::Error, Debug)]
pub enum TranscriptError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No caption track found")]
    NoTrackFound,

    #[error("No captions are available for this video")]
    NoCaptionsAvailable,

    #[error("Failed to fetch transcript from {url}: {reason}")]
    TranscriptFetchFailed { url: String, reason: String },

    #[error("Transcript response from {url} was empty")]
    EmptyTranscript { url: String },

    #[error("Malformed caption markup: {0}")]
    MalformedMarkup(String),

    #[error("Caption markup contained no transcript lines")]
    NoTranscriptContent,

    #[error("Unrecognized transcript format")]
    UnknownFormat,

    #[error("No transcript available for video {0}")]
    NoTranscriptAvailable(String),
}

/// Broad classification of a [`TranscriptError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    StructuralParseFailure,
    ResourceUnavailable,
    NetworkFailure,
    Exhausted,
}

impl TranscriptError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TranscriptError::InvalidInput(_) => ErrorKind::InvalidInput,
            TranscriptError::NoTrackFound | TranscriptError::NoCaptionsAvailable => {
                ErrorKind::ResourceUnavailable
            }
            TranscriptError::MalformedMarkup(_)
            | TranscriptError::NoTranscriptContent
            | TranscriptError::UnknownFormat => ErrorKind::StructuralParseFailure,
            TranscriptError::TranscriptFetchFailed { .. } | TranscriptError::EmptyTranscript { .. } => {
                ErrorKind::NetworkFailure
            }
            TranscriptError::NoTranscriptAvailable(_) => ErrorKind::Exhausted,
        }
    }

    /// Whether the pipeline should treat this error as "strategy does not apply"
    /// and move on to the next source.
    pub fn is_inapplicable(&self) -> bool {
        matches!(
            self,
            TranscriptError::NoCaptionsAvailable | TranscriptError::NoTrackFound
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(TranscriptError::NoCaptionsAvailable.kind(), ErrorKind::ResourceUnavailable);
        assert_eq!(
            TranscriptError::EmptyTranscript { url: "u".into() }.kind(),
            ErrorKind::NetworkFailure
        );
        assert_eq!(TranscriptError::UnknownFormat.kind(), ErrorKind::StructuralParseFailure);
        assert_eq!(
            TranscriptError::NoTranscriptAvailable("abc".into()).kind(),
            ErrorKind::Exhausted
        );
    }

    #[test]
    fn test_only_missing_captions_are_inapplicable() {
        assert!(TranscriptError::NoCaptionsAvailable.is_inapplicable());
        assert!(TranscriptError::NoTrackFound.is_inapplicable());
        assert!(!TranscriptError::TranscriptFetchFailed {
            url: "u".into(),
            reason: "HTTP 500".into()
        }
        .is_inapplicable());
        assert!(!TranscriptError::MalformedMarkup("x".into()).is_inapplicable());
    }
}
