use async_trait::async_trait;

pub mod panel;
pub mod panel_opener;
pub mod player_response;
pub mod timedtext;

pub use panel::RenderedPanelSource;
pub use panel_opener::PanelOpenerSource;
pub use player_response::PlayerResponseSource;
pub use timedtext::TimedTextApiSource;

use crate::{Result, TranscriptError};

/// Transcript data exactly as one source produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawTranscriptPayload {
    /// Lines already in `[timestamp] text` form
    TimestampedText(String),
    /// Caption markup (timedtext XML) still to be parsed
    Markup(String),
}

impl RawTranscriptPayload {
    /// Classify untyped transcript text, e.g. a caption file read from disk
    pub fn detect(text: &str) -> Result<Self> {
        let trimmed = text.trim_start();

        if trimmed.starts_with('<') {
            return Ok(RawTranscriptPayload::Markup(text.to_string()));
        }

        match trimmed.lines().find(|line| !line.trim().is_empty()) {
            Some(first) if first.trim_start().starts_with('[') => {
                Ok(RawTranscriptPayload::TimestampedText(text.to_string()))
            }
            _ => Err(TranscriptError::UnknownFormat),
        }
    }

    pub fn format_name(&self) -> &'static str {
        match self {
            RawTranscriptPayload::TimestampedText(_) => "timestamped text",
            RawTranscriptPayload::Markup(_) => "caption markup",
        }
    }
}

/// One strategy for obtaining transcript data
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Try this strategy. `Ok(None)` means it does not apply right now and the next
    /// strategy should run; `Err` aborts the acquisition.
    async fn attempt(&self, video_id: &str) -> Result<Option<RawTranscriptPayload>>;
}
