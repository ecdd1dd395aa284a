use std::fmt;
use std::sync::Arc;

use crate::config::PipelineConfig;
use crate::extractors::{
    PanelOpenerSource, PlayerResponseSource, RenderedPanelSource, TimedTextApiSource,
    TranscriptSource,
};
use crate::fetch::HttpFetcher;
use crate::page::HostPage;
use crate::{Result, TranscriptError};

pub mod normalizer;

/// One spoken segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptLine {
    /// Fixed-width `MM:SS` / `HH:MM:SS` token, when the start time is known
    pub timestamp: Option<String>,
    pub text: String,
}

impl fmt::Display for TranscriptLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.timestamp {
            Some(timestamp) => write!(f, "[{}] {}", timestamp, self.text),
            None => write!(f, "{}", self.text),
        }
    }
}

/// Transcript lines in playback order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonicalTranscript {
    lines: Vec<TranscriptLine>,
}

impl CanonicalTranscript {
    /// Keeps order as given; blank lines are dropped
    pub fn new(lines: Vec<TranscriptLine>) -> Self {
        Self {
            lines: lines
                .into_iter()
                .filter(|line| !line.text.trim().is_empty())
                .collect(),
        }
    }

    pub fn lines(&self) -> &[TranscriptLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl fmt::Display for CanonicalTranscript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Runs the transcript sources in priority order
pub struct TranscriptPipeline {
    sources: Vec<Box<dyn TranscriptSource>>,
}

impl TranscriptPipeline {
    /// The built-in sources, cheapest and most faithful first
    pub fn standard(
        page: Arc<dyn HostPage>,
        fetcher: Arc<dyn HttpFetcher>,
        config: PipelineConfig,
    ) -> Self {
        Self::with_sources(vec![
            Box::new(RenderedPanelSource::new(page.clone())),
            Box::new(PanelOpenerSource::new(page.clone(), config.clone())),
            Box::new(PlayerResponseSource::new(page, fetcher.clone(), config.clone())),
            Box::new(TimedTextApiSource::new(fetcher, config)),
        ])
    }

    pub fn with_sources(sources: Vec<Box<dyn TranscriptSource>>) -> Self {
        Self { sources }
    }

    /// Names of the sources, in the order they are tried
    pub fn source_names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|source| source.name()).collect()
    }

    /// Obtain the canonical transcript text for a video
    pub async fn acquire(&self, video_id: &str) -> Result<String> {
        for source in &self.sources {
            tracing::info!("Trying {} for video {}", source.name(), video_id);

            match source.attempt(video_id).await {
                Ok(Some(payload)) => {
                    tracing::info!("Got {} from {}", payload.format_name(), source.name());
                    return normalizer::normalize(payload);
                }
                Ok(None) => {
                    tracing::debug!("{} does not apply", source.name());
                }
                Err(e) if e.is_inapplicable() => {
                    tracing::info!("{} does not apply: {}", source.name(), e);
                }
                Err(e) => {
                    tracing::warn!("{} failed: {}", source.name(), e);
                    return Err(e);
                }
            }
        }

        Err(TranscriptError::NoTranscriptAvailable(video_id.to_string()))
    }
}
