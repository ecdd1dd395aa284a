use async_trait::async_trait;
use std::sync::Arc;

use super::{RawTranscriptPayload, TranscriptSource};
use crate::captions::markup;
use crate::config::PipelineConfig;
use crate::fetch::{fetch_required, HttpFetcher};
use crate::Result;

const DEFAULT_LANGUAGE: &str = "en";

/// Asks the timedtext API directly: list the tracks, then fetch the first one
pub struct TimedTextApiSource {
    fetcher: Arc<dyn HttpFetcher>,
    config: PipelineConfig,
}

impl TimedTextApiSource {
    pub fn new(fetcher: Arc<dyn HttpFetcher>, config: PipelineConfig) -> Self {
        Self { fetcher, config }
    }

    pub fn track_list_url(&self, video_id: &str) -> String {
        format!(
            "{}/api/timedtext?type=list&v={}",
            self.config.host_root(),
            urlencoding::encode(video_id)
        )
    }

    pub fn caption_url(&self, video_id: &str, language_code: &str) -> String {
        format!(
            "{}/api/timedtext?lang={}&v={}&fmt={}",
            self.config.host_root(),
            urlencoding::encode(language_code),
            urlencoding::encode(video_id),
            urlencoding::encode(&self.config.caption_format)
        )
    }
}

/// Language code of the first `<track>` in a track listing
fn first_track_language(listing: &str) -> Result<String> {
    let language = markup::parse(listing)?
        .into_iter()
        .find(|element| element.name == "track")
        .and_then(|track| track.attr("lang_code").map(str::to_string))
        .filter(|code| !code.trim().is_empty());

    Ok(language.unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()))
}

#[async_trait]
impl TranscriptSource for TimedTextApiSource {
    fn name(&self) -> &'static str {
        "timedtext API"
    }

    async fn attempt(&self, video_id: &str) -> Result<Option<RawTranscriptPayload>> {
        let listing = fetch_required(self.fetcher.as_ref(), &self.track_list_url(video_id)).await?;
        let language_code = first_track_language(&listing)?;
        tracing::info!("Requesting {} captions from the timedtext API", language_code);

        let body = fetch_required(
            self.fetcher.as_ref(),
            &self.caption_url(video_id, &language_code),
        )
        .await?;

        Ok(Some(RawTranscriptPayload::Markup(body)))
    }
}
