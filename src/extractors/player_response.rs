use async_trait::async_trait;
use regex::Regex;
use serde_json::Value;
use std::sync::{Arc, OnceLock};
use url::Url;

use super::{RawTranscriptPayload, TranscriptSource};
use crate::captions::{select_track, CaptionTrack};
use crate::config::PipelineConfig;
use crate::fetch::{fetch_required, HttpFetcher};
use crate::page::HostPage;
use crate::{Result, TranscriptError};

pub const PLAYER_RESPONSE_GLOBAL: &str = "ytInitialPlayerResponse";
const CAPTION_TRACKS_POINTER: &str = "/captions/playerCaptionsTracklistRenderer/captionTracks";

/// How the player response is embedded at a marker
#[derive(Debug, Clone, Copy)]
enum Embedding {
    /// Marker ends at the opening `{` of a JSON object
    Object,
    /// Marker ends at the opening `"` of a JSON string holding the object
    EncodedString,
}

fn markers() -> &'static [(Regex, Embedding)] {
    static MARKERS: OnceLock<Vec<(Regex, Embedding)>> = OnceLock::new();
    MARKERS.get_or_init(|| {
        [
            (r#"ytInitialPlayerResponse\s*=\s*\{"#, Embedding::Object),
            (r#"window\[\s*["']ytInitialPlayerResponse["']\s*\]\s*=\s*\{"#, Embedding::Object),
            (r#""playerResponse"\s*:\s*\{"#, Embedding::Object),
            (r#""playerResponse"\s*:\s*""#, Embedding::EncodedString),
        ]
        .into_iter()
        .map(|(pattern, embedding)| {
            (Regex::new(pattern).expect("marker pattern is valid"), embedding)
        })
        .collect()
    })
}

/// Slice out the JSON object or string that opens at `start`, honouring string escapes
fn balanced_json(text: &str, start: usize) -> Option<&str> {
    let bytes = text.as_bytes();
    let opener = *bytes.get(start)?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &byte) in bytes[start..].iter().enumerate() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => {
                    in_string = false;
                    if opener == b'"' {
                        return Some(&text[start..=start + offset]);
                    }
                }
                _ => {}
            }
            continue;
        }

        match byte {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }

    None
}

fn decode_candidate(candidate: &str, embedding: Embedding) -> Option<Value> {
    let json = match embedding {
        Embedding::Object => candidate.to_string(),
        Embedding::EncodedString => serde_json::from_str::<String>(candidate).ok()?,
    };

    match serde_json::from_str::<Value>(&json) {
        Ok(value) if value.is_object() => Some(value),
        Ok(_) => None,
        Err(e) => {
            tracing::debug!("Skipping unparsable player response candidate: {}", e);
            None
        }
    }
}

/// Find the player response object in the page's inline scripts
pub fn find_player_response(scripts: &[String]) -> Option<Value> {
    for (marker, embedding) in markers() {
        for script in scripts {
            for found in marker.find_iter(script) {
                let start = found.end() - 1;
                let decoded = balanced_json(script, start)
                    .and_then(|candidate| decode_candidate(candidate, *embedding));
                if decoded.is_some() {
                    return decoded;
                }
            }
        }
    }
    None
}

/// Caption tracks listed in a player response
pub fn caption_tracks(player_response: &Value) -> Vec<CaptionTrack> {
    player_response
        .pointer(CAPTION_TRACKS_POINTER)
        .and_then(|tracks| tracks.as_array())
        .map(|tracks| tracks.iter().filter_map(CaptionTrack::from_player_json).collect())
        .unwrap_or_default()
}

/// Make a track URL absolute https and make sure it asks for the configured format
pub fn caption_url(source_url: &str, config: &PipelineConfig) -> Result<String> {
    let source_url = source_url.trim();
    let absolute = if source_url.starts_with("//") {
        format!("https:{}", source_url)
    } else if source_url.starts_with('/') {
        format!("{}{}", config.host_root(), source_url)
    } else if !source_url.contains("://") {
        format!("{}/{}", config.host_root(), source_url)
    } else {
        source_url.to_string()
    };

    let mut url = Url::parse(&absolute).map_err(|e| TranscriptError::TranscriptFetchFailed {
        url: absolute.clone(),
        reason: format!("invalid caption URL: {}", e),
    })?;

    if url.scheme() == "http" && url.set_scheme("https").is_err() {
        tracing::warn!("Could not upgrade {} to https", url);
    }

    if !url.query_pairs().any(|(key, _)| key == "fmt") {
        url.query_pairs_mut().append_pair("fmt", &config.caption_format);
    }

    Ok(url.to_string())
}

/// Reads caption tracks from the player response embedded in the page
pub struct PlayerResponseSource {
    page: Arc<dyn HostPage>,
    fetcher: Arc<dyn HttpFetcher>,
    config: PipelineConfig,
}

impl PlayerResponseSource {
    pub fn new(page: Arc<dyn HostPage>, fetcher: Arc<dyn HttpFetcher>, config: PipelineConfig) -> Self {
        Self {
            page,
            fetcher,
            config,
        }
    }

    fn player_response(&self) -> Option<Value> {
        find_player_response(&self.page.inline_scripts()).or_else(|| {
            tracing::debug!("No player response in inline scripts, checking page globals");
            self.page
                .global_json(PLAYER_RESPONSE_GLOBAL)
                .filter(Value::is_object)
        })
    }
}

#[async_trait]
impl TranscriptSource for PlayerResponseSource {
    fn name(&self) -> &'static str {
        "embedded player response"
    }

    async fn attempt(&self, _video_id: &str) -> Result<Option<RawTranscriptPayload>> {
        let Some(player_response) = self.player_response() else {
            tracing::debug!("Page carries no player response");
            return Ok(None);
        };

        let tracks = caption_tracks(&player_response);
        if tracks.is_empty() {
            return Err(TranscriptError::NoCaptionsAvailable);
        }

        let track = select_track(&tracks, &self.config.preferred_language)?;
        tracing::info!(
            "Selected caption track {} ({}{})",
            track.language_code,
            track.display_name.as_deref().unwrap_or("unnamed"),
            if track.is_auto_generated() { ", auto-generated" } else { "" }
        );

        let url = caption_url(&track.source_url, &self.config)?;
        let body = fetch_required(self.fetcher.as_ref(), &url).await?;

        Ok(Some(RawTranscriptPayload::Markup(body)))
    }
}
