pub mod markup;

use crate::{Result, TranscriptError};

/// One caption stream offered for a video
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionTrack {
    /// BCP-47 style code such as `en`, `en-GB`, `de`
    pub language_code: String,

    /// `asr` for auto-generated tracks, otherwise usually absent
    pub kind: Option<String>,

    /// Human readable track name, if the host supplied one
    pub display_name: Option<String>,

    /// Caption content URL, possibly relative
    pub source_url: String,
}

impl CaptionTrack {
    pub fn is_auto_generated(&self) -> bool {
        self.kind.as_deref() == Some("asr")
    }

    fn has_language_prefix(&self, prefix: &str) -> bool {
        self.language_code.starts_with(prefix)
    }

    /// Build a track from one entry of the player response's `captionTracks` array
    pub fn from_player_json(value: &serde_json::Value) -> Option<Self> {
        let language_code = value.get("languageCode")?.as_str()?.to_string();
        let source_url = value.get("baseUrl")?.as_str()?.to_string();
        let kind = value
            .get("kind")
            .and_then(|k| k.as_str())
            .map(str::to_string);

        let name = value.get("name");
        let display_name = name
            .and_then(|n| n.get("simpleText"))
            .and_then(|t| t.as_str())
            .or_else(|| {
                name.and_then(|n| n.get("runs"))
                    .and_then(|r| r.as_array())
                    .and_then(|arr| arr.first())
                    .and_then(|r| r.get("text"))
                    .and_then(|t| t.as_str())
            })
            .map(str::to_string);

        Some(Self {
            language_code,
            kind,
            display_name,
            source_url,
        })
    }
}

/// Pick the best caption track.
///
/// Human-authored tracks in the preferred language win, then any track in the preferred
/// language, then simply the first track. Only an empty list fails.
pub fn select_track<'a>(tracks: &'a [CaptionTrack], preferred_language: &str) -> Result<&'a CaptionTrack> {
    tracks
        .iter()
        .find(|t| t.has_language_prefix(preferred_language) && !t.is_auto_generated())
        .or_else(|| tracks.iter().find(|t| t.has_language_prefix(preferred_language)))
        .or_else(|| tracks.first())
        .ok_or(TranscriptError::NoTrackFound)
}
