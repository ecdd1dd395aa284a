use super::{CanonicalTranscript, TranscriptLine};
use crate::captions::markup::{self, Element};
use crate::extractors::RawTranscriptPayload;
use crate::utils::timestamp::{self, OffsetUnit};
use crate::{Result, TranscriptError};

/// Where a cue element keeps its start offset, if it is a cue at all
fn cue_offset(element: &Element) -> Option<Option<f64>> {
    let (attribute, unit) = match element.name.as_str() {
        "text" => ("start", OffsetUnit::Seconds),
        "p" => ("t", OffsetUnit::Milliseconds),
        _ => return None,
    };

    Some(
        element
            .attr(attribute)
            .and_then(|raw| timestamp::parse_offset(raw, unit)),
    )
}

fn cue_text(raw: &str) -> String {
    html_escape::decode_html_entities(raw)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Convert caption markup into canonical lines
pub fn markup_lines(markup_text: &str) -> Result<CanonicalTranscript> {
    let lines: Vec<TranscriptLine> = markup::parse(markup_text)?
        .iter()
        .filter_map(|element| {
            let offset = cue_offset(element)?;
            let text = cue_text(&element.text);
            if text.is_empty() {
                return None;
            }

            let timestamp = offset.and_then(|seconds| match timestamp::encode(seconds) {
                Ok(token) => Some(token),
                Err(e) => {
                    tracing::warn!("Dropping timestamp for {:?}: {}", text, e);
                    None
                }
            });

            Some(TranscriptLine { timestamp, text })
        })
        .collect();

    if lines.is_empty() {
        return Err(TranscriptError::NoTranscriptContent);
    }

    Ok(CanonicalTranscript::new(lines))
}

/// Turn any payload into canonical transcript text
pub fn normalize(payload: RawTranscriptPayload) -> Result<String> {
    match payload {
        RawTranscriptPayload::TimestampedText(text) => Ok(text.trim().to_string()),
        RawTranscriptPayload::Markup(markup_text) => Ok(markup_lines(&markup_text)?.to_string()),
    }
}
