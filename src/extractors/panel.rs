use async_trait::async_trait;
use std::sync::Arc;

use super::{RawTranscriptPayload, TranscriptSource};
use crate::page::{HostPage, PanelSegment};
use crate::utils::timestamp;
use crate::Result;

/// Render a panel timestamp label at fixed width, keeping labels we can't read as-is
fn normalize_label(label: &str) -> Option<String> {
    let label = label.trim();
    if label.is_empty() {
        return None;
    }

    timestamp::decode(label)
        .and_then(|seconds| timestamp::encode(seconds).ok())
        .or_else(|| Some(label.to_string()))
}

/// Turn panel rows into `[timestamp] text` lines; `None` if no row has text
pub(crate) fn render_segments(segments: &[PanelSegment]) -> Option<String> {
    let lines: Vec<String> = segments
        .iter()
        .filter_map(|segment| {
            let text = segment.text.trim();
            if text.is_empty() {
                return None;
            }
            Some(match segment.timestamp_label.as_deref().and_then(normalize_label) {
                Some(label) => format!("[{}] {}", label, text),
                None => text.to_string(),
            })
        })
        .collect();

    (!lines.is_empty()).then(|| lines.join("\n"))
}

/// Read the panel currently on the page, if any
pub(crate) fn read_panel(page: &dyn HostPage) -> Option<RawTranscriptPayload> {
    let segments = page.panel_segments()?;
    if segments.is_empty() {
        return None;
    }

    render_segments(&segments).map(RawTranscriptPayload::TimestampedText)
}

/// Reads a transcript panel the page has already rendered
pub struct RenderedPanelSource {
    page: Arc<dyn HostPage>,
}

impl RenderedPanelSource {
    pub fn new(page: Arc<dyn HostPage>) -> Self {
        Self { page }
    }
}

#[async_trait]
impl TranscriptSource for RenderedPanelSource {
    fn name(&self) -> &'static str {
        "rendered transcript panel"
    }

    async fn attempt(&self, _video_id: &str) -> Result<Option<RawTranscriptPayload>> {
        let payload = read_panel(self.page.as_ref());
        if payload.is_none() {
            tracing::debug!("No populated transcript panel on the page");
        }
        Ok(payload)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::page::Control;
    use serde_json::Value;
    use std::sync::Mutex;

    /// In-memory page whose panel can appear once a matching control is activated
    #[derive(Default)]
    pub(crate) struct FakePage {
        pub panel: Mutex<Option<Vec<PanelSegment>>>,
        pub panel_after_activation: Option<Vec<PanelSegment>>,
        pub clickable: Vec<Control>,
        pub activated: Mutex<Vec<Control>>,
        pub scripts: Vec<String>,
        pub globals: Vec<(String, Value)>,
    }

    #[async_trait]
    impl HostPage for FakePage {
        fn panel_segments(&self) -> Option<Vec<PanelSegment>> {
            self.panel.lock().unwrap().clone()
        }

        fn inline_scripts(&self) -> Vec<String> {
            self.scripts.clone()
        }

        fn global_json(&self, name: &str) -> Option<Value> {
            self.globals
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.clone())
        }

        fn title(&self) -> Option<String> {
            None
        }

        fn location(&self) -> Option<String> {
            None
        }

        async fn activate(&self, control: &Control) -> bool {
            if !self.clickable.contains(control) {
                return false;
            }
            self.activated.lock().unwrap().push(*control);
            if let Some(segments) = &self.panel_after_activation {
                *self.panel.lock().unwrap() = Some(segments.clone());
            }
            true
        }
    }

    fn page_with_panel(segments: Option<Vec<PanelSegment>>) -> Arc<dyn HostPage> {
        Arc::new(FakePage {
            panel: Mutex::new(segments),
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn test_reads_rendered_panel() {
        let source = RenderedPanelSource::new(page_with_panel(Some(vec![
            PanelSegment::new(Some("0:05"), " Hello there "),
            PanelSegment::new(Some("1:02:03"), "much later"),
            PanelSegment::new(None, "unlabelled"),
            PanelSegment::new(Some("0:09"), "   "),
            PanelSegment::new(Some("Chapter 1"), "odd label"),
        ])));

        let payload = source.attempt("abc").await.unwrap().unwrap();
        assert_eq!(
            payload,
            RawTranscriptPayload::TimestampedText(
                "[00:05] Hello there\n[01:02:03] much later\nunlabelled\n[Chapter 1] odd label".into()
            )
        );
    }

    #[test]
    fn test_overlong_label_kept_verbatim() {
        let rendered = render_segments(&[PanelSegment::new(
            Some(" 9999999999999999999:00:00 "),
            "runaway",
        )]);
        assert_eq!(rendered.as_deref(), Some("[9999999999999999999:00:00] runaway"));
    }

    #[tokio::test]
    async fn test_missing_or_empty_panel_is_inapplicable() {
        let missing = RenderedPanelSource::new(page_with_panel(None));
        assert!(missing.attempt("abc").await.unwrap().is_none());

        let empty = RenderedPanelSource::new(page_with_panel(Some(Vec::new())));
        assert!(empty.attempt("abc").await.unwrap().is_none());

        let blank = RenderedPanelSource::new(page_with_panel(Some(vec![PanelSegment::new(
            Some("0:01"),
            " ",
        )])));
        assert!(blank.attempt("abc").await.unwrap().is_none());
    }
}
