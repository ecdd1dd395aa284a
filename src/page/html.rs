use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;
use std::collections::HashMap;

use super::{Control, HostPage, PanelSegment};

/// Transcript panel containers, newest layout first
pub const PANEL_SELECTORS: &[&str] = &[
    "ytd-transcript-search-panel-renderer",
    "ytd-transcript-renderer",
];
pub const SEGMENT_SELECTOR: &str = "ytd-transcript-segment-renderer";
pub const SEGMENT_TIMESTAMP_SELECTOR: &str = ".segment-timestamp";
pub const SEGMENT_TEXT_SELECTOR: &str = ".segment-text";

const TITLE_SUFFIX: &str = " - YouTube";

fn selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(sel) => Some(sel),
        Err(e) => {
            tracing::warn!("Ignoring invalid selector {:?}: {:?}", css, e);
            None
        }
    }
}

fn collected_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Static snapshot of a watch page, queried with CSS selectors.
///
/// The document is kept as source text and parsed per query so the snapshot stays
/// `Send + Sync`. A snapshot cannot be clicked, so [`HostPage::activate`] always reports
/// that nothing happened.
#[derive(Debug, Clone)]
pub struct HtmlPage {
    source: String,
    location: Option<String>,
    globals: HashMap<String, Value>,
}

impl HtmlPage {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            location: None,
            globals: HashMap::new(),
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Expose a JSON global, as a live page would through `window`
    pub fn with_global(mut self, name: impl Into<String>, value: Value) -> Self {
        self.globals.insert(name.into(), value);
        self
    }

    fn document(&self) -> Html {
        Html::parse_document(&self.source)
    }
}

#[async_trait]
impl HostPage for HtmlPage {
    fn panel_segments(&self) -> Option<Vec<PanelSegment>> {
        let document = self.document();
        let segment_sel = selector(SEGMENT_SELECTOR)?;
        let timestamp_sel = selector(SEGMENT_TIMESTAMP_SELECTOR)?;
        let text_sel = selector(SEGMENT_TEXT_SELECTOR)?;

        let panel = PANEL_SELECTORS
            .iter()
            .filter_map(|css| selector(css))
            .find_map(|sel| document.select(&sel).next())?;

        let segments = panel
            .select(&segment_sel)
            .map(|segment| PanelSegment {
                timestamp_label: segment
                    .select(&timestamp_sel)
                    .next()
                    .map(collected_text)
                    .filter(|label| !label.is_empty()),
                text: segment
                    .select(&text_sel)
                    .next()
                    .map(collected_text)
                    .unwrap_or_default(),
            })
            .collect();

        Some(segments)
    }

    fn inline_scripts(&self) -> Vec<String> {
        let document = self.document();
        let Some(script_sel) = selector("script") else {
            return Vec::new();
        };

        document
            .select(&script_sel)
            .filter(|script| script.value().attr("src").is_none())
            .map(|script| script.text().collect::<String>())
            .collect()
    }

    fn global_json(&self, name: &str) -> Option<Value> {
        self.globals.get(name).cloned()
    }

    fn title(&self) -> Option<String> {
        let document = self.document();

        let from_meta = selector(r#"meta[name="title"]"#)
            .and_then(|sel| {
                document
                    .select(&sel)
                    .next()
                    .and_then(|meta| meta.value().attr("content").map(str::to_string))
            });

        let title = from_meta.or_else(|| {
            selector("title").and_then(|sel| document.select(&sel).next().map(collected_text))
        })?;

        let title = title.trim();
        let title = title.strip_suffix(TITLE_SUFFIX).unwrap_or(title).trim();
        (!title.is_empty()).then(|| title.to_string())
    }

    fn location(&self) -> Option<String> {
        self.location.clone()
    }

    async fn activate(&self, control: &Control) -> bool {
        tracing::debug!("Static page snapshot cannot activate {:?}", control);
        false
    }
}
