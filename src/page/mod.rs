use async_trait::async_trait;
use serde_json::Value;

pub mod html;

/// A transcript panel row as rendered by the host page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelSegment {
    /// Label shown next to the row, e.g. `1:05`
    pub timestamp_label: Option<String>,
    pub text: String,
}

impl PanelSegment {
    pub fn new(timestamp_label: Option<&str>, text: &str) -> Self {
        Self {
            timestamp_label: timestamp_label.map(str::to_string),
            text: text.to_string(),
        }
    }
}

/// Something on the page that can be clicked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// First element matching a CSS selector
    Selector(&'static str),
    /// First element matching `selector` whose text contains `label` (case-insensitive)
    Labelled {
        selector: &'static str,
        label: &'static str,
    },
}

/// Capabilities the extractors need from the page hosting the video.
///
/// Everything except [`HostPage::activate`] is a read-only query of the current page state.
#[async_trait]
pub trait HostPage: Send + Sync {
    /// Rows of the transcript panel, or `None` when no panel is present
    fn panel_segments(&self) -> Option<Vec<PanelSegment>>;

    /// Text of every inline `<script>` element, in document order
    fn inline_scripts(&self) -> Vec<String>;

    /// Value of a JSON global variable exposed by the page
    fn global_json(&self, name: &str) -> Option<Value>;

    /// Page title, without any site suffix
    fn title(&self) -> Option<String>;

    /// Address of the page
    fn location(&self) -> Option<String>;

    /// Click the control if it is present. Returns whether anything was activated.
    async fn activate(&self, control: &Control) -> bool;
}
