use async_trait::async_trait;
use std::sync::Arc;
use tokio::time::sleep;

use super::panel::read_panel;
use super::{RawTranscriptPayload, TranscriptSource};
use crate::config::PipelineConfig;
use crate::page::{Control, HostPage};
use crate::utils::poll::PollOutcome;
use crate::Result;

/// Direct "show transcript" affordances, most specific first
pub const SHOW_TRANSCRIPT_CONTROLS: &[Control] = &[
    Control::Selector("ytd-video-description-transcript-section-renderer button"),
    Control::Selector(r#"button[aria-label="Show transcript"]"#),
    Control::Labelled {
        selector: "ytd-button-renderer button",
        label: "show transcript",
    },
];

/// Buttons that open the overflow ("more actions") menu
pub const MORE_ACTIONS_CONTROLS: &[Control] = &[
    Control::Selector(r#"ytd-menu-renderer button[aria-label="More actions"]"#),
    Control::Selector(r#"button[aria-label="More actions"]"#),
];

/// Transcript entries inside the overflow menu
pub const MENU_TRANSCRIPT_CONTROLS: &[Control] = &[
    Control::Labelled {
        selector: "ytd-menu-service-item-renderer",
        label: "show transcript",
    },
    Control::Labelled {
        selector: "tp-yt-paper-item",
        label: "transcript",
    },
];

/// Opens the transcript panel through the page UI, then reads it
pub struct PanelOpenerSource {
    page: Arc<dyn HostPage>,
    config: PipelineConfig,
}

impl PanelOpenerSource {
    pub fn new(page: Arc<dyn HostPage>, config: PipelineConfig) -> Self {
        Self { page, config }
    }

    async fn activate_first(&self, controls: &[Control]) -> Option<Control> {
        for control in controls {
            if self.page.activate(control).await {
                return Some(*control);
            }
        }
        None
    }

    /// Click a transcript control, going through the overflow menu if needed
    async fn open_panel(&self) -> Option<Control> {
        if let Some(control) = self.activate_first(SHOW_TRANSCRIPT_CONTROLS).await {
            return Some(control);
        }

        self.activate_first(MORE_ACTIONS_CONTROLS).await?;
        tracing::debug!("Opened the overflow menu, waiting for it to settle");
        sleep(self.config.menu_settle_delay()).await;

        self.activate_first(MENU_TRANSCRIPT_CONTROLS).await
    }
}

#[async_trait]
impl TranscriptSource for PanelOpenerSource {
    fn name(&self) -> &'static str {
        "transcript panel opener"
    }

    async fn attempt(&self, _video_id: &str) -> Result<Option<RawTranscriptPayload>> {
        let Some(control) = self.open_panel().await else {
            tracing::debug!("No transcript control found on the page");
            return Ok(None);
        };
        tracing::info!("Activated {:?}, waiting for the transcript panel", control);

        let poller = self.config.panel_poller();
        let page = self.page.as_ref();
        let appeared = poller
            .until(|| page.panel_segments().filter(|segments| !segments.is_empty()))
            .await;

        match appeared {
            PollOutcome::Found(_) => {
                sleep(self.config.panel_populate_delay()).await;
                Ok(read_panel(page))
            }
            PollOutcome::TimedOut => {
                tracing::warn!(
                    "Transcript panel did not appear after {} checks",
                    poller.max_attempts()
                );
                Ok(None)
            }
        }
    }
}
