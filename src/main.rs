use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use transcript_grab::fetch::fetch_required;
use transcript_grab::{
    cli::{Cli, Commands},
    normalize, output, utils, Config, HostPage, HtmlPage, RawTranscriptPayload,
    ReqwestFetcher, TranscriptPipeline,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "transcript_grab=debug"
    } else {
        "transcript_grab=info"
    };

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Fetch {
            target,
            output,
            stdout,
        } => {
            let video_id = utils::extract_video_id(&target)?;
            let config = Config::load()?;
            fetch(&config, &video_id, output.as_deref(), stdout, cli.quiet).await?;
        }
        Commands::Normalize { file } => {
            let content = fs_err::read_to_string(&file)?;
            let payload = RawTranscriptPayload::detect(&content)
                .with_context(|| format!("Cannot normalize {}", file.display()))?;
            tracing::debug!("Detected {} in {}", payload.format_name(), file.display());

            let text = normalize(payload)?;
            println!("{}", text.trim_end());
        }
        Commands::Config { show, init } => {
            if init {
                let config = Config::default();
                config.save()?;
                println!("Default configuration written to: {}", Config::config_path()?.display());
            } else {
                let config = Config::load()?;
                if show {
                    config.display();
                } else {
                    println!("Configuration file: {}", Config::config_path()?.display());
                    println!("Run with --show to print it or --init to create it.");
                }
            }
        }
    }

    Ok(())
}

async fn fetch(
    config: &Config,
    video_id: &str,
    output_path: Option<&Path>,
    to_stdout: bool,
    quiet: bool,
) -> Result<()> {
    let watch_url = format!("{}/watch?v={}", config.pipeline.host_root(), video_id);
    tracing::info!("Starting transcript acquisition for: {}", watch_url);

    let fetcher = Arc::new(ReqwestFetcher::new());
    let html = fetch_required(fetcher.as_ref(), &watch_url)
        .await
        .context("Failed to download the watch page")?;
    let page = Arc::new(HtmlPage::new(html).with_location(watch_url.clone()));

    let progress = if quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new_spinner()
    };
    progress.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap(),
    );
    progress.set_message("Looking for a transcript...");
    progress.enable_steady_tick(Duration::from_millis(120));

    let pipeline = TranscriptPipeline::standard(page.clone(), fetcher, config.pipeline.clone());
    let transcript = match pipeline.acquire(video_id).await {
        Ok(transcript) => {
            progress.finish_with_message("Transcript ready");
            transcript
        }
        Err(e) => {
            progress.finish_with_message("Transcript unavailable");
            return Err(e.into());
        }
    };

    let title = page.title();
    let url = page.location().unwrap_or(watch_url);
    let document = output::render_document(
        title.as_deref().unwrap_or("Unknown title"),
        &url,
        &transcript,
    );

    if to_stdout {
        println!("{}", document);
        return Ok(());
    }

    let path = match output_path {
        Some(path) => {
            fs_err::write(path, &document)?;
            path.to_path_buf()
        }
        None => {
            let filename = output::transcript_filename(title.as_deref(), video_id);
            output::save_to_file(&document, config.output.directory.as_deref(), &filename)?
        }
    };
    println!("Transcript saved to: {}", path.display());

    Ok(())
}
