use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "transcript-grab",
    about = "Transcript Grab - Pull the spoken-word transcript of a YouTube video into a timestamped text file",
    version,
    long_about = "Fetches a YouTube watch page and obtains its transcript from whichever source is available: the transcript panel, the embedded player response, or the timedtext API. The result is written as one canonical, timestamped plain-text document."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch the transcript of a video
    Fetch {
        /// Watch URL, short URL or bare video id
        #[arg(value_name = "URL_OR_ID")]
        target: String,

        /// Output file path (defaults to a name derived from the video title)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Print the document instead of writing a file
        #[arg(long, conflicts_with = "output")]
        stdout: bool,
    },

    /// Normalize a saved caption file (timedtext XML or timestamped text)
    Normalize {
        /// File to read
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Show or initialize the configuration
    Config {
        /// Show current configuration
        #[arg(short, long)]
        show: bool,

        /// Write the default configuration file
        #[arg(long, conflicts_with = "show")]
        init: bool,
    },
}
