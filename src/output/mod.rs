use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::utils::sanitize_filename;

/// Header line separating the metadata block from the transcript body
pub const TRANSCRIPT_DIVIDER: &str = "--- TRANSCRIPT ---";

/// Assemble the document handed to the user
pub fn render_document(title: &str, url: &str, transcript: &str) -> String {
    format!(
        "Title: {}\nURL: {}\n\n{}\n\n{}",
        title, url, TRANSCRIPT_DIVIDER, transcript
    )
}

/// File name for a transcript: the sanitized title, or `transcript-<videoId>.txt`
pub fn transcript_filename(title: Option<&str>, video_id: &str) -> String {
    title
        .map(sanitize_filename)
        .filter(|name| name.chars().any(char::is_alphanumeric))
        .map(|name| format!("{}.txt", name))
        .unwrap_or_else(|| format!("transcript-{}.txt", video_id))
}

/// Write a transcript document into `directory` (or the current directory)
pub fn save_to_file(document: &str, directory: Option<&Path>, filename: &str) -> Result<PathBuf> {
    let directory = match directory {
        Some(dir) => dir.to_path_buf(),
        None => std::env::current_dir()?,
    };
    fs_err::create_dir_all(&directory)?;

    let path = directory.join(filename);
    fs_err::write(&path, document)?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_document() {
        let doc = render_document(
            "Rust in 100 Seconds",
            "https://www.youtube.com/watch?v=5C_HPTJg5ek",
            "[00:00] hello\n",
        );
        assert_eq!(
            doc,
            "Title: Rust in 100 Seconds\nURL: https://www.youtube.com/watch?v=5C_HPTJg5ek\n\n--- TRANSCRIPT ---\n\n[00:00] hello\n"
        );
    }

    #[test]
    fn test_transcript_filename() {
        assert_eq!(
            transcript_filename(Some("Rust: 100 Seconds?"), "abc"),
            "Rust_ 100 Seconds_.txt"
        );
        assert_eq!(transcript_filename(None, "abc"), "transcript-abc.txt");
        assert_eq!(transcript_filename(Some("???"), "abc"), "transcript-abc.txt");
        assert_eq!(transcript_filename(Some("   "), "abc"), "transcript-abc.txt");
    }

    #[test]
    fn test_save_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("out");

        let path = save_to_file("Title: x\n", Some(&nested), "x.txt").unwrap();
        assert_eq!(path, nested.join("x.txt"));
        assert_eq!(fs_err::read_to_string(path).unwrap(), "Title: x\n");
    }
}
