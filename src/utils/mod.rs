use anyhow::Result;
use url::Url;

pub mod poll;
pub mod timestamp;

/// Validate a URL and return normalized version
pub fn validate_and_normalize_url(url: &str) -> Result<String> {
    let parsed = Url::parse(url)
        .map_err(|_| anyhow::anyhow!("Invalid URL format: {}", url))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        anyhow::bail!("URL must use HTTP or HTTPS protocol");
    }

    Ok(parsed.to_string())
}

/// Sanitize filename for safe filesystem usage
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| {
            match c {
                // Keep alphanumeric characters, spaces, hyphens, underscores, and dots
                c if c.is_alphanumeric() || c == ' ' || c == '-' || c == '_' || c == '.' => c,
                // Replace everything else with underscore
                _ => '_',
            }
        })
        .collect::<String>()
        .trim()
        .trim_matches('.')
        .to_string()
}

fn is_video_id(candidate: &str) -> bool {
    candidate.len() == 11
        && candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Pull the video identifier out of a watch/short/embed URL or a bare id
pub fn extract_video_id(input: &str) -> Result<String> {
    let input = input.trim();

    if is_video_id(input) {
        return Ok(input.to_string());
    }

    let url_str = if input.starts_with("http://") || input.starts_with("https://") {
        input.to_string()
    } else {
        format!("https://{}", input)
    };

    let url = Url::parse(&url_str)
        .map_err(|_| anyhow::anyhow!("Not a YouTube URL or video id: {}", input))?;

    let host = url.host_str().unwrap_or_default();
    if !(host.ends_with("youtube.com") || host == "youtu.be") {
        anyhow::bail!("Not a YouTube URL: {}", input);
    }

    // Standard watch URL: ?v=VIDEO_ID
    if let Some((_, id)) = url.query_pairs().find(|(k, _)| k == "v") {
        if is_video_id(&id) {
            return Ok(id.into_owned());
        }
    }

    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();

    let candidate = match segments.as_slice() {
        [id] if host == "youtu.be" => Some(*id),
        ["shorts" | "embed" | "live" | "v", id, ..] => Some(*id),
        _ => None,
    };

    candidate
        .filter(|id| is_video_id(id))
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("Could not find a video id in: {}", input))
}
