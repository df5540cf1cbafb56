use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;

use crate::error::VkdlError;

/// Tag opening a key directive line in the playlist.
const KEY_DIRECTIVE: &str = "#EXT-X-KEY";
/// File suffix that marks a line as a media segment reference.
const SEGMENT_SUFFIX: &str = ".ts";

static METHOD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"METHOD=([^,]+)").unwrap());
static URI_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"URI="([^"]+)""#).unwrap());

/// One media chunk reference, in playlist order.
///
/// `key` is the decryption key in effect at the point the segment line was
/// scanned, or `None` for cleartext segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub url: String,
    pub key: Option<[u8; 16]>,
}

/// Strips the final path segment of the playlist URL and appends a slash,
/// producing the base that relative references resolve against.
pub fn base_url_of(playlist_url: &str) -> String {
    let head = playlist_url
        .rsplit_once('/')
        .map(|(head, _)| head)
        .unwrap_or(playlist_url);
    format!("{head}/")
}

fn resolve_url(reference: &str, base_url: &str) -> String {
    if reference.starts_with("http") {
        reference.to_string()
    } else {
        format!("{base_url}{reference}")
    }
}

fn is_segment_line(line: &str) -> bool {
    line.ends_with(SEGMENT_SUFFIX) || line.contains(".ts?")
}

/// Scans the playlist text line by line and returns its segment references
/// in source order, each bound to the key state current at that line.
///
/// Key directives switch the current key: `METHOD=NONE` or a missing URI
/// clears it, anything else fetches the referenced key bytes over HTTP. A key
/// that cannot be fetched aborts the whole parse, since no segment recorded
/// after it would be decryptable.
pub async fn parse_playlist(
    client: &Client,
    text: &str,
    base_url: &str,
) -> Result<Vec<Segment>, VkdlError> {
    let mut current_key: Option<[u8; 16]> = None;
    let mut segments: Vec<Segment> = Vec::new();

    for line in text.lines() {
        if line.starts_with(KEY_DIRECTIVE) {
            current_key = key_for_directive(client, line, base_url).await?;
        } else if is_segment_line(line) {
            segments.push(Segment {
                url: resolve_url(line, base_url),
                key: current_key,
            });
        }
    }

    Ok(segments)
}

async fn key_for_directive(
    client: &Client,
    line: &str,
    base_url: &str,
) -> Result<Option<[u8; 16]>, VkdlError> {
    let method = METHOD_RE
        .captures(line)
        .map(|c| c[1].to_string())
        .unwrap_or_else(|| "NONE".to_string());
    let uri = URI_RE.captures(line).map(|c| c[1].to_string());

    if method == "NONE" {
        return Ok(None);
    }
    let Some(uri) = uri else {
        return Ok(None);
    };

    let url = resolve_url(&uri, base_url);
    let resp = client
        .get(&url)
        .send()
        .await
        .map_err(|e| VkdlError::KeyFetchError {
            url: url.clone(),
            message: e.to_string(),
        })?;
    if !resp.status().is_success() {
        return Err(VkdlError::KeyFetchError {
            url,
            message: format!("HTTP status {}", resp.status().as_u16()),
        });
    }
    let bytes = resp.bytes().await.map_err(|e| VkdlError::KeyFetchError {
        url: url.clone(),
        message: e.to_string(),
    })?;
    let key: [u8; 16] = bytes
        .as_ref()
        .try_into()
        .map_err(|_| VkdlError::KeyFetchError {
            url,
            message: format!("expected a 16 byte key, got {} bytes", bytes.len()),
        })?;
    Ok(Some(key))
}
