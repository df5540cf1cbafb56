use std::path::PathBuf;

use crate::api::AudioInfo;
use crate::resource::ResourceDescriptor;

/// Extension of the final transcoded audio file.
pub const AUDIO_EXTENSION: &str = "mp3";

static FORBIDDEN_WINDOWS_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// returns a filename that is safe to use on Windows, Linux and Mac OS
///
/// ### Details
///
/// On Windows, filenames cannot contain the following characters: \ / : * ? " < > | ^
///
/// On Linux the only forbidden character in filenames is '/'.
///
/// On Mac OS, same as linux, plus it cannot contain ':' (kind of)
///
/// Control characters (ASCII 0-31) are also not allowed on most platforms.
///
/// This function replaces all forbidden characters with '_', and trims leading/trailing whitespace and dots,
/// which can cause issues on Windows (e.g., filenames ending with a dot or space are not allowed).
pub fn cleanup_filename(input: &str) -> String {
    let mut result = String::from(input);
    result = result
        .chars()
        .map(|c| match c {
            // Replace forbidden characters with '_'
            '/' | '\\' | '?' | '%' | '*' | ':' | '|' | '"' | '<' | '>' | '^' => '_',
            // Remove control characters
            c if c.is_control() => '_',
            _ => c,
        })
        .collect();
    // Remove leading/trailing whitespace and dots
    result = result
        .trim_matches(|c: char| c.is_whitespace() || c == '.')
        .to_string();

    // avoid forbidden windows names by adding an underscore at the end if found
    let upper_result = result.to_ascii_uppercase();
    if FORBIDDEN_WINDOWS_NAMES
        .iter()
        .any(|&name| name == upper_result)
    {
        result.push('_');
    }

    if result.len() > 255 {
        result.truncate(255);
    }

    result
}

/// Derives the output filename from the resolved tags, falling back to the
/// resource identifiers when the API provided none.
pub fn audio_filename(info: &AudioInfo, resource: &ResourceDescriptor) -> String {
    match (info.artist.as_deref(), info.title.as_deref()) {
        (Some(artist), Some(title)) => {
            cleanup_filename(&format!("{artist} — {title}.{AUDIO_EXTENSION}"))
        }
        (None, Some(title)) => cleanup_filename(&format!("{title}.{AUDIO_EXTENSION}")),
        _ => format!(
            "audio_{}_{}.{}",
            resource.owner_id, resource.item_id, AUDIO_EXTENSION
        ),
    }
}

pub fn get_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|mut path| {
            path.push("vkdl");
            path
        })
        .unwrap_or_else(|| {
            let tmp_dir = std::path::PathBuf::from("/tmp/vkdl");
            std::fs::create_dir_all(&tmp_dir).ok();
            tmp_dir
        })
}
