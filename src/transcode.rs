use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::VkdlError;

/// Tag metadata passed along to the encoder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackTags {
    pub artist: Option<String>,
    pub title: Option<String>,
}

/// Encodes an assembled raw stream into the final audio file.
///
/// The pipeline only ever talks to this narrow contract, so tests can swap in
/// a fake and the download path never depends on an encoder being installed.
#[async_trait]
pub trait Transcoder: Send + Sync {
    async fn transcode(
        &self,
        input: &Path,
        output: &Path,
        tags: &TrackTags,
    ) -> Result<(), VkdlError>;
}

/// Production transcoder shelling out to ffmpeg.
pub struct FfmpegTranscoder {
    ffmpeg_path: PathBuf,
    bitrate_kbps: u32,
}

impl FfmpegTranscoder {
    pub fn new(ffmpeg_path: PathBuf, bitrate_kbps: u32) -> Self {
        Self {
            ffmpeg_path,
            bitrate_kbps,
        }
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn transcode(
        &self,
        input: &Path,
        output: &Path,
        tags: &TrackTags,
    ) -> Result<(), VkdlError> {
        let result = Command::new(&self.ffmpeg_path)
            .arg("-y")
            .arg("-i")
            .arg(input)
            .arg("-vn")
            .arg("-acodec")
            .arg("libmp3lame")
            .arg("-ab")
            .arg(format!("{}k", self.bitrate_kbps))
            .arg("-metadata")
            .arg(format!("artist={}", tags.artist.as_deref().unwrap_or("")))
            .arg("-metadata")
            .arg(format!("title={}", tags.title.as_deref().unwrap_or("")))
            .arg(output)
            .output()
            .await?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(VkdlError::TranscodeError {
                status: result.status.code().unwrap_or(-1),
                message: stderr.lines().last().unwrap_or("").to_string(),
            });
        }
        Ok(())
    }
}
