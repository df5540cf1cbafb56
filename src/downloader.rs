use std::path::PathBuf;
use std::sync::Arc;

use derive_builder::Builder;
use reqwest::Client;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info};

use crate::api::{self, API_BASE};
use crate::error::VkdlError;
use crate::fs_utils;
use crate::manifest;
use crate::resource::ResourceDescriptor;
use crate::transcode::{TrackTags, Transcoder};

pub mod assemble;

/// Drives the whole acquisition pipeline for one audio resource:
/// link → metadata lookup → playlist parse → segment assembly → transcode.
///
/// Strictly sequential; a single instance holds no mutable state, so separate
/// downloads can run side by side without interfering.
#[derive(Builder)]
pub struct AudioDownloader {
    /// Base URL of the lookup API. Overridable for tests.
    #[builder(default = API_BASE.to_string())]
    api_base: String,
    /// Where the raw transport stream is staged before transcoding.
    #[builder(default = fs_utils::get_data_dir())]
    download_dir: PathBuf,
    /// Where the final audio file ends up.
    #[builder(default = PathBuf::from("."))]
    save_dir: PathBuf,
    /// User agent to use for all requests, if any.
    #[builder(default = None)]
    user_agent: Option<String>,
    /// External encoder invoked on the assembled stream.
    transcoder: Arc<dyn Transcoder>,
}

impl AudioDownloader {
    pub fn save_dir(&self) -> &PathBuf {
        &self.save_dir
    }

    fn build_client(&self) -> Result<Client, VkdlError> {
        let mut builder = Client::builder();
        if let Some(user_agent) = &self.user_agent {
            builder = builder.user_agent(user_agent);
        }
        Ok(builder.build()?)
    }

    /// Downloads one track and returns the path of the final audio file.
    ///
    /// `on_progress` receives assembly progress as a 0–100 percentage from
    /// the calling task's context; marshalling it elsewhere is up to the
    /// caller. Every failure aborts the rest of the pipeline, and the staged
    /// temp file is removed before the error is returned.
    pub async fn download<F>(
        &self,
        link: &str,
        token: &str,
        mut on_progress: F,
    ) -> Result<PathBuf, VkdlError>
    where
        F: FnMut(u8),
    {
        let resource = ResourceDescriptor::parse(link)?;
        let client = self.build_client()?;

        let info = api::get_audio_by_id(&client, &self.api_base, &resource, token).await?;
        debug!(owner = %resource.owner_id, item = %resource.item_id, "resolved playlist url");

        let resp = client.get(&info.playlist_url).send().await?;
        if !resp.status().is_success() {
            return Err(VkdlError::NetworkError {
                message: format!(
                    "playlist request failed with HTTP status {}",
                    resp.status().as_u16()
                ),
            });
        }
        let playlist_text = resp.text().await?;

        let base_url = manifest::base_url_of(&info.playlist_url);
        let segments = manifest::parse_playlist(&client, &playlist_text, &base_url).await?;
        if segments.is_empty() {
            return Err(VkdlError::EmptyPlaylist);
        }
        info!(segments = segments.len(), "parsed playlist");

        tokio::fs::create_dir_all(&self.download_dir).await?;
        let ts_path = self
            .download_dir
            .join(format!("audio_{}_{}.ts", resource.owner_id, resource.item_id));

        let assembled = self
            .assemble_to_file(&client, &segments, &ts_path, &mut on_progress)
            .await;
        if let Err(e) = assembled {
            let _ = tokio::fs::remove_file(&ts_path).await;
            return Err(e);
        }

        tokio::fs::create_dir_all(&self.save_dir).await?;
        let filename = fs_utils::audio_filename(&info, &resource);
        let out_path = self.save_dir.join(&filename);
        let tags = TrackTags {
            artist: info.artist.clone(),
            title: info.title.clone(),
        };

        let transcoded = self.transcoder.transcode(&ts_path, &out_path, &tags).await;
        let _ = tokio::fs::remove_file(&ts_path).await;
        transcoded?;

        info!(file = %out_path.display(), "download finished");
        Ok(out_path)
    }

    async fn assemble_to_file<F>(
        &self,
        client: &Client,
        segments: &[manifest::Segment],
        ts_path: &PathBuf,
        on_progress: &mut F,
    ) -> Result<(), VkdlError>
    where
        F: FnMut(u8),
    {
        let file = tokio::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(ts_path)
            .await?;
        let mut sink = BufWriter::new(file);
        assemble::assemble_segments(client, segments, &mut sink, on_progress).await?;
        sink.flush().await?;
        Ok(())
    }
}
