use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::info_span;
use tracing_indicatif::{IndicatifLayer, span_ext::IndicatifSpanExt};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use vkdl::{
    config::Config, credentials::Credentials, downloader::AudioDownloaderBuilder,
    error::VkdlError, fs_utils, transcode::FfmpegTranscoder,
};

mod args;
use args::Args;

const DEFAULT_BITRATE_KBPS: u32 = 320;

#[tokio::main]
async fn main() -> Result<(), VkdlError> {
    let args = Args::parse();

    let data_dir = fs_utils::get_data_dir();
    let config = Config::load_from_dir(&data_dir)?;

    if args.save_token {
        let Some(token) = &args.token else {
            return Err(VkdlError::CliArgumentError {
                message: "--save-token requires --token".to_string(),
            });
        };
        Credentials::new(token).save_to_keyring().await?;
        println!("Token saved");
        if args.input.is_none() {
            return Ok(());
        }
    }

    let Some(input) = &args.input else {
        return Err(VkdlError::CliArgumentError {
            message: "No audio link given".to_string(),
        });
    };

    let token = match &args.token {
        Some(token) => token.clone(),
        None => match Credentials::load_from_keyring().await? {
            Some(creds) => creds.token().to_string(),
            None => {
                return Err(VkdlError::CliArgumentError {
                    message: "No token given and none stored. Pass --token, optionally with --save-token.".to_string(),
                });
            }
        },
    };

    let indicatif_layer = IndicatifLayer::new();
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(indicatif_layer.get_stderr_writer()))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(indicatif_layer)
        .init();

    let save_dir = args
        .output
        .clone()
        .or_else(|| config.save_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."));
    let bitrate = args
        .bitrate
        .or(config.bitrate_kbps)
        .unwrap_or(DEFAULT_BITRATE_KBPS);
    let ffmpeg_path = args
        .ffmpeg_path
        .clone()
        .or_else(|| config.ffmpeg_path.clone())
        .unwrap_or_else(|| PathBuf::from("ffmpeg"));
    let user_agent = args.user_agent.clone().or_else(|| config.user_agent.clone());

    let transcoder = Arc::new(FfmpegTranscoder::new(ffmpeg_path, bitrate));
    let dl = AudioDownloaderBuilder::default()
        .download_dir(data_dir.join("staging"))
        .save_dir(save_dir)
        .user_agent(user_agent)
        .transcoder(transcoder)
        .build()?;

    let progress_span = info_span!("download");
    progress_span.pb_set_length(100);
    let result = {
        let _enter = progress_span.enter();
        dl.download(input, &token, |pct| {
            progress_span.pb_set_position(pct as u64);
        })
        .await
    };

    match result {
        Ok(path) => {
            println!("Saved: {}", path.display());
            Ok(())
        }
        Err(e) => {
            eprintln!("Download failed: {}", e);
            std::process::exit(1);
        }
    }
}
