use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// A VK audio link, e.g. `https://vk.com/audio-2001545048_123456789`.
    /// Anything containing an `audio{owner}_{id}` reference works.
    /// May be omitted when only saving a token.
    pub input: Option<String>,

    /// VK API access token. Falls back to the token stored in the OS keyring.
    #[arg(short, long)]
    pub token: Option<String>,

    /// Store the token given with --token in the OS keyring for later runs.
    #[arg(long, default_value_t = false)]
    pub save_token: bool,

    /// Directory to save the final audio file in. Defaults to the current directory.
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// MP3 bitrate in kbit/s
    #[arg(long, value_name = "KBPS")]
    pub bitrate: Option<u32>,

    /// Path of the ffmpeg binary to invoke for transcoding
    #[arg(long, value_name = "PATH")]
    pub ffmpeg_path: Option<PathBuf>,

    /// User agent to use for making requests
    #[arg(short = 'U', long)]
    pub user_agent: Option<String>,
}
