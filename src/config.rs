use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::{fs, io};

/// Persistent preferences. Fields are optional so that unspecified values
/// can fall back to code defaults; the API token never lives here.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub save_dir: Option<PathBuf>,
    pub bitrate_kbps: Option<u32>,
    pub ffmpeg_path: Option<PathBuf>,
    pub user_agent: Option<String>,
}

impl Config {
    /// Path to the config file inside the provided data dir.
    pub fn config_path_for_dir<P: AsRef<Path>>(data_dir: P) -> PathBuf {
        let mut p = data_dir.as_ref().to_path_buf();
        p.push("config.toml");
        p
    }

    /// Load configuration from the given directory's `config.toml`.
    /// If file does not exist, returns Ok(Default::default()).
    pub fn load_from_dir<P: AsRef<Path>>(data_dir: P) -> Result<Config, io::Error> {
        let path = Config::config_path_for_dir(data_dir);
        if !path.exists() {
            return Ok(Config::default());
        }
        let s = fs::read_to_string(&path)?;
        let cfg: Config =
            toml::from_str(&s).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        Ok(cfg)
    }

    /// Save configuration to `data_dir/config.toml`. Creates parent dir if needed.
    pub fn save_to_dir<P: AsRef<Path>>(&self, data_dir: P) -> Result<(), io::Error> {
        let cfg_path = Config::config_path_for_dir(data_dir);
        if let Some(p) = cfg_path.parent() {
            fs::create_dir_all(p)?;
        }
        let s = toml::to_string_pretty(&self).map_err(io::Error::other)?;
        fs::write(cfg_path, s)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let cfg = Config::load_from_dir(dir.path()).unwrap();
        assert!(cfg.save_dir.is_none());
        assert!(cfg.bitrate_kbps.is_none());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempdir().unwrap();
        let cfg = Config {
            save_dir: Some(PathBuf::from("/music")),
            bitrate_kbps: Some(256),
            ffmpeg_path: None,
            user_agent: Some("vkdl-test".to_string()),
        };
        cfg.save_to_dir(dir.path()).unwrap();
        let loaded = Config::load_from_dir(dir.path()).unwrap();
        assert_eq!(loaded.save_dir.as_deref(), Some(Path::new("/music")));
        assert_eq!(loaded.bitrate_kbps, Some(256));
        assert_eq!(loaded.user_agent.as_deref(), Some("vkdl-test"));
    }
}
