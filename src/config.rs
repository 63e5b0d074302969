use crate::formatting::functions::MAX_PAD_WIDTH;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// `EnvFilter` directive used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub file_formatting: FileFormatting,
    #[serde(default)]
    pub details: Details,
    /// Directory for the daily rotated log file. Logs only go to stderr when unset.
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

/// Naming templates, one per kind of target.
#[derive(Debug, Deserialize, Clone)]
pub struct FileFormatting {
    #[serde(default = "default_dir")]
    pub dir: String,
    #[serde(default = "default_song")]
    pub song: String,
    #[serde(default = "default_va_song")]
    pub va_song: String,
    #[serde(default = "default_discs")]
    pub discs: String,
    #[serde(default = "default_m3u")]
    pub m3u: String,
    #[serde(default = "default_nfo")]
    pub nfo: String,
    /// Base name for release images after the first one.
    #[serde(default = "default_images")]
    pub images: String,
    #[serde(default = "default_first_image")]
    pub first_image: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Details {
    /// Album artist that selects the `va_song` template.
    #[serde(default = "default_various_artists_name")]
    pub various_artists_name: String,
    #[serde(default = "default_join_artists")]
    pub join_artists: String,
    #[serde(default = "default_join_genres")]
    pub join_genres_and_styles: String,
    #[serde(default)]
    pub use_style: bool,
    #[serde(default = "default_track_number_width")]
    pub track_number_width: usize,
}

fn default_dir() -> String { "%ALBARTIST%/[%YEAR%] %ALBTITLE%".into() }
fn default_song() -> String { "$num(%TRACK%,2) %TITLE%%TYPE%".into() }
fn default_va_song() -> String { "$num(%TRACK%,2) %ARTIST% - %TITLE%%TYPE%".into() }
fn default_discs() -> String { "CD %DISCNO%".into() }
fn default_m3u() -> String { "00-%ALBARTIST%-%ALBTITLE%.m3u".into() }
fn default_nfo() -> String { "00-%ALBARTIST%-%ALBTITLE%.nfo".into() }
fn default_images() -> String { "image".into() }
fn default_first_image() -> String { "folder.jpg".into() }
fn default_various_artists_name() -> String { "Various".into() }
fn default_join_artists() -> String { " & ".into() }
fn default_join_genres() -> String { ", ".into() }
fn default_track_number_width() -> usize { 2 }

impl Default for FileFormatting {
    fn default() -> Self {
        FileFormatting {
            dir: default_dir(),
            song: default_song(),
            va_song: default_va_song(),
            discs: default_discs(),
            m3u: default_m3u(),
            nfo: default_nfo(),
            images: default_images(),
            first_image: default_first_image(),
        }
    }
}

impl Default for Details {
    fn default() -> Self {
        Details {
            various_artists_name: default_various_artists_name(),
            join_artists: default_join_artists(),
            join_genres_and_styles: default_join_genres(),
            use_style: false,
            track_number_width: default_track_number_width(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            file_formatting: FileFormatting::default(),
            details: Details::default(),
            log_dir: None,
        }
    }
}

impl FileFormatting {
    /// All templates with the name of the setting they come from.
    pub fn templates(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("dir", self.dir.as_str()),
            ("song", self.song.as_str()),
            ("va_song", self.va_song.as_str()),
            ("discs", self.discs.as_str()),
            ("m3u", self.m3u.as_str()),
            ("nfo", self.nfo.as_str()),
            ("images", self.images.as_str()),
            ("first_image", self.first_image.as_str()),
        ]
    }
}

impl Config {
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let s = std::fs::read_to_string(path)?;
        let cfg: Config = toml::from_str(&s)?;
        if cfg.details.track_number_width > MAX_PAD_WIDTH {
            anyhow::bail!(
                "details.track_number_width = {} is larger than {}",
                cfg.details.track_number_width,
                MAX_PAD_WIDTH
            );
        }
        Ok(cfg)
    }

    /// `$XDG_CONFIG_HOME/music-naming/config.toml` (or the platform equivalent).
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("music-naming").join("config.toml"))
    }

    /// Load an explicit path, else the default location, else built-in defaults.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(p) = explicit {
            return Self::from_path(p);
        }
        match Self::default_path() {
            Some(p) if p.exists() => Self::from_path(&p),
            _ => {
                log::info!("no config file found; using built-in naming templates");
                Ok(Config::default())
            }
        }
    }
}
