use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub number: u32,
    pub title: String,
    // falls back to the album artists when empty
    #[serde(default)]
    pub artists: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Disc {
    pub number: u32,
    #[serde(default)]
    pub tracks: Vec<Track>,
}

/// Release metadata as handed over by the catalog lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Album {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub artists: Vec<String>,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub catnumbers: Vec<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub styles: Vec<String>,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub discs: Vec<Disc>,
    /// Image URLs, cover first.
    #[serde(default)]
    pub images: Vec<String>,
}

impl Album {
    pub fn has_multi_disc(&self) -> bool {
        self.discs.len() > 1
    }
}
