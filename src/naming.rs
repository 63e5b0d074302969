//! Target names for a whole release.
//!
//! Builds the placeholder map for each track and runs the configured
//! templates through the formatting engine. Turning the result into a legal
//! filesystem name is left to a [`Sanitizer`].

use crate::config::{Details, FileFormatting};
use crate::error::Result;
use crate::formatting;
use crate::formatting::functions::{zero_pad, MAX_PAD_WIDTH};
use crate::models::{Album, Disc, Track};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::debug;

/// Cleans one rendered path component (forbidden characters, case, ...).
pub trait Sanitizer {
    fn sanitize(&self, component: &str) -> String;
}

/// Leaves names exactly as the templates produced them.
pub struct PassThrough;

impl Sanitizer for PassThrough {
    fn sanitize(&self, component: &str) -> String {
        component.to_string()
    }
}

/// Placeholder values for one track of a release.
#[derive(Debug, Clone, Default)]
pub struct PropertyMap(HashMap<String, String>);

impl PropertyMap {
    /// Values describing the release only; track fields stay blank.
    pub fn for_album(album: &Album, details: &Details) -> Self {
        let mut m = HashMap::new();
        let album_artist = album.artists.join(details.join_artists.as_str());
        let genre = if details.use_style {
            album.styles.join(details.join_genres_and_styles.as_str())
        } else {
            album.genres.join(details.join_genres_and_styles.as_str())
        };
        let first = |v: &[String]| v.first().cloned().unwrap_or_default();

        m.insert("ALBTITLE".into(), album.title.clone());
        m.insert("ALBUM".into(), album.title.clone());
        m.insert("ALBARTIST".into(), album_artist.clone());
        m.insert("ALBUMARTIST".into(), album_artist);
        m.insert("YEAR".into(), album.year.clone());
        m.insert("CATNO".into(), first(&album.catnumbers));
        m.insert("LABEL".into(), first(&album.labels));
        m.insert("GENRE".into(), genre);
        m.insert("STYLE".into(), album.styles.join(details.join_genres_and_styles.as_str()));
        m.insert("COUNTRY".into(), album.country.clone());
        m.insert("TOTALDISCS".into(), album.discs.len().to_string());
        PropertyMap(m)
    }

    /// Values for one disc (used by the disc folder template).
    pub fn for_disc(album: &Album, disc: &Disc, details: &Details) -> Self {
        let mut map = Self::for_album(album, details);
        map.0.insert("DISCNO".into(), disc.number.to_string());
        map.0.insert("DISCNUMBER".into(), disc.number.to_string());
        map.0.insert("TOTALTRACKS".into(), disc.tracks.len().to_string());
        map
    }

    /// Full set for one track. `file_type` is the extension including the dot.
    pub fn for_track(
        album: &Album,
        disc: &Disc,
        track: &Track,
        file_type: &str,
        details: &Details,
    ) -> Self {
        let mut map = Self::for_disc(album, disc, details);
        let artists = if track.artists.is_empty() { &album.artists } else { &track.artists };
        let width = details.track_number_width.min(MAX_PAD_WIDTH);
        let m = &mut map.0;
        m.insert("ARTIST".into(), artists.join(details.join_artists.as_str()));
        m.insert("TITLE".into(), track.title.clone());
        m.insert("TRACKNO".into(), zero_pad(&track.number.to_string(), width));
        m.insert("TRACK".into(), track.number.to_string());
        m.insert("TYPE".into(), file_type.to_string());
        m.insert("FILEEXT".into(), file_type.to_string());
        m.insert("CODEC".into(), file_type.trim_start_matches('.').to_string());
        map
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(|s| s.as_str())
    }

    pub fn as_map(&self) -> &HashMap<String, String> {
        &self.0
    }
}

/// Where one track ends up, relative to the album directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackTarget {
    pub disc: u32,
    pub track: u32,
    pub relative_path: PathBuf,
}

/// All names derived for a release.
#[derive(Debug, Clone)]
pub struct Plan {
    pub album_dir: PathBuf,
    pub m3u: String,
    pub nfo: String,
    pub images: Vec<String>,
    pub tracks: Vec<TrackTarget>,
}

pub struct Namer<'a> {
    formats: &'a FileFormatting,
    details: &'a Details,
    sanitizer: Box<dyn Sanitizer + 'a>,
}

impl<'a> Namer<'a> {
    pub fn new(formats: &'a FileFormatting, details: &'a Details) -> Self {
        Namer { formats, details, sanitizer: Box::new(PassThrough) }
    }

    pub fn with_sanitizer(mut self, sanitizer: impl Sanitizer + 'a) -> Self {
        self.sanitizer = Box::new(sanitizer);
        self
    }

    fn render(&self, template: &str, props: &PropertyMap) -> Result<String> {
        let out = formatting::evaluate(template, props.as_map())?;
        Ok(self.sanitizer.sanitize(&out))
    }

    /// Render a template that may span directories. Each part between
    /// top-level `/` separators is rendered and sanitized on its own; a `/`
    /// inside a call's arguments stays with its call.
    fn render_path(&self, template: &str, props: &PropertyMap) -> Result<PathBuf> {
        let mut path = PathBuf::new();
        for part in formatting::split_top_level(template, '/') {
            let rendered = self.render(part, props)?;
            if !rendered.is_empty() {
                path.push(rendered);
            }
        }
        Ok(path)
    }

    pub fn album_dir(&self, album: &Album) -> Result<PathBuf> {
        self.render_path(&self.formats.dir, &PropertyMap::for_album(album, self.details))
    }

    /// Folder for a disc, or `None` on single disc releases.
    pub fn disc_dir(&self, album: &Album, disc: &Disc) -> Result<Option<String>> {
        if !album.has_multi_disc() {
            return Ok(None);
        }
        let props = PropertyMap::for_disc(album, disc, self.details);
        self.render(&self.formats.discs, &props).map(Some)
    }

    /// Track path below the album (or disc) directory.
    pub fn track_file(
        &self,
        album: &Album,
        disc: &Disc,
        track: &Track,
        file_type: &str,
    ) -> Result<PathBuf> {
        let props = PropertyMap::for_track(album, disc, track, file_type, self.details);
        let various = props.get("ALBARTIST") == Some(self.details.various_artists_name.as_str());
        let template = if various { &self.formats.va_song } else { &self.formats.song };
        self.render_path(template, &props)
    }

    pub fn m3u_file(&self, album: &Album) -> Result<String> {
        self.render(&self.formats.m3u, &PropertyMap::for_album(album, self.details))
    }

    pub fn nfo_file(&self, album: &Album) -> Result<String> {
        self.render(&self.formats.nfo, &PropertyMap::for_album(album, self.details))
    }

    /// File names for the release images: the cover gets `first_image`, the
    /// rest `<images>-NN.jpg` numbered by position.
    pub fn image_files(&self, album: &Album) -> Result<Vec<String>> {
        let props = PropertyMap::for_album(album, self.details);
        let mut names = Vec::with_capacity(album.images.len());
        for index in 0..album.images.len() {
            let name = if index == 0 {
                self.render(&self.formats.first_image, &props)?
            } else {
                let base = formatting::evaluate(&self.formats.images, props.as_map())?;
                let numbered = format!("{}-{}.jpg", base, zero_pad(&index.to_string(), 2));
                self.sanitizer.sanitize(&numbered)
            };
            names.push(name);
        }
        Ok(names)
    }

    /// Name every target of the release. The first error aborts the plan,
    /// since a broken template miscomputes every name derived from it.
    pub fn plan(&self, album: &Album, file_type: &str) -> Result<Plan> {
        let mut tracks = Vec::new();
        for disc in &album.discs {
            let disc_dir = self.disc_dir(album, disc)?;
            for track in &disc.tracks {
                let file = self.track_file(album, disc, track, file_type)?;
                let relative_path = match &disc_dir {
                    Some(d) => PathBuf::from(d).join(file),
                    None => file,
                };
                debug!(
                    disc = disc.number,
                    track = track.number,
                    path = %relative_path.display(),
                    "planned track"
                );
                tracks.push(TrackTarget { disc: disc.number, track: track.number, relative_path });
            }
        }
        Ok(Plan {
            album_dir: self.album_dir(album)?,
            m3u: self.m3u_file(album)?,
            nfo: self.nfo_file(album)?,
            images: self.image_files(album)?,
            tracks,
        })
    }
}
