use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use tempfile::tempdir;

use music_file_naming::config::{Details, FileFormatting};
use music_file_naming::models::Album;
use music_file_naming::naming::Namer;
use music_file_naming::util;

const ALBUM_JSON: &str = r#"{
  "id": "7412",
  "title": "Modern EBM",
  "artists": ["Various"],
  "year": "2016",
  "labels": ["Out Of Line"],
  "catnumbers": ["OUT 123"],
  "genres": ["Electronic"],
  "discs": [
    { "number": 1, "tracks": [
      { "number": 5, "title": "Dead technology", "artists": ["Advance"] }
    ]},
    { "number": 2, "tracks": [
      { "number": 1, "title": "Opener", "artists": ["Rotersand"] }
    ]}
  ]
}"#;

fn load_album() -> Album {
    let td = tempdir().unwrap();
    let path = td.path().join("album.json");
    File::create(&path).unwrap().write_all(ALBUM_JSON.as_bytes()).unwrap();
    util::read_data_file(&path).expect("parse album")
}

#[test]
fn plan_various_artists_multi_disc() {
    let album = load_album();
    let formats = FileFormatting::default();
    let details = Details::default();
    let plan = Namer::new(&formats, &details).plan(&album, ".flac").unwrap();

    assert_eq!(plan.album_dir, PathBuf::from("Various/[2016] Modern EBM"));
    assert_eq!(plan.tracks.len(), 2);
    assert_eq!(
        plan.tracks[0].relative_path,
        PathBuf::from("CD 1/05 Advance - Dead technology.flac")
    );
    assert_eq!(
        plan.tracks[1].relative_path,
        PathBuf::from("CD 2/01 Rotersand - Opener.flac")
    );
    assert!(plan.images.is_empty());
    assert_eq!(plan.m3u, "00-Various-Modern EBM.m3u");
    assert_eq!(plan.nfo, "00-Various-Modern EBM.nfo");
}

#[test]
fn single_disc_uses_song_template_without_disc_folder() {
    let mut album = load_album();
    album.artists = vec!["Advance".into()];
    album.discs.truncate(1);
    let formats = FileFormatting {
        song: concat!(
            "$num(%TRACK%,2) ",
            "$if1($strcmp(%ARTIST%,%ALBARTIST%),,%ARTIST% - )%TITLE%%TYPE%"
        )
        .into(),
        ..FileFormatting::default()
    };
    let details = Details::default();
    let namer = Namer::new(&formats, &details);

    assert_eq!(namer.disc_dir(&album, &album.discs[0]).unwrap(), None);
    let plan = namer.plan(&album, ".mp3").unwrap();
    assert_eq!(plan.tracks[0].relative_path, PathBuf::from("05 Dead technology.mp3"));
}

#[test]
fn compilation_dir_with_slash_inside_call() {
    let album = load_album();
    let formats = FileFormatting {
        dir: "$if1($strcmp(%ALBARTIST%,Various),Compilations/%ALBTITLE%,%ALBARTIST%)".into(),
        ..FileFormatting::default()
    };
    let details = Details::default();
    let plan = Namer::new(&formats, &details).plan(&album, ".flac").unwrap();
    assert_eq!(plan.album_dir, PathBuf::from("Compilations/Modern EBM"));
}

#[test]
fn broken_template_aborts_plan() {
    let album = load_album();
    let formats = FileFormatting {
        song: "$num(%TRACK%".into(),
        va_song: "$num(%TRACK%".into(),
        ..FileFormatting::default()
    };
    let details = Details::default();
    assert!(Namer::new(&formats, &details).plan(&album, ".flac").is_err());
}

#[test]
fn metadata_file_values_are_stringified() {
    let td = tempdir().unwrap();
    let path = td.path().join("track.toml");
    File::create(&path)
        .unwrap()
        .write_all(b"TITLE = \"Intro\"\nTRACK = 3\n")
        .unwrap();
    let m = util::load_metadata(&path).unwrap();
    assert_eq!(music_file_naming::evaluate("$num(%TRACK%,2) %TITLE%", &m).unwrap(), "03 Intro");
}
