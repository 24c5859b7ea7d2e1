use super::*;
use crate::error::TagError;
use crate::store::TagStore;
use crate::store::memory::MemoryTagStore;
use std::path::Path;

fn art(bytes: &[u8]) -> CoverArt {
    CoverArt {
        data: bytes.to_vec(),
        mime_type: "image/png".to_string(),
    }
}

#[test]
fn alias_parsing_accepts_the_closed_set_only() {
    assert_eq!("title".parse::<TagAlias>(), Ok(TagAlias::Title));
    assert_eq!("TrackNumber".parse::<TagAlias>(), Ok(TagAlias::TrackNumber));
    assert_eq!(" genre ".parse::<TagAlias>(), Ok(TagAlias::Genre));
    assert_eq!(
        "author".parse::<TagAlias>(),
        Err(TagError::InvalidAlias("author".to_string()))
    );
    assert_eq!(
        "reconciled_at".parse::<TagAlias>(),
        Err(TagError::ReadOnlyTag("reconciled_at".to_string()))
    );
}

#[test]
fn alias_names_round_trip_through_display() {
    for alias in TagAlias::ALL {
        assert_eq!(alias.to_string().parse::<TagAlias>(), Ok(alias));
    }
}

#[test]
fn set_tag_marks_modified_only_on_change() {
    let store = MemoryTagStore::new();
    store.insert("/m/a.mp3", &[(TagAlias::Artist, "Band")]);
    let mut track = Track::load("/m/a.mp3", &store).unwrap();

    track.set_tag(TagAlias::Artist, "Band");
    assert!(!track.is_modified());

    track.set_tag(TagAlias::Artist, "Other");
    assert!(track.is_modified());
    assert_eq!(track.get_tag(TagAlias::Artist), Some("Other"));
}

#[test]
fn blank_value_removes_tag() {
    let store = MemoryTagStore::new();
    store.insert("/m/a.mp3", &[(TagAlias::Genre, "Rock")]);
    let mut track = Track::load("/m/a.mp3", &store).unwrap();

    track.set_tag(TagAlias::Genre, "   ");
    assert_eq!(track.get_tag(TagAlias::Genre), None);
    assert!(track.is_modified());
}

#[test]
fn remove_absent_tag_is_not_a_modification() {
    let store = MemoryTagStore::new();
    store.insert("/m/a.mp3", &[]);
    let mut track = Track::load("/m/a.mp3", &store).unwrap();
    track.remove_tag(TagAlias::TrackTotal);
    assert!(!track.is_modified());
}

#[test]
fn named_access_surfaces_alias_errors() {
    let store = MemoryTagStore::new();
    store.insert("/m/a.mp3", &[(TagAlias::Title, "Song")]);
    let mut track = Track::load("/m/a.mp3", &store).unwrap();

    assert_eq!(track.get_tag_named("title"), Ok(Some("Song".to_string())));
    assert_eq!(track.get_tag_named("reconciled_at"), Ok(None));
    assert!(matches!(
        track.get_tag_named("mood"),
        Err(TagError::InvalidAlias(_))
    ));
    assert!(matches!(
        track.set_tag_named("reconciled_at", Some("2020-01-01")),
        Err(TagError::ReadOnlyTag(_))
    ));
    assert!(matches!(
        track.set_tag_named("lyrics", Some("la la")),
        Err(TagError::InvalidAlias(_))
    ));
    assert!(!track.is_modified());

    track.set_tag_named("composer", Some("Someone")).unwrap();
    assert_eq!(track.get_tag(TagAlias::Composer), Some("Someone"));
}

#[test]
fn write_is_noop_when_unmodified() {
    let store = MemoryTagStore::new();
    store.insert("/m/a.mp3", &[(TagAlias::Title, "Song")]);
    let mut track = Track::load("/m/a.mp3", &store).unwrap();

    assert!(!track.write(&store).unwrap());
    assert_eq!(store.writes(), 0);
    assert_eq!(track.last_reconciled_at(), None);
}

#[test]
fn write_persists_once_and_stamps_time() {
    let store = MemoryTagStore::new();
    store.insert("/m/a.mp3", &[(TagAlias::Title, "Song")]);
    let mut track = Track::load("/m/a.mp3", &store).unwrap();

    track.set_tag(TagAlias::Album, "Record");
    track.remove_tag(TagAlias::Title);
    assert!(track.write(&store).unwrap());
    assert_eq!(store.writes(), 1);
    assert!(!track.is_modified());

    let snap = store.snapshot(Path::new("/m/a.mp3")).unwrap();
    assert_eq!(snap.tags.get(&TagAlias::Album).map(String::as_str), Some("Record"));
    assert!(!snap.tags.contains_key(&TagAlias::Title));
    assert!(snap.reconciled_at.is_some());
    assert_eq!(track.last_reconciled_at(), snap.reconciled_at);

    // Nothing changed since: no second persistence call.
    assert!(!track.write(&store).unwrap());
    assert_eq!(store.writes(), 1);
}

#[test]
fn load_reports_malformed_container() {
    let store = MemoryTagStore::new();
    store.insert("/m/bad.flac", &[]);
    store.mark_broken("/m/bad.flac");
    let err = Track::load("/m/bad.flac", &store).unwrap_err();
    assert_eq!(err.path, Path::new("/m/bad.flac"));
}

#[test]
fn identical_cover_is_not_a_change() {
    let store = MemoryTagStore::new();
    store.insert("/m/a.mp3", &[]);
    store.set_cover(Path::new("/m/a.mp3"), art(b"png-bytes"));
    let mut track = Track::load("/m/a.mp3", &store).unwrap();

    assert!(track.has_cover());
    assert!(!track.set_cover(art(b"png-bytes")));
    assert!(!track.is_modified());

    assert!(track.set_cover(art(b"other")));
    assert!(track.is_modified());
    track.write(&store).unwrap();
    let snap = store.snapshot(Path::new("/m/a.mp3")).unwrap();
    assert_eq!(snap.cover.unwrap().data, b"other".to_vec());
}

#[test]
fn clear_covers_persists_removal() {
    let store = MemoryTagStore::new();
    store.insert("/m/a.flac", &[]);
    store.set_cover(Path::new("/m/a.flac"), art(b"x"));
    let mut track = Track::load("/m/a.flac", &store).unwrap();

    track.clear_covers();
    assert!(!track.has_cover());
    track.write(&store).unwrap();
    assert!(store.snapshot(Path::new("/m/a.flac")).unwrap().cover.is_none());

    // Already bare: clearing again changes nothing.
    track.clear_covers();
    assert!(!track.is_modified());
}

#[test]
fn stem_and_directory_come_from_path() {
    let store = MemoryTagStore::new();
    store.insert("/music/album/track05.flac", &[]);
    let track = Track::load("/music/album/track05.flac", &store).unwrap();
    assert_eq!(track.stem(), Some("track05"));
    assert_eq!(track.directory(), Path::new("/music/album"));
    assert!(store.read(track.path()).is_ok());
}
