use std::borrow::Cow;
use std::cell::RefCell;
use std::fs::File;
use std::path::{Path, PathBuf};

use lofty::TextEncoding;
use lofty::config::{ParseOptions, ParsingMode, WriteOptions};
use lofty::error::LoftyError;
use lofty::file::TaggedFileExt;
use lofty::id3::v2::{Frame, FrameId, Id3v2Tag, TextInformationFrame};
use lofty::mpeg::MpegFile;
use lofty::picture::{MimeType, Picture, PictureType};
use lofty::prelude::*;
use lofty::probe::Probe;
use lofty::tag::{ItemKey, ItemValue, Tag, TagItem, TagType};
use tracing::debug;

use super::index::ReconcileIndex;
use super::{TagStore, TrackSnapshot, TrackWrite};
use crate::error::StoreError;
use crate::track::{CoverArt, CoverUpdate, TagAlias, normalize_value};

/// Audio extensions with a container implementation (lowercase, no dot).
pub const AUDIO_EXTENSIONS: [&str; 2] = ["mp3", "flac"];

/// Format-specific mapping between aliases and native tag items.
///
/// Containers hand out a generic [`Tag`] whose track number and total are
/// plain text items, whatever the native layout of those fields.
pub trait TagContainer {
    fn name(&self) -> &'static str;

    /// The tag layer this container reads and writes.
    fn tag_type(&self) -> TagType;

    fn item_key(&self, alias: TagAlias) -> ItemKey;

    /// Legacy item consulted on read when the primary one is absent. It is
    /// dropped on every write so it cannot shadow the primary value.
    fn fallback_key(&self, _alias: TagAlias) -> Option<ItemKey> {
        None
    }

    /// Read the tag layer of `path`, `None` when the file has none yet.
    fn load(&self, path: &Path) -> Result<Option<Tag>, LoftyError>;

    /// Replace the tag layer of `path` with `tag`.
    fn save(&self, path: &Path, tag: Tag) -> Result<(), LoftyError>;
}

const TRACK_FRAME: FrameId<'static> = FrameId::Valid(Cow::Borrowed("TRCK"));

/// `TXXX` description holding the total when there is no number to pair it with.
const TRACK_TOTAL_DESCRIPTION: &str = "TRACKTOTAL";

/// ID3v2 text frames, as found in `.mp3` files.
///
/// `TRCK` is handled as text: `n`, `n/total`, or absent. A total without a
/// number goes to a `TXXX:TRACKTOTAL` frame, since `TRCK` cannot carry it.
pub struct Id3v2Container;

impl TagContainer for Id3v2Container {
    fn name(&self) -> &'static str {
        "ID3v2"
    }

    fn tag_type(&self) -> TagType {
        TagType::Id3v2
    }

    fn item_key(&self, alias: TagAlias) -> ItemKey {
        common_item_key(alias)
    }

    fn fallback_key(&self, alias: TagAlias) -> Option<ItemKey> {
        // ID3v2.3 files carry the date in TYER instead of TDRC.
        match alias {
            TagAlias::Date => Some(ItemKey::Year),
            _ => None,
        }
    }

    fn load(&self, path: &Path) -> Result<Option<Tag>, LoftyError> {
        let mut file = File::open(path)?;
        let mut mpeg = MpegFile::read_from(&mut file, parse_options())?;
        let Some(id3) = mpeg.remove_id3v2() else {
            return Ok(None);
        };

        let (number, mut total) = id3
            .get_text(&TRACK_FRAME)
            .map(split_numbering)
            .unwrap_or_default();
        if total.is_none() {
            total = id3
                .get_user_text(TRACK_TOTAL_DESCRIPTION)
                .and_then(normalize_value);
        }

        let mut tag = Tag::from(id3);
        set_numbering(&mut tag, number, total);
        Ok(Some(tag))
    }

    fn save(&self, path: &Path, mut tag: Tag) -> Result<(), LoftyError> {
        let (number, total) = take_numbering(&mut tag);
        let mut id3 = Id3v2Tag::from(tag);
        let _ = id3.remove(&TRACK_FRAME);
        let _ = id3.remove_user_text(TRACK_TOTAL_DESCRIPTION);

        match (number, total) {
            (Some(number), total) => {
                let text = match total {
                    Some(total) => format!("{number}/{total}"),
                    None => number,
                };
                id3.insert(Frame::Text(TextInformationFrame::new(
                    TRACK_FRAME,
                    TextEncoding::UTF8,
                    text,
                )));
            }
            (None, Some(total)) => {
                id3.insert_user_text(TRACK_TOTAL_DESCRIPTION.to_string(), total);
            }
            (None, None) => {}
        }

        id3.save_to_path(path, WriteOptions::default())
    }
}

/// Vorbis comments, as found in `.flac` files.
pub struct VorbisContainer;

impl TagContainer for VorbisContainer {
    fn name(&self) -> &'static str {
        "Vorbis comments"
    }

    fn tag_type(&self) -> TagType {
        TagType::VorbisComments
    }

    fn item_key(&self, alias: TagAlias) -> ItemKey {
        common_item_key(alias)
    }

    fn load(&self, path: &Path) -> Result<Option<Tag>, LoftyError> {
        // Without implicit conversions TRACKNUMBER comes back verbatim
        // instead of being parsed into integers.
        let tagged = Probe::open(path)?
            .options(parse_options().implicit_conversions(false))
            .read()?;
        let Some(mut tag) = tagged.tag(TagType::VorbisComments).cloned() else {
            return Ok(None);
        };

        // Other taggers write TRACKNUMBER=n/total.
        if let Some((number, total)) = tag
            .get_string(ItemKey::TrackNumber)
            .filter(|raw| raw.contains('/'))
            .map(split_numbering)
        {
            let total = total.or_else(|| {
                tag.get_string(ItemKey::TrackTotal)
                    .and_then(normalize_value)
            });
            set_numbering(&mut tag, number, total);
        }
        Ok(Some(tag))
    }

    fn save(&self, path: &Path, tag: Tag) -> Result<(), LoftyError> {
        tag.save_to_path(path, WriteOptions::default())
    }
}

fn common_item_key(alias: TagAlias) -> ItemKey {
    match alias {
        TagAlias::Title => ItemKey::TrackTitle,
        TagAlias::Artist => ItemKey::TrackArtist,
        TagAlias::Album => ItemKey::AlbumTitle,
        TagAlias::Date => ItemKey::RecordingDate,
        TagAlias::Composer => ItemKey::Composer,
        TagAlias::TrackNumber => ItemKey::TrackNumber,
        TagAlias::TrackTotal => ItemKey::TrackTotal,
        TagAlias::Genre => ItemKey::Genre,
    }
}

/// Split a combined `n/total` field. A blank or zero number is absent.
fn split_numbering(raw: &str) -> (Option<String>, Option<String>) {
    let (number, total) = match raw.split_once('/') {
        Some((number, total)) => (number, Some(total)),
        None => (raw, None),
    };
    let number = normalize_value(number).filter(|n| n.parse::<u32>() != Ok(0));
    (number, total.and_then(normalize_value))
}

fn set_numbering(tag: &mut Tag, number: Option<String>, total: Option<String>) {
    for (key, value) in [(ItemKey::TrackNumber, number), (ItemKey::TrackTotal, total)] {
        put_text(tag, key, value);
    }
}

/// Set or clear one text item. ID3v2 has no native home for a bare track
/// total, so the key mapping is not checked here; containers sort that out
/// on save.
fn put_text(tag: &mut Tag, key: ItemKey, value: Option<String>) {
    match value {
        Some(value) => tag.insert_unchecked(TagItem::new(key, ItemValue::Text(value))),
        None => tag.remove_key(key),
    }
}

fn take_numbering(tag: &mut Tag) -> (Option<String>, Option<String>) {
    let number = tag.get_string(ItemKey::TrackNumber).and_then(normalize_value);
    let total = tag.get_string(ItemKey::TrackTotal).and_then(normalize_value);
    tag.remove_key(ItemKey::TrackNumber);
    tag.remove_key(ItemKey::TrackTotal);
    (number, total)
}

/// Pick the container for `path` by its extension (case-insensitive).
pub fn container_for(path: &Path) -> Option<&'static dyn TagContainer> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "mp3" => Some(&Id3v2Container),
        "flac" => Some(&VorbisContainer),
        _ => None,
    }
}

fn parse_options() -> ParseOptions {
    ParseOptions::new()
        .read_cover_art(true)
        .parsing_mode(ParsingMode::BestAttempt)
}

fn mime_type_of(mime: &str) -> MimeType {
    match mime {
        "image/jpeg" | "image/jpg" => MimeType::Jpeg,
        "image/png" => MimeType::Png,
        "image/bmp" => MimeType::Bmp,
        "image/gif" => MimeType::Gif,
        "image/tiff" => MimeType::Tiff,
        other => MimeType::Unknown(other.to_string()),
    }
}

/// Reads and writes tags on disk with `lofty`. Reconciliation stamps live in
/// a [`ReconcileIndex`] at the tree root, flushed once per pass.
pub struct LoftyTagStore {
    index: RefCell<ReconcileIndex>,
}

impl LoftyTagStore {
    pub fn open(root: &Path, index_file_name: &str) -> Result<Self, StoreError> {
        let index = ReconcileIndex::load(root.join(index_file_name), root)?;
        Ok(Self {
            index: RefCell::new(index),
        })
    }
}

impl TagStore for LoftyTagStore {
    fn read(&self, path: &Path) -> Result<TrackSnapshot, StoreError> {
        let container =
            container_for(path).ok_or_else(|| StoreError::Unsupported(path.to_path_buf()))?;
        let tag = container.load(path).map_err(|source| StoreError::Lofty {
            path: path.to_path_buf(),
            source,
        })?;

        let mut snapshot = TrackSnapshot {
            reconciled_at: self.index.borrow().get(path),
            ..TrackSnapshot::default()
        };

        let Some(tag) = tag else {
            debug!(path = %path.display(), container = container.name(), "no tag layer yet");
            return Ok(snapshot);
        };

        for alias in TagAlias::ALL {
            let raw = tag.get_string(container.item_key(alias)).or_else(|| {
                container
                    .fallback_key(alias)
                    .and_then(|key| tag.get_string(key))
            });
            if let Some(value) = raw.and_then(normalize_value) {
                snapshot.tags.insert(alias, value);
            }
        }

        snapshot.cover = tag
            .pictures()
            .iter()
            .find(|p| p.pic_type() == PictureType::CoverFront)
            .map(|p| CoverArt {
                data: p.data().to_vec(),
                mime_type: p
                    .mime_type()
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_else(|| "application/octet-stream".to_string()),
            });

        Ok(snapshot)
    }

    fn write(&self, path: &Path, update: &TrackWrite<'_>) -> Result<(), StoreError> {
        let container =
            container_for(path).ok_or_else(|| StoreError::Unsupported(path.to_path_buf()))?;
        let lofty_err = |source| StoreError::Lofty {
            path: path.to_path_buf(),
            source,
        };

        // Cover art must be read so untouched pictures survive the rewrite.
        let mut tag = container
            .load(path)
            .map_err(lofty_err)?
            .unwrap_or_else(|| Tag::new(container.tag_type()));

        for alias in TagAlias::ALL {
            put_text(&mut tag, container.item_key(alias), update.tags.get(&alias).cloned());
            if let Some(fallback) = container.fallback_key(alias) {
                tag.remove_key(fallback);
            }
        }

        match update.cover {
            CoverUpdate::Keep => {}
            CoverUpdate::Clear => {
                let types: Vec<PictureType> = tag.pictures().iter().map(|p| p.pic_type()).collect();
                for pic_type in types {
                    tag.remove_picture_type(pic_type);
                }
            }
            CoverUpdate::Replace(art) => {
                tag.remove_picture_type(PictureType::CoverFront);
                let picture = Picture::unchecked(art.data.clone())
                    .pic_type(PictureType::CoverFront)
                    .mime_type(mime_type_of(&art.mime_type))
                    .build();
                tag.push_picture(picture);
            }
        }

        container.save(path, tag).map_err(lofty_err)?;
        self.index.borrow_mut().set(path, update.reconciled_at);
        debug!(path = %path.display(), container = container.name(), "tags written");
        Ok(())
    }

    fn relocate(&self, from: &Path, to: &Path) {
        self.index.borrow_mut().rename(from, to);
    }

    fn prune(&self, scanned: &[PathBuf]) {
        self.index.borrow_mut().retain(scanned);
    }

    fn flush(&self) -> Result<(), StoreError> {
        self.index.borrow_mut().save()
    }
}
