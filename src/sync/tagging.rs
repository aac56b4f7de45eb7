//! Tag embedding for materialized tracks

use std::path::Path;

use anyhow::{Context, Result};
use lofty::config::WriteOptions;
use lofty::picture::{MimeType, Picture, PictureType};
use lofty::prelude::*;
use lofty::probe::Probe;
use lofty::tag::Tag;
use tracing::debug;

use crate::catalog::TrackMetadata;

/// ID3v2 marker meaning "picture data is a URL"
const LINKED_PICTURE_MIME: &str = "-->";

/// Cover art to attach to a track
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoverArt {
    /// Image bytes with the content type the server reported
    Embedded { data: Vec<u8>, mime_type: String },
    /// Only a reference to where the image lives
    Linked(String),
}

/// Writes metadata into an audio file in place
///
/// Called from a blocking thread.
pub trait TagWriter: Send + Sync {
    fn write_tags(&self, path: &Path, metadata: &TrackMetadata, cover: Option<&CoverArt>) -> Result<()>;
}

/// `lofty`-backed tag writer
#[derive(Debug, Default, Clone, Copy)]
pub struct LoftyTagWriter;

impl TagWriter for LoftyTagWriter {
    fn write_tags(&self, path: &Path, metadata: &TrackMetadata, cover: Option<&CoverArt>) -> Result<()> {
        let mut tagged_file = Probe::open(path)
            .context("Failed to open audio file")?
            .read()
            .context("Failed to read audio file")?;

        if tagged_file.primary_tag().is_none() {
            let tag_type = tagged_file.primary_tag_type();
            tagged_file.insert_tag(Tag::new(tag_type));
        }
        let tag = tagged_file
            .primary_tag_mut()
            .context("Failed to create tag")?;

        apply_metadata(tag, metadata);

        if let Some(cover) = cover {
            tag.remove_picture_type(PictureType::CoverFront);
            tag.push_picture(cover_picture(cover));
        }

        tagged_file
            .save_to_path(path, WriteOptions::default())
            .context("Failed to save tags")?;

        debug!("Tagged {}", path.display());
        Ok(())
    }
}

/// Copy every present metadata field onto the tag
fn apply_metadata(tag: &mut Tag, metadata: &TrackMetadata) {
    if let Some(artist) = &metadata.artist {
        tag.set_artist(artist.clone());
    }
    if let Some(title) = &metadata.title {
        tag.set_title(title.clone());
    }
    if let Some(album) = &metadata.album {
        tag.set_album(album.clone());
    }
    if let Some(album_artist) = &metadata.album_artist {
        tag.insert_text(ItemKey::AlbumArtist, album_artist.clone());
    }
    if let Some(track) = metadata.track_number {
        tag.set_track(track);
    }
    if let Some(disc) = metadata.disc_number {
        tag.set_disk(disc);
    }
    if let Some(genre) = &metadata.genre {
        tag.set_genre(genre.clone());
    }
    if let Some(lyrics) = &metadata.lyrics {
        tag.insert_text(ItemKey::Lyrics, lyrics.clone());
    }
}

/// Front cover picture for the given art
fn cover_picture(cover: &CoverArt) -> Picture {
    match cover {
        CoverArt::Embedded { data, mime_type } => Picture::new_unchecked(
            PictureType::CoverFront,
            Some(parse_mime(mime_type)),
            Some("cover".to_string()),
            data.clone(),
        ),
        CoverArt::Linked(url) => Picture::new_unchecked(
            PictureType::CoverFront,
            Some(MimeType::Unknown(LINKED_PICTURE_MIME.to_string())),
            Some("cover".to_string()),
            url.as_bytes().to_vec(),
        ),
    }
}

/// Content type without parameters, e.g. `image/jpeg; q=1` -> jpeg
fn parse_mime(content_type: &str) -> MimeType {
    let essence = content_type.split(';').next().unwrap_or("").trim();
    MimeType::from_str(essence)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Untagged MPEG-1 Layer III file made of silent frames
    fn write_bare_mp3(path: &Path) {
        let mut frame = vec![0xFF, 0xFB, 0x90, 0x64];
        frame.resize(417, 0);
        std::fs::write(path, frame.repeat(20)).unwrap();
    }

    fn full_metadata() -> TrackMetadata {
        TrackMetadata {
            artist: Some("A".to_string()),
            title: Some("Song".to_string()),
            album: Some("Album".to_string()),
            album_artist: Some("Various".to_string()),
            track_number: Some(4),
            disc_number: Some(2),
            genre: Some("Jazz".to_string()),
            lyrics: Some("la la".to_string()),
            cover_art_url: None,
        }
    }

    #[test]
    fn test_embedded_cover_keeps_content_type() {
        let picture = cover_picture(&CoverArt::Embedded {
            data: vec![0xFF, 0xD8],
            mime_type: "image/png".to_string(),
        });
        assert_eq!(picture.pic_type(), PictureType::CoverFront);
        assert_eq!(picture.mime_type(), Some(&MimeType::Png));
        assert_eq!(picture.data(), &[0xFF, 0xD8]);
    }

    #[test]
    fn test_linked_cover_stores_url() {
        let picture = cover_picture(&CoverArt::Linked("https://art.test/1.jpg".to_string()));
        assert_eq!(
            picture.mime_type(),
            Some(&MimeType::Unknown("-->".to_string()))
        );
        assert_eq!(picture.data(), b"https://art.test/1.jpg");
    }

    #[test]
    fn test_mime_parameters_ignored() {
        assert_eq!(parse_mime("image/jpeg; charset=binary"), MimeType::Jpeg);
    }

    #[test]
    fn test_apply_metadata_sets_fields() {
        let mut tag = Tag::new(lofty::tag::TagType::Id3v2);
        let metadata = full_metadata();

        apply_metadata(&mut tag, &metadata);

        assert_eq!(tag.artist().as_deref(), Some("A"));
        assert_eq!(tag.title().as_deref(), Some("Song"));
        assert_eq!(tag.album().as_deref(), Some("Album"));
        assert_eq!(tag.get_string(&ItemKey::AlbumArtist), Some("Various"));
        assert_eq!(tag.track(), Some(4));
        assert_eq!(tag.disk(), Some(2));
        assert_eq!(tag.genre().as_deref(), Some("Jazz"));
        assert_eq!(tag.get_string(&ItemKey::Lyrics), Some("la la"));
    }

    #[test]
    fn test_write_tags_persists_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t1.mp3");
        write_bare_mp3(&path);
        let cover = CoverArt::Embedded {
            data: vec![0xFF, 0xD8, 0xFF, 0xE0],
            mime_type: "image/jpeg".to_string(),
        };

        LoftyTagWriter
            .write_tags(&path, &full_metadata(), Some(&cover))
            .unwrap();

        let tagged = lofty::read_from_path(&path).unwrap();
        let tag = tagged.primary_tag().unwrap();
        assert_eq!(tag.artist().as_deref(), Some("A"));
        assert_eq!(tag.title().as_deref(), Some("Song"));
        assert_eq!(tag.album().as_deref(), Some("Album"));
        assert_eq!(tag.get_string(&ItemKey::AlbumArtist), Some("Various"));
        assert_eq!(tag.get_string(&ItemKey::Lyrics), Some("la la"));
        assert_eq!(tag.track(), Some(4));
        assert_eq!(tag.disk(), Some(2));
        assert_eq!(tag.pictures().len(), 1);
        assert_eq!(tag.pictures()[0].mime_type(), Some(&MimeType::Jpeg));
        assert_eq!(tag.pictures()[0].data(), &[0xFF, 0xD8, 0xFF, 0xE0]);
    }

    #[test]
    fn test_write_tags_with_linked_cover() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t2.mp3");
        write_bare_mp3(&path);
        let cover = CoverArt::Linked("https://art.test/1.jpg".to_string());

        LoftyTagWriter
            .write_tags(&path, &full_metadata(), Some(&cover))
            .unwrap();

        let tagged = lofty::read_from_path(&path).unwrap();
        let tag = tagged.primary_tag().unwrap();
        assert_eq!(tag.artist().as_deref(), Some("A"));
        assert_eq!(tag.pictures().len(), 1);
        assert_eq!(tag.pictures()[0].data(), b"https://art.test/1.jpg");
    }
}
