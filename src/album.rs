use crate::paging::Page;
use failure::Fail;
use serde::Deserialize;
use serde::Serialize;

#[derive(Serialize, Deserialize, Debug, Copy, Clone, Eq, PartialEq)]
pub enum MediaType {
    PHOTO,
    VIDEO,
}

/// An album as listed by the remote library.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Album {
    pub id: String,
    pub title: String,
    /// Item count declared by the remote side. May be stale.
    pub media_items_count: u64,
}

/// One downloadable item of an album.
#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub id: String,
    /// Content reference which needs a variant suffix before fetching bytes.
    pub base_url: String,
    pub mime_type: Option<String>,
    pub filename: Option<String>,
    /// `None` when the remote side returned no usable metadata.
    pub media_type: Option<MediaType>,
}

impl MediaItem {
    pub fn is_photo(&self) -> bool {
        self.media_type == Some(MediaType::PHOTO)
    }
}

/// Remote library exposing albums and their items as paged listings.
pub trait Library {
    type E: Fail;

    /// Return one page of the albums list. `None` requests the first page.
    fn list_albums(&self, page_token: Option<&str>) -> Result<Page<Album>, Self::E>;

    /// Return one page of items in the album `album_id`.
    ///
    /// `page_size` is a hint; the remote side may return fewer items.
    fn list_album_items(
        &self,
        album_id: &str,
        page_size: u32,
        page_token: Option<&str>,
    ) -> Result<Page<MediaItem>, Self::E>;
}

impl<'a, L: Library + ?Sized> Library for &'a L {
    type E = L::E;

    fn list_albums(&self, page_token: Option<&str>) -> Result<Page<Album>, Self::E> {
        (**self).list_albums(page_token)
    }

    fn list_album_items(
        &self,
        album_id: &str,
        page_size: u32,
        page_token: Option<&str>,
    ) -> Result<Page<MediaItem>, Self::E> {
        (**self).list_album_items(album_id, page_size, page_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(media_type: Option<MediaType>) -> MediaItem {
        MediaItem {
            id: "id".to_string(),
            base_url: "https://example.com/id".to_string(),
            mime_type: None,
            filename: None,
            media_type,
        }
    }

    #[test]
    fn test_is_photo() {
        assert!(item(Some(MediaType::PHOTO)).is_photo());
        assert!(!item(Some(MediaType::VIDEO)).is_photo());
        assert!(!item(None).is_photo());
    }

    #[test]
    fn test_media_item_json() {
        let json = serde_json::to_string(&item(Some(MediaType::PHOTO))).unwrap();
        assert_eq!(
            r#"{"id":"id","baseUrl":"https://example.com/id","mimeType":null,"filename":null,"mediaType":"PHOTO"}"#,
            json
        );
    }
}
