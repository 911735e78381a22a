pub mod api;

use crate::album::{self, Library, MediaType};
use crate::paging::Page;
use api::{GPhotosApi, MediaItemsSearchRequest};
use log::{debug, warn};

impl Library for GPhotosApi {
    type E = api::Error;

    fn list_albums(&self, page_token: Option<&str>) -> api::Result<Page<album::Album>> {
        let resp = self.albums(page_token)?;
        Ok(Page {
            items: resp
                .albums
                .unwrap_or_default()
                .into_iter()
                .map(convert_album)
                .collect(),
            next_page_token: resp.next_page_token,
        })
    }

    fn list_album_items(
        &self,
        album_id: &str,
        page_size: u32,
        page_token: Option<&str>,
    ) -> api::Result<Page<album::MediaItem>> {
        let req = MediaItemsSearchRequest {
            album_id: album_id.to_string(),
            page_size: Some(i64::from(page_size)),
            page_token: page_token.map(String::from),
        };
        let resp = self.media_items_search(&req)?;
        Ok(Page {
            items: resp
                .media_items
                .into_iter()
                .filter_map(convert_media_item)
                .collect(),
            next_page_token: resp.next_page_token,
        })
    }
}

fn convert_album(album: api::Album) -> album::Album {
    let media_items_count = album
        .media_items_count
        .as_ref()
        .and_then(|c| c.parse().ok())
        .unwrap_or(0);
    album::Album {
        id: album.id,
        title: album.title.unwrap_or_default(),
        media_items_count,
    }
}

/// Convert API media item into the local model.
///
/// Returns `None` for items which can't be downloaded at all.
fn convert_media_item(mitem: api::MediaItem) -> Option<album::MediaItem> {
    let media_type = mitem.media_metadata.as_ref().and_then(|meta| {
        if meta.photo.is_some() {
            Some(MediaType::PHOTO)
        } else if meta.video.is_some() {
            Some(MediaType::VIDEO)
        } else {
            None
        }
    });

    let (id, base_url) = match (mitem.id, mitem.base_url) {
        (Some(id), Some(base_url)) => (id, base_url),
        (id, _) => {
            warn!("Skipping media item without id or baseUrl: {:?}", id);
            return None;
        }
    };
    if media_type.is_none() {
        debug!("No media metadata for {}: {:?}", id, mitem.mime_type);
    }

    Some(album::MediaItem {
        id,
        base_url,
        mime_type: mitem.mime_type,
        filename: mitem.filename,
        media_type,
    })
}
