use crate::album::{Album, Library};
use crate::error::{Error, Result};
use crate::paging::Pages;
use log::{debug, info};

/// Find the album titled exactly `name`.
///
/// Album pages are requested one by one and the walk ends at the first
/// match, so pages after it are never fetched.
pub fn resolve<L: Library>(library: &L, name: &str) -> Result<Album> {
    if name.is_empty() {
        return Err(Error::ConfigMissing("album"));
    }

    let pages = Pages::new(|token: Option<&str>| library.list_albums(token));
    for (i, page) in pages.enumerate() {
        let albums = page.map_err(|e| Error::RemoteList(e.into()))?;
        debug!("Scanning {} albums in page {}", albums.len(), i);
        if let Some(album) = albums.into_iter().find(|a| a.title == name) {
            info!(
                "Found album {:?}; id={}, declared items={}",
                album.title, album.id, album.media_items_count
            );
            return Ok(album);
        }
    }

    Err(Error::AlbumNotFound {
        title: name.to_string(),
    })
}
