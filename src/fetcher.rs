use crate::album::{Album, Library, MediaItem};
use crate::cache::AlbumCache;
use crate::error::{Error, Result};
use crate::kvstore::KeyValueStore;
use crate::paging::Pages;
use log::debug;

pub const MEDIA_ITEMS_PAGE_SIZE: u32 = 100;

/// Fetch every item of `album` and save the listing to `cache`.
///
/// `progress` is called with `(items fetched so far, declared item count)`
/// once before the first page and after every page.
/// Nothing is cached unless the whole listing was fetched.
pub fn fetch_all<L, S>(
    library: &L,
    album: &Album,
    cache: &AlbumCache<S>,
    progress: &mut dyn FnMut(usize, u64),
) -> Result<Vec<MediaItem>>
where
    L: Library,
    S: KeyValueStore,
{
    let declared = album.media_items_count;
    let mut items = Vec::new();
    progress(0, declared);

    let pages = Pages::new(|token: Option<&str>| {
        library.list_album_items(&album.id, MEDIA_ITEMS_PAGE_SIZE, token)
    });
    for page in pages {
        let page = page.map_err(|e| Error::RemoteList(e.into()))?;
        debug!("Got {} items of album {}", page.len(), album.id);
        items.extend(page);
        progress(items.len(), declared);
    }

    cache.save(&items)?;
    Ok(items)
}
