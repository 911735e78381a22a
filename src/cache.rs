use crate::album::MediaItem;
use crate::error::{Error, Result};
use crate::kvstore::{KeyValueStore, ALBUM_CACHE_KEY};
use log::{debug, info};

/// Local snapshot of one album's item listing.
///
/// Presence of a snapshot is enough to skip fetching the album again;
/// it never expires on its own.
pub struct AlbumCache<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> AlbumCache<S> {
    pub fn new(store: S) -> Self {
        AlbumCache { store }
    }

    pub fn load(&self) -> Result<Option<Vec<MediaItem>>> {
        let data = match self.store.get(ALBUM_CACHE_KEY) {
            Ok(Some(data)) => data,
            Ok(None) => {
                debug!("No album cache found");
                return Ok(None);
            }
            Err(e) => return Err(Error::CacheCorrupt(e.into())),
        };

        let items: Vec<MediaItem> =
            serde_json::from_slice(&data).map_err(|e| Error::CacheCorrupt(e.into()))?;
        info!("Loaded {} items from album cache", items.len());
        Ok(Some(items))
    }

    pub fn save(&self, items: &[MediaItem]) -> Result<()> {
        let data = serde_json::to_vec(items).map_err(|e| Error::CacheWrite(e.into()))?;
        self.store
            .put(ALBUM_CACHE_KEY, &data)
            .map_err(|e| Error::CacheWrite(e.into()))?;
        info!("Saved {} items to album cache", items.len());
        Ok(())
    }
}
