pub mod album;
pub mod cache;
pub mod downloader;
pub mod error;
pub mod fetcher;
pub mod googlephotos;
pub mod kvstore;
pub mod oauth;
pub mod paging;
pub mod resolver;
pub mod selector;

#[cfg(test)]
mod test_helpers;

use album::{Library, MediaItem};
use cache::AlbumCache;
use downloader::{Downloader, Transport};
use error::Result;
use kvstore::KeyValueStore;
use log::{debug, info};
use rand::Rng;
use selector::RandomSelector;
use std::path::PathBuf;

/// Number of photos downloaded per run unless configured otherwise.
pub const DOWNLOAD_COUNT: usize = 20;

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Title of the album to draw photos from
    pub album: String,
    /// Number of photos to download
    pub downloads: usize,
    /// Fetch the album again even if a cached listing exists
    pub refresh: bool,
}

impl Config {
    pub fn new<S: Into<String>>(album: S) -> Self {
        Config {
            album: album.into(),
            downloads: DOWNLOAD_COUNT,
            refresh: false,
        }
    }
}

/// Draws random photos out of one album and saves them locally.
///
/// The album listing is taken from the cache if present, otherwise it is
/// fetched from the library and cached. Downloads then run one after
/// another, and the first failure aborts the whole run.
pub struct PhotoDraw<L: Library, T: Transport, S: KeyValueStore, R: Rng> {
    config: Config,
    library: L,
    downloader: Downloader<T>,
    cache: AlbumCache<S>,
    selector: RandomSelector<R>,
}

impl<L, T, S, R> PhotoDraw<L, T, S, R>
where
    L: Library,
    T: Transport,
    S: KeyValueStore,
    R: Rng,
{
    pub fn new(
        config: Config,
        library: L,
        downloader: Downloader<T>,
        cache: AlbumCache<S>,
        selector: RandomSelector<R>,
    ) -> Self {
        PhotoDraw {
            config,
            library,
            downloader,
            cache,
            selector,
        }
    }

    /// Run all downloads and return the paths of saved files in order.
    pub fn run(mut self) -> Result<Vec<PathBuf>> {
        let items = self.listing()?;
        info!(
            "Album listing ready with {} items, downloading {} photos",
            items.len(),
            self.config.downloads
        );

        let mut saved = Vec::with_capacity(self.config.downloads);
        for index in 0..self.config.downloads {
            let item = self.selector.pick(&items)?;
            debug!("Picked item {} for #{}", item.id, index);
            saved.push(self.downloader.download(item, index)?);
        }

        info!("Finished downloading {} photos", saved.len());
        Ok(saved)
    }

    fn listing(&self) -> Result<Vec<MediaItem>> {
        if self.config.refresh {
            info!("Refresh requested, ignoring cached album listing");
        } else if let Some(items) = self.cache.load()? {
            info!("Using cached album listing");
            return Ok(items);
        }

        info!("Looking up album {:?}", self.config.album);
        let album = resolver::resolve(&self.library, &self.config.album)?;
        fetcher::fetch_all(&self.library, &album, &self.cache, &mut |count, total| {
            info!("{}/{}", count, total)
        })
    }
}
