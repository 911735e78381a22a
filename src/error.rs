use crate::oauth;
use failure::{self, Fail};
use std::io;
use std::path::PathBuf;

#[derive(Debug, Fail)]
pub enum Error {
    /// Required configuration value is not supplied
    #[fail(display = "Missing required configuration: {}", _0)]
    ConfigMissing(&'static str),
    /// Authorization or token handling failed
    #[fail(display = "Credential error: {}", _0)]
    Credential(#[fail(cause)] oauth::Error),
    /// Album snapshot exists but can't be read back
    #[fail(display = "Album cache is corrupt: {}", _0)]
    CacheCorrupt(failure::Error),
    /// Album snapshot couldn't be written
    #[fail(display = "Failed to write album cache: {}", _0)]
    CacheWrite(failure::Error),
    /// No album with the given title exists
    #[fail(display = "Album not found: {:?}", title)]
    AlbumNotFound { title: String },
    /// Walking a remote listing failed
    #[fail(display = "Failed to list remote items: {}", _0)]
    RemoteList(failure::Error),
    /// Listing has no item which can be selected
    #[fail(display = "No photo to select among {} items", items)]
    EmptyListing { items: usize },
    /// Download request could not be sent
    #[fail(display = "Download request failed: {}", _0)]
    Request(failure::Error),
    /// Download returned non-success status
    #[fail(display = "Download failed with status {}: {}", status, body)]
    DownloadHttp { status: u16, body: String },
    /// Output location is missing or unwritable
    #[fail(display = "Invalid output path {:?}: {}", path, cause)]
    OutputPath {
        path: PathBuf,
        #[fail(cause)]
        cause: io::Error,
    },
    /// Downloaded content couldn't be persisted completely
    #[fail(display = "Failed to write {:?}: {}", path, cause)]
    DownloadWrite {
        path: PathBuf,
        #[fail(cause)]
        cause: io::Error,
    },
}

impl From<oauth::Error> for Error {
    fn from(e: oauth::Error) -> Self {
        Error::Credential(e)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
