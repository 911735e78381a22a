use crate::album::MediaItem;
use crate::error::{Error, Result};
use failure;
use log::{debug, info};
use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;

/// Suffix of a base URL which selects the original-quality bytes.
const FULL_QUALITY_VARIANT: &str = "=d";

/// Upper bound of the error body kept for diagnostics.
const MAX_ERROR_BODY: u64 = 4096;

/// Response of a `Transport` request. `status` can be any HTTP status.
pub struct Response {
    pub status: u16,
    pub body: Box<dyn Read>,
}

/// HTTP access already authorized to read media content.
pub trait Transport {
    /// Issue a GET request. Only failures to obtain any response are errors.
    fn get(&self, url: &str) -> std::result::Result<Response, failure::Error>;
}

impl<'a, T: Transport + ?Sized> Transport for &'a T {
    fn get(&self, url: &str) -> std::result::Result<Response, failure::Error> {
        (**self).get(url)
    }
}

pub struct Downloader<T: Transport> {
    transport: T,
    output_dir: PathBuf,
}

impl<T: Transport> Downloader<T> {
    pub fn new<P: Into<PathBuf>>(transport: T, output_dir: P) -> Self {
        Downloader {
            transport,
            output_dir: output_dir.into(),
        }
    }

    pub fn file_name(index: usize) -> String {
        format!("img-{:04}.jpg", index)
    }

    /// Download the content of `item` into the file numbered `index`.
    ///
    /// An existing file with the same name is overwritten. The output
    /// directory must exist already.
    pub fn download(&self, item: &MediaItem, index: usize) -> Result<PathBuf> {
        self.check_output_dir()?;

        let url = format!("{}{}", item.base_url, FULL_QUALITY_VARIANT);
        debug!("Requesting {} for item {}", url, item.id);
        let resp = self.transport.get(&url).map_err(Error::Request)?;
        if !(200..300).contains(&resp.status) {
            return Err(Error::DownloadHttp {
                status: resp.status,
                body: Self::error_body(resp.body),
            });
        }

        let path = self.output_dir.join(Self::file_name(index));
        let file = File::create(&path).map_err(|cause| Error::OutputPath {
            path: path.clone(),
            cause,
        })?;
        let size = Self::persist(resp.body, file).map_err(|cause| Error::DownloadWrite {
            path: path.clone(),
            cause,
        })?;

        info!(
            "Saved item {} ({} bytes) to {}",
            item.id,
            size,
            path.display()
        );
        Ok(path)
    }

    fn check_output_dir(&self) -> Result<()> {
        let meta = fs::metadata(&self.output_dir).map_err(|cause| Error::OutputPath {
            path: self.output_dir.clone(),
            cause,
        })?;
        if !meta.is_dir() {
            return Err(Error::OutputPath {
                path: self.output_dir.clone(),
                cause: io::Error::new(io::ErrorKind::Other, "not a directory"),
            });
        }
        Ok(())
    }

    fn persist(mut body: Box<dyn Read>, file: File) -> io::Result<u64> {
        let mut writer = BufWriter::new(file);
        let size = io::copy(&mut body, &mut writer)?;
        writer.flush()?;
        let file = writer.into_inner().map_err(io::Error::from)?;
        file.sync_all()?;
        Ok(size)
    }

    fn error_body(body: Box<dyn Read>) -> String {
        let mut buf = String::new();
        // Body is only diagnostic, so a broken one is left empty
        let _ = body.take(MAX_ERROR_BODY).read_to_string(&mut buf);
        buf
    }
}
