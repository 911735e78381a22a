//! Mocks of the remote collaborators shared across unit tests.

use crate::album::{Album, Library, MediaItem, MediaType};
use crate::downloader::{Response, Transport};
use crate::paging::Page;
use failure::{self, format_err, Fail};
use std::cell::{Cell, RefCell};
use std::io::Cursor;

#[derive(Debug, Fail)]
#[fail(display = "mock remote failure")]
pub struct MockError;

pub fn photo(id: &str) -> MediaItem {
    item(id, Some(MediaType::PHOTO))
}

pub fn video(id: &str) -> MediaItem {
    item(id, Some(MediaType::VIDEO))
}

pub fn item(id: &str, media_type: Option<MediaType>) -> MediaItem {
    MediaItem {
        id: id.to_string(),
        base_url: format!("https://example.com/{}", id),
        mime_type: None,
        filename: None,
        media_type,
    }
}

pub fn album(id: &str, title: &str, count: u64) -> Album {
    Album {
        id: id.to_string(),
        title: title.to_string(),
        media_items_count: count,
    }
}

/// Library serving fixed pages and counting page requests.
///
/// Page tokens are the index of the page to serve.
#[derive(Default)]
pub struct MockLibrary {
    pub album_pages: Vec<Vec<Album>>,
    pub item_pages: Vec<Vec<MediaItem>>,
    /// Index of the items page which fails instead of being served
    pub failing_item_page: Option<usize>,
    pub album_page_fetches: Cell<usize>,
    pub item_page_fetches: Cell<usize>,
}

impl MockLibrary {
    fn serve<T: Clone>(pages: &[Vec<T>], page_token: Option<&str>) -> Page<T> {
        let idx = Self::page_index(page_token);
        let next_page_token = if idx + 1 < pages.len() {
            Some((idx + 1).to_string())
        } else {
            None
        };
        Page {
            items: pages.get(idx).cloned().unwrap_or_default(),
            next_page_token,
        }
    }

    fn page_index(page_token: Option<&str>) -> usize {
        page_token
            .map(|t| t.parse().expect("numeric page token"))
            .unwrap_or(0)
    }
}

impl Library for MockLibrary {
    type E = MockError;

    fn list_albums(&self, page_token: Option<&str>) -> Result<Page<Album>, MockError> {
        self.album_page_fetches.set(self.album_page_fetches.get() + 1);
        Ok(Self::serve(&self.album_pages, page_token))
    }

    fn list_album_items(
        &self,
        _album_id: &str,
        page_size: u32,
        page_token: Option<&str>,
    ) -> Result<Page<MediaItem>, MockError> {
        assert_eq!(100, page_size);
        self.item_page_fetches.set(self.item_page_fetches.get() + 1);
        if self.failing_item_page == Some(Self::page_index(page_token)) {
            return Err(MockError);
        }
        Ok(Self::serve(&self.item_pages, page_token))
    }
}

/// Transport answering every request with the same body, except for the
/// request numbered `fail_at` which gets `fail_status`.
pub struct MockTransport {
    pub body: Vec<u8>,
    pub fail_at: Option<usize>,
    pub fail_status: u16,
    pub requests: RefCell<Vec<String>>,
}

impl MockTransport {
    pub fn new(body: &[u8]) -> Self {
        MockTransport {
            body: body.to_vec(),
            fail_at: None,
            fail_status: 404,
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn failing_at(mut self, request: usize, status: u16) -> Self {
        self.fail_at = Some(request);
        self.fail_status = status;
        self
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }
}

impl Transport for MockTransport {
    fn get(&self, url: &str) -> Result<Response, failure::Error> {
        let n = self.request_count();
        self.requests.borrow_mut().push(url.to_string());
        if !url.contains("://") {
            return Err(format_err!("invalid url: {}", url));
        }
        if self.fail_at == Some(n) {
            return Ok(Response {
                status: self.fail_status,
                body: Box::new(Cursor::new(b"not found".to_vec())),
            });
        }
        Ok(Response {
            status: 200,
            body: Box::new(Cursor::new(self.body.clone())),
        })
    }
}
