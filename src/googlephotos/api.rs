use crate::downloader::{Response, Transport};
use crate::oauth::{self, TokenService};
use failure::{self, Fail};
use log::{debug, warn};
use reqwest;
use reqwest::Client;
use reqwest::Method;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde::Serialize;
use url::Url;

const API_ENDPOINT: &str = "https://photoslibrary.googleapis.com";

const PATH_LIST_ALBUMS: &str = "v1/albums";
const PATH_MEDIA_ITEMS_SEARCH: &str = "v1/mediaItems:search";

const LIST_ALBUMS_PAGE_SIZE: &str = "50";

#[derive(Debug, Fail)]
pub enum Error {
    /// Request could not be sent or its response could not be read
    #[fail(display = "Request failed: {}", _0)]
    Request(#[fail(cause)] reqwest::Error),
    /// Remote server returned non-success status
    #[fail(display = "Error response {} returned: {}", status, body)]
    Status { status: u16, body: String },
    /// Access token was rejected
    #[fail(display = "Access unauthorized by status: {}", _0)]
    Unauthorized(u16),
    /// Error in managing OAuth token
    #[fail(display = "Error in managing OAuth token: {}", _0)]
    OAuthToken(#[fail(cause)] oauth::Error),
}

impl From<oauth::Error> for Error {
    fn from(e: oauth::Error) -> Self {
        Error::OAuthToken(e)
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Request(e)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

pub struct GPhotosApi {
    tokens: TokenService,
    client: Client,
}

impl GPhotosApi {
    pub fn new(tokens: TokenService) -> GPhotosApi {
        GPhotosApi {
            tokens,
            client: reqwest::Client::new(),
        }
    }

    /// Send an authorized request and return the raw response if it succeeded.
    ///
    /// There are no retries. A 401 drops the locally cached access token so
    /// that the next run refreshes it.
    fn send<Req: Serialize>(
        &self,
        method: Method,
        url: &str,
        data: Option<&Req>,
    ) -> Result<reqwest::Response> {
        let access_token = self.tokens.obtain_access_token()?;

        let mut builder = self
            .client
            .request(method, url)
            .bearer_auth(access_token);
        if let Some(req) = data {
            builder = builder.json(req);
        }

        let mut resp = builder.send()?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        if status == StatusCode::UNAUTHORIZED {
            if let Err(e) = self.tokens.expire_current() {
                warn!("Failed to clear local tokens: {:?}", e);
            }
            return Err(Error::Unauthorized(status.as_u16()));
        }

        let body = resp.text().unwrap_or_default();
        debug!("Got {} response for {}: {}", status, url, body);
        Err(Error::Status {
            status: status.as_u16(),
            body,
        })
    }

    fn request<Req, Res>(&self, method: Method, url: &str, data: Option<&Req>) -> Result<Res>
    where
        Req: Serialize,
        Res: DeserializeOwned,
    {
        let mut resp = self.send(method, url, data)?;
        Ok(resp.json()?)
    }

    pub fn albums(&self, page_token: Option<&str>) -> Result<AlbumListResponse> {
        let mut params = vec![("pageSize", LIST_ALBUMS_PAGE_SIZE)];
        if let Some(token) = page_token {
            params.push(("pageToken", token));
        }
        let url = album_list_url(&params);

        self.request(Method::GET, url.as_str(), None as Option<&()>)
    }

    pub fn media_items_search(
        &self,
        req: &MediaItemsSearchRequest,
    ) -> Result<MediaItemsSearchResponse> {
        self.request(
            Method::POST,
            &format!("{}/{}", API_ENDPOINT, PATH_MEDIA_ITEMS_SEARCH),
            Some(req),
        )
    }
}

fn album_list_url(params: &[(&str, &str)]) -> Url {
    let mut url =
        Url::parse(&format!("{}/{}", API_ENDPOINT, PATH_LIST_ALBUMS)).expect("url parse");
    url.query_pairs_mut().extend_pairs(params);
    url
}

impl Transport for GPhotosApi {
    fn get(&self, url: &str) -> std::result::Result<Response, failure::Error> {
        let access_token = self.tokens.obtain_access_token()?;
        let resp = self.client.get(url).bearer_auth(access_token).send()?;
        Ok(Response {
            status: resp.status().as_u16(),
            body: Box::new(resp),
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Default, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AlbumListResponse {
    pub albums: Option<Vec<Album>>,
    pub next_page_token: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub id: String,
    pub title: Option<String>,
    pub product_url: Option<String>,
    pub media_items_count: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MediaItemsSearchRequest {
    pub album_id: String,
    pub page_size: Option<i64>,
    pub page_token: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Default, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MediaItemsSearchResponse {
    #[serde(default)]
    pub media_items: Vec<MediaItem>,
    pub next_page_token: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub id: Option<String>,
    pub description: Option<String>,
    pub product_url: Option<String>,
    pub base_url: Option<String>,
    pub mime_type: Option<String>,
    pub media_metadata: Option<MediaMetadata>,
    pub filename: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MediaMetadata {
    pub creation_time: Option<String>,
    pub width: Option<String>,
    pub height: Option<String>,
    pub photo: Option<serde_json::Value>,
    pub video: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_album_list_url() {
        let url = album_list_url(&[("pageSize", "50"), ("pageToken", "a b")]);
        assert_eq!(
            "https://photoslibrary.googleapis.com/v1/albums?pageSize=50&pageToken=a+b",
            url.as_str()
        );
    }

    #[test]
    fn test_deserialize_search_response() {
        let json = r#"{
            "mediaItems": [
                {
                    "id": "p1",
                    "baseUrl": "https://lh3.example/p1",
                    "mimeType": "image/jpeg",
                    "filename": "IMG_0001.JPG",
                    "mediaMetadata": {
                        "creationTime": "2019-08-01T10:00:00Z",
                        "width": "4032",
                        "height": "3024",
                        "photo": {"cameraMake": "Apple"}
                    }
                },
                {
                    "id": "v1",
                    "baseUrl": "https://lh3.example/v1",
                    "mimeType": "video/mp4",
                    "mediaMetadata": {"video": {"fps": 30.0, "status": "READY"}}
                }
            ],
            "nextPageToken": "next"
        }"#;
        let resp: MediaItemsSearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(2, resp.media_items.len());
        assert_eq!(Some("next".to_string()), resp.next_page_token);
        let meta = resp.media_items[0].media_metadata.as_ref().unwrap();
        assert!(meta.photo.is_some());
        assert!(meta.video.is_none());
        let meta = resp.media_items[1].media_metadata.as_ref().unwrap();
        assert!(meta.video.is_some());
    }

    #[test]
    fn test_deserialize_empty_search_response() {
        // The API omits mediaItems entirely for an empty album
        let resp: MediaItemsSearchResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(MediaItemsSearchResponse::default(), resp);
    }

    #[test]
    fn test_serialize_search_request() {
        let req = MediaItemsSearchRequest {
            album_id: "album".to_string(),
            page_size: Some(100),
            page_token: None,
        };
        assert_eq!(
            r#"{"albumId":"album","pageSize":100,"pageToken":null}"#,
            serde_json::to_string(&req).unwrap()
        );
    }
}
