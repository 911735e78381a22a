use crate::kvstore::{self, KeyValueStore, TOKEN_KEY};
use failure::Fail;
use log::debug;
use serde::Deserialize;
use serde::Serialize;
use serde_json;
use std::cell::RefCell;
use std::time::Duration;
use std::time::SystemTime;

#[derive(Debug, Fail)]
pub enum Error {
    #[fail(display = "Error accessing token store: {}", _0)]
    Store(#[fail(cause)] kvstore::Error),
    #[fail(display = "Error in token serialization: {}", _0)]
    Serde(#[fail(cause)] serde_json::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serde(e)
    }
}

impl From<kvstore::Error> for Error {
    fn from(e: kvstore::Error) -> Self {
        Error::Store(e)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

pub struct TokenStore {
    store: Box<dyn KeyValueStore>,
    entry: RefCell<StoreEntry>,
}

impl TokenStore {
    pub fn open<S: KeyValueStore + 'static>(store: S) -> Result<TokenStore> {
        let entry = match store.get(TOKEN_KEY)? {
            Some(json) => serde_json::from_slice(&json)?,
            // Fallback to initial creation
            None => StoreEntry {
                access_token: None,
                refresh_token: None,
            },
        };

        Ok(TokenStore {
            store: Box::new(store),
            entry: RefCell::new(entry),
        })
    }

    fn current_time() -> Duration {
        SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or_default()
    }

    pub fn save(&self) -> Result<()> {
        let json = serde_json::to_vec_pretty(&*self.entry.borrow())?;
        self.store.put(TOKEN_KEY, &json)?;
        Ok(())
    }

    pub fn valid_access_token(&self) -> Option<String> {
        if let Some(token) = &self.entry.borrow().access_token {
            if token.expire_date.unwrap_or(std::u128::MAX) > Self::current_time().as_millis() {
                return Some(token.secret.clone());
            }
        }
        None
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.entry
            .borrow()
            .refresh_token
            .as_ref()
            .map(|t| t.secret.clone())
    }

    pub fn update_access_token(
        &self,
        access_token: Option<String>,
        expires_in: Option<u128>,
    ) -> Result<()> {
        self.update_tokens(access_token, expires_in, self.refresh_token())
    }

    pub fn update_tokens(
        &self,
        access_token: Option<String>,
        expires_in: Option<u128>,
        refresh_token: Option<String>,
    ) -> Result<()> {
        let now = Self::current_time().as_millis();
        let expire_date = expires_in.map(|t| now + t);

        {
            let mut entry = self.entry.borrow_mut();
            entry.access_token = access_token.map(|t| Token {
                secret: t,
                created_date: now,
                expire_date,
            });
            entry.refresh_token = refresh_token.map(|t| Token {
                secret: t,
                created_date: now,
                expire_date: None,
            });
        }

        debug!("Local tokens updated to expire at {:?}", expire_date);

        self.save()
    }
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct StoreEntry {
    access_token: Option<Token>,
    refresh_token: Option<Token>,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct Token {
    secret: String,
    created_date: u128,
    expire_date: Option<u128>,
}
