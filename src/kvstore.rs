use failure::Fail;
use log::debug;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;

pub const TOKEN_KEY: &str = "token";
pub const ALBUM_CACHE_KEY: &str = "album-cache";

#[derive(Debug, Fail)]
pub enum Error {
    #[fail(display = "IO error in local store at {:?}: {}", path, cause)]
    IO {
        path: PathBuf,
        #[fail(cause)]
        cause: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Minimal storage for the few blobs this tool keeps between runs.
pub trait KeyValueStore {
    /// Return the stored value, or `None` if nothing was ever put under `key`.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store `value` under `key`, replacing any previous value.
    fn put(&self, key: &str, value: &[u8]) -> Result<()>;
}

impl<'a, S: KeyValueStore + ?Sized> KeyValueStore for &'a S {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<()> {
        (**self).put(key, value)
    }
}

/// Store keeping each key as a hidden file in one directory.
#[derive(Clone, Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new<P: Into<PathBuf>>(dir: P) -> FileStore {
        FileStore { dir: dir.into() }
    }

    pub fn path(&self, key: &str) -> PathBuf {
        let filename = match key {
            TOKEN_KEY => ".token".to_string(),
            ALBUM_CACHE_KEY => ".album.json".to_string(),
            other => format!(".{}", other),
        };
        self.dir.join(filename)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path(key);
        match fs::read(&path) {
            Ok(data) => {
                debug!("Read {} bytes from {}", data.len(), path.display());
                Ok(Some(data))
            }
            Err(ref e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(cause) => Err(Error::IO { path, cause }),
        }
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<()> {
        let path = self.path(key);
        fs::write(&path, value).map_err(|cause| Error::IO {
            path: path.clone(),
            cause,
        })?;
        debug!("Wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }
}

/// In-memory store. Clones share the same entries.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, Vec<u8>>>>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        Default::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile;

    #[test]
    fn test_file_store_paths() {
        let store = FileStore::new("/state");
        assert_eq!(PathBuf::from("/state/.token"), store.path(TOKEN_KEY));
        assert_eq!(
            PathBuf::from("/state/.album.json"),
            store.path(ALBUM_CACHE_KEY)
        );
        assert_eq!(PathBuf::from("/state/.other"), store.path("other"));
    }

    #[test]
    fn test_file_store_get_put() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        // Missing file is not an error
        assert_eq!(None, store.get(TOKEN_KEY).unwrap());

        store.put(TOKEN_KEY, b"first").unwrap();
        assert_eq!(Some(b"first".to_vec()), store.get(TOKEN_KEY).unwrap());
        assert!(dir.path().join(".token").exists());

        store.put(TOKEN_KEY, b"second").unwrap();
        assert_eq!(Some(b"second".to_vec()), store.get(TOKEN_KEY).unwrap());
    }

    #[test]
    fn test_file_store_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("absent"));
        assert!(store.put(ALBUM_CACHE_KEY, b"[]").is_err());
    }

    #[test]
    fn test_memory_store_shared() {
        let store = MemoryStore::new();
        let copy = store.clone();
        copy.put("k", b"v").unwrap();
        assert_eq!(Some(b"v".to_vec()), store.get("k").unwrap());
        assert_eq!(None, store.get("other").unwrap());
    }
}
