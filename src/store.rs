use crate::com::Com;
use crate::error::{ScanError, StoreError};
use crate::session::TagSession;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Named lists of formatted UIDs, one `<name>.json` file per list.
///
/// Lists are cached after the first access. A missing or unreadable file is
/// an empty list; only writes report errors.
pub struct AllowListStore {
    dir: PathBuf,
    lists: HashMap<String, Vec<String>>,
}

impl AllowListStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            lists: HashMap::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, name: &str) -> Result<PathBuf, StoreError> {
        let valid = !name.is_empty()
            && name != "."
            && name != ".."
            && !name.contains(|c: char| c == '/' || c == '\\' || c == '\0');
        if !valid {
            return Err(StoreError::InvalidName(name.into()));
        }
        Ok(self.dir.join(format!("{}.json", name)))
    }

    /// Reads the list from disk, replacing any cached copy.
    pub fn load(&mut self, name: &str) -> Result<&[String], StoreError> {
        let path = self.path(name)?;
        let list = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str::<Vec<String>>(&text).unwrap_or_else(|err| {
                log::warn!("{} is not a UID list, starting empty: {}", path.display(), err);
                Vec::new()
            }),
            Err(err) => {
                if err.kind() != io::ErrorKind::NotFound {
                    log::warn!("cannot read {}: {}", path.display(), err);
                }
                Vec::new()
            }
        };
        let slot = self.lists.entry(name.into()).or_default();
        *slot = list;
        Ok(slot.as_slice())
    }

    /// Writes the cached list; does nothing for a list never loaded.
    pub fn save(&self, name: &str) -> Result<(), StoreError> {
        let path = self.path(name)?;
        if let Some(list) = self.lists.get(name) {
            fs::create_dir_all(&self.dir)?;
            fs::write(&path, serde_json::to_string(list)?)?;
        }
        Ok(())
    }

    pub fn list(&mut self, name: &str) -> Result<&[String], StoreError> {
        if !self.lists.contains_key(name) {
            return self.load(name);
        }
        Ok(self.lists.get(name).map(Vec::as_slice).unwrap_or_default())
    }

    pub fn contains(&mut self, name: &str, uid: &str) -> Result<bool, StoreError> {
        Ok(self.list(name)?.iter().any(|id| id == uid))
    }

    /// Appends `uid` unless already listed. Returns whether it was added.
    pub fn add(&mut self, name: &str, uid: &str) -> Result<bool, StoreError> {
        if self.contains(name, uid)? {
            return Ok(false);
        }
        self.lists.entry(name.into()).or_default().push(uid.into());
        self.save(name)?;
        log::info!("added {} to {}", uid, name);
        Ok(true)
    }

    /// Removes `uid`; the list file is deleted once the list is empty.
    pub fn remove(&mut self, name: &str, uid: &str) -> Result<bool, StoreError> {
        if !self.contains(name, uid)? {
            return Ok(false);
        }
        let list = self.lists.entry(name.into()).or_default();
        list.retain(|id| id != uid);
        if list.is_empty() {
            self.lists.remove(name);
            remove_file(&self.path(name)?)?;
        } else {
            self.save(name)?;
        }
        log::info!("removed {} from {}", uid, name);
        Ok(true)
    }

    /// Forgets the list and deletes its file. Returns whether a file existed.
    pub fn clear(&mut self, name: &str) -> Result<bool, StoreError> {
        let path = self.path(name)?;
        self.lists.remove(name);
        let existed = remove_file(&path)?;
        if existed {
            log::info!("deleted list {}", name);
        }
        Ok(existed)
    }

    /// Reads the card in the field and adds it to `name`.
    /// Returns the UID read, if any.
    pub fn scan_and_add<C: Com>(
        &mut self,
        session: &mut TagSession<C>,
        name: &str,
    ) -> Result<Option<String>, ScanError<C::Error>> {
        let Some(uid) = session.scan_card()? else {
            return Ok(None);
        };
        self.add(name, &uid)?;
        Ok(Some(uid))
    }

    /// Whether the card in the field is on `name`; false when no card was read.
    pub fn scan_and_check<C: Com>(
        &mut self,
        session: &mut TagSession<C>,
        name: &str,
    ) -> Result<bool, ScanError<C::Error>> {
        match session.scan_card()? {
            Some(uid) => Ok(self.contains(name, &uid)?),
            None => Ok(false),
        }
    }

    /// Reads the card in the field and removes it from `name`.
    /// Returns whether the card was listed.
    pub fn scan_and_remove<C: Com>(
        &mut self,
        session: &mut TagSession<C>,
        name: &str,
    ) -> Result<bool, ScanError<C::Error>> {
        match session.scan_card()? {
            Some(uid) => Ok(self.remove(name, &uid)?),
            None => Ok(false),
        }
    }
}

fn remove_file(path: &Path) -> Result<bool, StoreError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err.into()),
    }
}
