//! Identity persistence.
//!
//! # Responsibilities
//! - Persist the identity pair in one of two tiers: tab-scoped or remembered
//! - Write both keys of the pair in a single step
//! - Read the active identity: tab-scoped first, remembered second
//!
//! # Design Decisions
//! - Tiers are injected behind [`IdentityStore`] so pages never touch ambient state
//! - Tab-scoped defaults to process memory; remembered defaults to a JSON file
//! - File writes go through a temp file + rename so readers never see half a pair
//! - No conflict detection: when both tiers hold an identity the tab-scoped one wins

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;

use crate::config::SessionConfig;
use crate::observability::metrics;
use crate::session::identity::{Identity, IdentityError, USER_ID_KEY, USER_TYPE_KEY};

/// Errors raised by identity stores.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session store I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Session store at {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Stored identity is invalid: {0}")]
    Invalid(#[from] IdentityError),
}

/// One persistence tier for the identity pair.
pub trait IdentityStore: Send + Sync {
    /// Identity held by this tier, if any.
    fn load(&self) -> Result<Option<Identity>, SessionError>;

    /// Replace the held identity. Both keys are written together.
    fn save(&self, identity: &Identity) -> Result<(), SessionError>;

    /// Remove the identity keys.
    fn clear(&self) -> Result<(), SessionError>;
}

/// Which tier a login was persisted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Persistence {
    /// Lives as long as the current tab (process).
    TabScoped,
    /// Survives restarts ("remember me").
    Remembered,
}

impl Persistence {
    pub fn from_remember(remember: bool) -> Self {
        if remember {
            Persistence::Remembered
        } else {
            Persistence::TabScoped
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Persistence::TabScoped => "tab_scoped",
            Persistence::Remembered => "remembered",
        }
    }
}

/// In-memory tier.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw key/value contents.
    pub fn entries(&self) -> BTreeMap<String, String> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl IdentityStore for MemoryStore {
    fn load(&self) -> Result<Option<Identity>, SessionError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(Identity::from_entries(&entries)?)
    }

    fn save(&self, identity: &Identity) -> Result<(), SessionError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        for (key, value) in identity.to_entries() {
            entries.insert(key.to_string(), value);
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(USER_ID_KEY);
        entries.remove(USER_TYPE_KEY);
        Ok(())
    }
}

/// JSON-file tier.
///
/// The file holds a flat string map; keys other than the identity pair are
/// preserved across writes.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> SessionError {
        SessionError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>, SessionError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(self.io_error(e)),
        };
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content).map_err(|source| SessionError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), SessionError> {
        if entries.is_empty() {
            return match fs::remove_file(&self.path) {
                Err(e) if e.kind() != io::ErrorKind::NotFound => Err(self.io_error(e)),
                _ => Ok(()),
            };
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let json = serde_json::to_vec_pretty(entries).map_err(|source| SessionError::Corrupt {
            path: self.path.clone(),
            source,
        })?;
        let tmp = self.tmp_path();
        fs::write(&tmp, json).map_err(|e| self.io_error(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))
    }

    /// `<file name>.tmp` next to the target, written before the rename.
    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl IdentityStore for FileStore {
    fn load(&self) -> Result<Option<Identity>, SessionError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let entries = self.read_entries()?;
        Ok(Identity::from_entries(&entries)?)
    }

    fn save(&self, identity: &Identity) -> Result<(), SessionError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries = match self.read_entries() {
            Ok(entries) => entries,
            Err(SessionError::Corrupt { .. }) => {
                tracing::warn!(path = %self.path.display(), "Overwriting corrupt session file");
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };
        for (key, value) in identity.to_entries() {
            entries.insert(key.to_string(), value);
        }
        self.write_entries(&entries)
    }

    fn clear(&self) -> Result<(), SessionError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries = match self.read_entries() {
            Ok(entries) => entries,
            Err(SessionError::Corrupt { .. }) => BTreeMap::new(),
            Err(e) => return Err(e),
        };
        entries.remove(USER_ID_KEY);
        entries.remove(USER_TYPE_KEY);
        self.write_entries(&entries)
    }
}

/// The pair of identity tiers, constructed once and shared by every page.
#[derive(Clone)]
pub struct SessionStore {
    tab_scoped: Arc<dyn IdentityStore>,
    remembered: Arc<dyn IdentityStore>,
}

impl SessionStore {
    pub fn new(tab_scoped: Arc<dyn IdentityStore>, remembered: Arc<dyn IdentityStore>) -> Self {
        Self {
            tab_scoped,
            remembered,
        }
    }

    /// Both tiers in memory.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()), Arc::new(MemoryStore::new()))
    }

    /// Tiers as described by configuration.
    pub fn from_config(config: &SessionConfig) -> Self {
        let tab_scoped: Arc<dyn IdentityStore> = match &config.tab_scoped_path {
            Some(path) => Arc::new(FileStore::new(path)),
            None => Arc::new(MemoryStore::new()),
        };
        Self::new(tab_scoped, Arc::new(FileStore::new(&config.remembered_path)))
    }

    pub fn tab_scoped(&self) -> &dyn IdentityStore {
        self.tab_scoped.as_ref()
    }

    pub fn remembered(&self) -> &dyn IdentityStore {
        self.remembered.as_ref()
    }

    /// Active identity: tab-scoped tier first, then remembered.
    ///
    /// An unreadable tier is logged and treated as empty.
    pub fn current_identity(&self) -> Option<Identity> {
        let tiers = [
            (Persistence::TabScoped, &self.tab_scoped),
            (Persistence::Remembered, &self.remembered),
        ];
        for (tier, store) in tiers {
            match store.load() {
                Ok(Some(identity)) => return Some(identity),
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(store = tier.as_str(), error = %e, "Ignoring unreadable session identity");
                }
            }
        }
        None
    }

    /// Persist a fresh login in the tier selected by `remember`.
    ///
    /// The other tier is left as it is.
    pub fn persist(&self, identity: &Identity, remember: bool) -> Result<Persistence, SessionError> {
        let tier = Persistence::from_remember(remember);
        match tier {
            Persistence::TabScoped => self.tab_scoped.save(identity)?,
            Persistence::Remembered => self.remembered.save(identity)?,
        }
        metrics::record_login(tier.as_str());
        tracing::info!(user_id = identity.user_id, user_type = %identity.user_type, store = tier.as_str(), "Session identity stored");
        Ok(tier)
    }

    /// Log out: clear both tiers. Both are attempted; the first error is returned.
    pub fn clear(&self) -> Result<(), SessionError> {
        let tab = self.tab_scoped.clear();
        let remembered = self.remembered.clear();
        tab.and(remembered)?;
        tracing::info!("Session identity cleared");
        Ok(())
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::identity::UserType;

    fn temp_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("bloody-{}-{}.json", tag, uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_memory_store_pair() {
        let store = MemoryStore::new();
        assert!(store.load().unwrap().is_none());

        let identity = Identity::new(9, UserType::Donante);
        store.save(&identity).unwrap();
        assert_eq!(store.load().unwrap(), Some(identity));
        assert_eq!(store.entries().len(), 2);

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
        assert!(store.entries().is_empty());
    }

    #[test]
    fn test_file_store_persistence() {
        let path = temp_path("file-store");
        let identity = Identity::new(5, UserType::CentroSalud);

        FileStore::new(&path).save(&identity).unwrap();

        // New instance over the same file
        let reopened = FileStore::new(&path);
        assert_eq!(reopened.load().unwrap(), Some(identity));

        let raw: BTreeMap<String, String> = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw.get("user_id").map(String::as_str), Some("5"));
        assert_eq!(raw.get("user_type").map(String::as_str), Some("centro_salud"));

        reopened.clear().unwrap();
        assert!(!path.exists());
        assert!(reopened.load().unwrap().is_none());
    }

    #[test]
    fn test_file_store_keeps_foreign_keys() {
        let path = temp_path("foreign-keys");
        fs::write(&path, r#"{"theme":"dark"}"#).unwrap();

        let store = FileStore::new(&path);
        store.save(&Identity::new(1, UserType::Admin)).unwrap();
        store.clear().unwrap();

        let raw: BTreeMap<String, String> = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw.len(), 1);
        assert_eq!(raw.get("theme").map(String::as_str), Some("dark"));
        fs::remove_file(&path).unwrap_or_default();
    }

    #[test]
    fn test_file_store_corrupt_file() {
        let path = temp_path("corrupt");
        fs::write(&path, "{not json").unwrap();

        let store = FileStore::new(&path);
        assert!(matches!(store.load(), Err(SessionError::Corrupt { .. })));

        let identity = Identity::new(2, UserType::Donante);
        store.save(&identity).unwrap();
        assert_eq!(store.load().unwrap(), Some(identity));
        fs::remove_file(&path).unwrap_or_default();
    }

    #[test]
    fn test_file_stores_sharing_a_stem() {
        let dir = std::env::temp_dir().join(format!("bloody-stem-{}", uuid::Uuid::new_v4()));
        let remembered = FileStore::new(dir.join("session.json"));
        let tab = FileStore::new(dir.join("session.tab"));
        assert_ne!(remembered.tmp_path(), tab.tmp_path());
        assert_eq!(remembered.tmp_path(), dir.join("session.json.tmp"));

        remembered.save(&Identity::new(1, UserType::Admin)).unwrap();
        tab.save(&Identity::new(2, UserType::Donante)).unwrap();

        assert_eq!(remembered.load().unwrap(), Some(Identity::new(1, UserType::Admin)));
        assert_eq!(tab.load().unwrap(), Some(Identity::new(2, UserType::Donante)));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_tab_scoped_wins_over_remembered() {
        let sessions = SessionStore::in_memory();
        sessions.remembered().save(&Identity::new(1, UserType::Admin)).unwrap();
        sessions.tab_scoped().save(&Identity::new(2, UserType::Donante)).unwrap();

        assert_eq!(sessions.current_identity(), Some(Identity::new(2, UserType::Donante)));
    }

    #[test]
    fn test_remembered_is_fallback() {
        let sessions = SessionStore::in_memory();
        assert_eq!(sessions.current_identity(), None);

        sessions.remembered().save(&Identity::new(7, UserType::CentroSalud)).unwrap();
        assert_eq!(sessions.current_identity(), Some(Identity::new(7, UserType::CentroSalud)));
    }

    #[test]
    fn test_persist_selects_one_tier() {
        let sessions = SessionStore::in_memory();
        let earlier = Identity::new(1, UserType::Admin);
        sessions.remembered().save(&earlier).unwrap();

        let fresh = Identity::new(3, UserType::Donante);
        assert_eq!(sessions.persist(&fresh, false).unwrap(), Persistence::TabScoped);
        assert_eq!(sessions.tab_scoped().load().unwrap(), Some(fresh));
        assert_eq!(sessions.remembered().load().unwrap(), Some(earlier));

        let other = SessionStore::in_memory();
        assert_eq!(other.persist(&fresh, true).unwrap(), Persistence::Remembered);
        assert_eq!(other.remembered().load().unwrap(), Some(fresh));
        assert!(other.tab_scoped().load().unwrap().is_none());
    }

    #[test]
    fn test_clear_empties_both_tiers() {
        let sessions = SessionStore::in_memory();
        sessions.persist(&Identity::new(1, UserType::Admin), true).unwrap();
        sessions.persist(&Identity::new(2, UserType::Donante), false).unwrap();

        sessions.clear().unwrap();
        assert_eq!(sessions.current_identity(), None);
    }

    #[test]
    fn test_unreadable_tier_falls_back() {
        let path = temp_path("unreadable-tab");
        fs::write(&path, "garbage").unwrap();
        let sessions = SessionStore::new(Arc::new(FileStore::new(&path)), Arc::new(MemoryStore::new()));
        sessions.remembered().save(&Identity::new(4, UserType::Admin)).unwrap();

        assert_eq!(sessions.current_identity(), Some(Identity::new(4, UserType::Admin)));
        fs::remove_file(&path).unwrap_or_default();
    }
}
