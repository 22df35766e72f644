use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Fixed storage namespaces, one JSON document each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// Autosaved form payload of the analysis being edited.
    Draft,
    /// Ordered list of analysis records.
    Analyses,
    /// Map of record id to the full company payload it was scored with.
    Payloads,
    /// Id of the analysis currently being worked on.
    Current,
    /// Analyses consumed in this session.
    Usage,
    /// Bearer token of the signed-in account.
    Token,
    /// Profile of the signed-in account.
    Profile,
    /// TTL cache of backend helper tables.
    Helpers,
}

impl Namespace {
    pub const ALL: [Namespace; 8] = [
        Namespace::Draft,
        Namespace::Analyses,
        Namespace::Payloads,
        Namespace::Current,
        Namespace::Usage,
        Namespace::Token,
        Namespace::Profile,
        Namespace::Helpers,
    ];

    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Namespace::Draft => "draft.json",
            Namespace::Analyses => "analyses.json",
            Namespace::Payloads => "payloads.json",
            Namespace::Current => "current.json",
            Namespace::Usage => "usage.json",
            Namespace::Token => "token.json",
            Namespace::Profile => "profile.json",
            Namespace::Helpers => "helpers.json",
        }
    }
}

#[derive(Error, Debug)]
enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Durable key/value state under a single directory.
#[derive(Debug, Clone)]
pub struct LocalStore {
    dir: PathBuf,
}

impl LocalStore {
    #[must_use]
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, ns: Namespace) -> PathBuf {
        self.dir.join(ns.file_name())
    }

    /// Document stored under `ns`, or `None` when missing, unreadable or
    /// corrupt. Corruption is logged; absence is not.
    #[must_use]
    pub fn get<T: DeserializeOwned>(&self, ns: Namespace) -> Option<T> {
        let path = self.path(ns);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return None,
            Err(err) => {
                log::warn!("State read failed {}: {err}", path.display());
                return None;
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(err) => {
                log::warn!("State document corrupted {}: {err}", path.display());
                None
            }
        }
    }

    /// Persist `value` under `ns`. Failures are logged and dropped.
    pub fn set<T: Serialize>(&self, ns: Namespace, value: &T) {
        if let Err(err) = self.try_set(ns, value) {
            log::warn!("State write failed {}: {err}", self.path(ns).display());
        }
    }

    fn try_set<T: Serialize>(&self, ns: Namespace, value: &T) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        let bytes = serde_json::to_vec_pretty(value)?;
        fs::write(self.path(ns), bytes)?;
        Ok(())
    }

    /// Drop the document stored under `ns`, if any.
    pub fn remove(&self, ns: Namespace) {
        let path = self.path(ns);
        if let Err(err) = fs::remove_file(&path) {
            if err.kind() != io::ErrorKind::NotFound {
                log::warn!("State remove failed {}: {err}", path.display());
            }
        }
    }
}
