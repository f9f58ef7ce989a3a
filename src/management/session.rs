use std::{io::ErrorKind, path::PathBuf};

use crate::{Error, Res, types::Session};

/// Reads and writes the session file.
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Loads the stored session.
    ///
    /// A missing file yields [`Error::SessionNotFound`] and unparseable
    /// content [`Error::SessionCorrupt`]; callers treat both as a first run.
    pub async fn load(&self) -> Res<Session> {
        let content = match async_fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(Error::SessionNotFound(self.path.clone()));
            }
            Err(e) => return Err(Error::Io(e)),
        };

        serde_json::from_str(&content).map_err(|source| Error::SessionCorrupt {
            path: self.path.clone(),
            source,
        })
    }

    pub async fn persist(&self, session: &Session) -> Res<()> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(session)?;
        async_fs::write(&self.path, json).await?;
        log::debug!("session written to {}", self.path.display());
        Ok(())
    }
}
