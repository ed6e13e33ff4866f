//! Persisted theme choice: a one-word flag file (`light` or `dark`).

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use neon_widgets::theme_toggle::Theme;

#[derive(Debug, thiserror::Error)]
pub enum ThemeStoreError {
    #[error("failed to read theme flag {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write theme flag {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone)]
pub struct ThemeStore {
    path: PathBuf,
}

impl ThemeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The flag file inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join("theme"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored theme; dark when nothing has been stored yet.
    pub async fn load(&self) -> Result<Theme, ThemeStoreError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(flag) => Ok(Theme::from_flag(&flag)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Theme::default()),
            Err(source) => Err(ThemeStoreError::Read {
                path: self.path.clone(),
                source,
            }),
        }
    }

    pub async fn save(&self, theme: Theme) -> Result<(), ThemeStoreError> {
        let write_err = |source| ThemeStoreError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
        }
        tokio::fs::write(&self.path, theme.flag())
            .await
            .map_err(write_err)?;
        tracing::debug!(path = %self.path.display(), theme = theme.flag(), "theme saved");
        Ok(())
    }
}
