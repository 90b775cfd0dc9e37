use std::{
    fs::File,
    io::{self, Write},
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::{Result, SkyfetchError};

/// Whether an existing artifact suppresses the write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum WritePolicy {
    #[default]
    Overwrite,
    /// The artifact's existence, not its content, is the idempotency key.
    SkipIfExists,
}

/// Where an artifact goes and how an existing file is treated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactSpec {
    pub path: PathBuf,
    pub policy: WritePolicy,
}

impl ArtifactSpec {
    pub fn overwrite(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            policy: WritePolicy::Overwrite,
        }
    }

    pub fn skip_if_exists(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            policy: WritePolicy::SkipIfExists,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `content` according to the policy. Returns whether the file was written.
    ///
    /// Empty content is never written. Content goes to a temporary file next
    /// to the target which is then renamed over it, so a failed write leaves
    /// the target untouched. The existence check and the rename are not
    /// atomic with respect to other processes targeting the same path.
    pub fn persist(
        &self,
        content: &[u8],
    ) -> Result<bool> {
        if content.is_empty() {
            debug!(path = %self.path.display(), "nothing to write");
            return Ok(false);
        }

        if self.policy == WritePolicy::SkipIfExists && self.path.exists() {
            info!(path = %self.path.display(), "artifact exists, skipping write");
            return Ok(false);
        }

        self.write_with(|file| file.write_all(content))?;

        info!(path = %self.path.display(), bytes = content.len(), "artifact written");
        Ok(true)
    }

    fn write_with<W>(
        &self,
        write: W,
    ) -> Result<()>
    where
        W: FnOnce(&mut File) -> io::Result<()>,
    {
        let parent = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };

        // dropping the temp file on any error below removes it
        let mut staged = NamedTempFile::new_in(parent).map_err(|err| self.persistence_error(err))?;
        write(staged.as_file_mut()).map_err(|err| self.persistence_error(err))?;
        staged.as_file().sync_all().map_err(|err| self.persistence_error(err))?;
        staged.persist(&self.path).map_err(|err| self.persistence_error(err.error))?;
        Ok(())
    }

    fn persistence_error(
        &self,
        err: io::Error,
    ) -> SkyfetchError {
        SkyfetchError::Persistence {
            path: self.path.display().to_string(),
            message: err.to_string(),
        }
    }
}
