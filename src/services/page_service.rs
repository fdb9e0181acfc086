use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, error, info, warn};
use uuid::Uuid;

use crate::errors::NotesError;
use crate::routing::{is_valid_identifier, PageId};
use crate::types::Page;
use crate::utils::write_private;

/// Loads and saves page bodies as `<id><extension>` files in the storage directory.
///
/// Nothing is cached: every load reads from disk. Saves to the same id race at
/// the filesystem and the last rename wins.
#[derive(Clone)]
pub struct PageService {
    storage_dir: PathBuf,
    extension: String,
}

impl PageService {
    pub fn new(storage_dir: PathBuf, extension: &str) -> Self {
        let extension = if extension.starts_with('.') {
            extension.to_string()
        } else {
            format!(".{}", extension)
        };
        debug!("Creating PageService in {:?} with extension {}", storage_dir, extension);
        Self { storage_dir, extension }
    }

    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Create the storage directory if it does not exist yet
    pub fn ensure_storage_dir(&self) -> Result<(), NotesError> {
        if !self.storage_dir.is_dir() {
            info!("Creating storage directory {:?}", self.storage_dir);
            fs::create_dir_all(&self.storage_dir)?;
        }
        Ok(())
    }

    /// Location of the file backing `id`
    pub fn page_path(&self, id: &PageId) -> Result<PathBuf, NotesError> {
        // PageId already enforces this; rechecked before any path is built
        let raw = id.as_str();
        if !is_valid_identifier(raw) {
            warn!("Refusing page identifier {:?}", raw);
            return Err(NotesError::InvalidIdentifier(raw.to_string()));
        }
        Ok(self.storage_dir.join(format!("{}{}", raw, self.extension)))
    }

    /// Read a page. Missing or unreadable files are reported as `NotFound`.
    pub fn load(&self, id: &PageId) -> Result<Page, NotesError> {
        let path = self.page_path(id)?;
        match fs::read(&path) {
            Ok(body) => {
                debug!("Loaded page '{}' ({} bytes)", id, body.len());
                Ok(Page::new(id.clone(), body))
            }
            Err(e) => {
                debug!("Page '{}' not loaded from {:?}: {}", id, path, e);
                Err(NotesError::NotFound)
            }
        }
    }

    /// Write a page through a temporary file renamed over the target
    pub fn save(&self, page: &Page) -> Result<(), NotesError> {
        let target = self.page_path(&page.id)?;
        self.ensure_storage_dir()?;

        let tmp = self.storage_dir.join(format!(".{}-{}.tmp", page.id, Uuid::new_v4()));
        if let Err(e) = write_private(&tmp, &page.body) {
            error!("Failed to write {:?}: {}", tmp, e);
            let _ = fs::remove_file(&tmp);
            return Err(NotesError::Io(e));
        }
        if let Err(e) = fs::rename(&tmp, &target) {
            error!("Failed to move {:?} into place at {:?}: {}", tmp, target, e);
            let _ = fs::remove_file(&tmp);
            return Err(NotesError::Io(e));
        }

        info!("Saved page '{}' ({} bytes)", page.id, page.body.len());
        Ok(())
    }
}
