use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

/// Builds the list of stored page identifiers by walking the storage directory
#[derive(Clone)]
pub struct IndexService {
    storage_dir: PathBuf,
}

impl IndexService {
    pub fn new(storage_dir: PathBuf) -> Self {
        Self { storage_dir }
    }

    /// Identifiers of every file under the storage tree ending in `extension`.
    ///
    /// Subdirectories are walked but never listed. An entry that cannot be read
    /// is logged and skipped so one bad entry does not break the index. The
    /// result is sorted and free of duplicates.
    pub fn list(&self, extension: &str) -> Vec<String> {
        let start_time = std::time::Instant::now();
        let mut ids = Vec::new();
        if !self.storage_dir.is_dir() {
            debug!("Storage directory {:?} missing, index is empty", self.storage_dir);
            return ids;
        }

        self.walk(&self.storage_dir, extension, &mut ids);
        ids.sort();
        ids.dedup();

        info!(
            "Indexed {} pages in {:?}ms",
            ids.len(),
            start_time.elapsed().as_millis()
        );
        ids
    }

    fn walk(&self, dir: &Path, extension: &str, ids: &mut Vec<String>) {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Skipping unreadable directory {:?}: {}", dir, e);
                return;
            }
        };

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping directory entry in {:?}: {}", dir, e);
                    continue;
                }
            };
            let path = entry.path();
            let file_type = match entry.file_type() {
                Ok(file_type) => file_type,
                Err(e) => {
                    warn!("Skipping {:?}: {}", path, e);
                    continue;
                }
            };

            if file_type.is_dir() {
                self.walk(&path, extension, ids);
                continue;
            }
            // Symlinks count only when they point at a regular file
            if file_type.is_symlink() && !path.is_file() {
                debug!("Skipping link {:?}", path);
                continue;
            }

            let name = entry.file_name().to_string_lossy().into_owned();
            if let Some(id) = name.strip_suffix(extension) {
                if !id.is_empty() && !id.starts_with('.') {
                    ids.push(id.to_string());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_matching_files_sorted() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("zeta.txt"), "z").unwrap();
        fs::write(dir.path().join("alpha.txt"), "a").unwrap();
        fs::write(dir.path().join("app-config.json"), "{}").unwrap();
        fs::write(dir.path().join("notes.md"), "#").unwrap();

        let index = IndexService::new(dir.path().to_path_buf());
        assert_eq!(index.list(".txt"), vec!["alpha", "zeta"]);
    }

    #[test]
    fn walks_subdirectories_without_listing_them() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("nested/deeper.txt")).unwrap();
        fs::write(dir.path().join("nested/inner.txt"), "i").unwrap();
        fs::write(dir.path().join("top.txt"), "t").unwrap();

        let index = IndexService::new(dir.path().to_path_buf());
        assert_eq!(index.list(".txt"), vec!["inner", "top"]);
    }

    #[test]
    fn ignores_temp_and_hidden_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".draft-123.tmp"), "x").unwrap();
        fs::write(dir.path().join(".txt"), "x").unwrap();
        fs::write(dir.path().join("page.txt"), "x").unwrap();

        let index = IndexService::new(dir.path().to_path_buf());
        assert_eq!(index.list(".txt"), vec!["page"]);
    }

    #[test]
    fn missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let index = IndexService::new(dir.path().join("nope"));
        assert!(index.list(".txt").is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn broken_entry_does_not_abort_scan() {
        let dir = tempfile::tempdir().unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone"), dir.path().join("dangling.txt")).unwrap();
        fs::write(dir.path().join("kept.txt"), "k").unwrap();

        let index = IndexService::new(dir.path().to_path_buf());
        assert_eq!(index.list(".txt"), vec!["kept"]);
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_subdirectory_is_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let locked = dir.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::write(locked.join("hidden.txt"), "h").unwrap();
        fs::write(dir.path().join("open.txt"), "o").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Permission bits do not bind a privileged user
        let privileged = fs::read_dir(&locked).is_ok();
        let ids = IndexService::new(dir.path().to_path_buf()).list(".txt");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        if privileged {
            return;
        }

        assert_eq!(ids, vec!["open"]);
    }
}
