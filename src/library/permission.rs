//! Access to the user's media folders.
//!
//! On the desktop there is no OS-level media permission, so "granted" means
//! at least one configured media folder exists and can be listed.

use std::path::{Path, PathBuf};

use crate::config::AppConfig;
use crate::error::{MediaError, MediaResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

pub trait PermissionProvider {
    fn request_permission(&mut self) -> MediaResult<PermissionStatus>;

    /// Take the user somewhere they can grant access.
    fn open_system_settings(&self) -> MediaResult<()>;
}

pub struct FolderPermission {
    media_dirs: Vec<PathBuf>,
    settings_path: PathBuf,
}

impl FolderPermission {
    pub fn new(media_dirs: Vec<PathBuf>, settings_path: PathBuf) -> Self {
        Self {
            media_dirs,
            settings_path,
        }
    }

    /// The folders that can currently be read.
    pub fn readable_dirs(&self) -> Vec<&Path> {
        self.media_dirs
            .iter()
            .filter(|dir| std::fs::read_dir(dir).is_ok())
            .map(PathBuf::as_path)
            .collect()
    }
}

impl PermissionProvider for FolderPermission {
    fn request_permission(&mut self) -> MediaResult<PermissionStatus> {
        if self.readable_dirs().is_empty() {
            log::info!(
                "None of {} configured media folder(s) is readable",
                self.media_dirs.len()
            );
            Ok(PermissionStatus::Denied)
        } else {
            Ok(PermissionStatus::Granted)
        }
    }

    fn open_system_settings(&self) -> MediaResult<()> {
        // The handler needs an existing file to open.
        if !self.settings_path.exists() {
            crate::config::save_config_to(&AppConfig::default(), &self.settings_path)
                .map_err(|e| MediaError::CatalogLoadFailure(e.to_string()))?;
        }
        open::that(&self.settings_path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_granted_with_readable_folder() {
        let dir = tempfile::tempdir().unwrap();
        let mut permission = FolderPermission::new(
            vec![PathBuf::from("/definitely/not/here"), dir.path().to_path_buf()],
            dir.path().join("config.json"),
        );

        assert_eq!(permission.request_permission().unwrap(), PermissionStatus::Granted);
        assert_eq!(permission.readable_dirs(), vec![dir.path()]);
    }

    #[test]
    fn test_denied_without_folders() {
        let mut permission = FolderPermission::new(vec![], PathBuf::from("config.json"));
        assert_eq!(permission.request_permission().unwrap(), PermissionStatus::Denied);
    }
}
