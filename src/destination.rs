//! Locating the DAW's resource folder.
//!
//! Exports can target any folder, or the `Data` folder inside the DAW's
//! per-user resource directory, where toolbar and track icons are picked up
//! automatically.

use std::env;
use std::path::{Path, PathBuf};

/// Name of the resource directory the DAW creates for each user.
const RESOURCE_DIR_NAME: &str = "REAPER";

/// Subfolder of the resource directory that holds icon folders.
pub const DATA_DIR_NAME: &str = "Data";

/// Conventional resource directory for the current platform, whether or not
/// it exists.
pub fn conventional_resource_dir() -> Option<PathBuf> {
    if cfg!(target_os = "macos") {
        home_dir().map(|home| {
            home.join("Library")
                .join("Application Support")
                .join(RESOURCE_DIR_NAME)
        })
    } else if cfg!(windows) {
        env::var_os("APPDATA").map(|appdata| PathBuf::from(appdata).join(RESOURCE_DIR_NAME))
    } else {
        let config = env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .filter(|p| p.is_absolute())
            .or_else(|| home_dir().map(|home| home.join(".config")))?;
        Some(config.join(RESOURCE_DIR_NAME))
    }
}

/// The resource directory, only if it exists on this machine.
pub fn default_resource_dir() -> Option<PathBuf> {
    let dir = conventional_resource_dir()?;
    if dir.is_dir() {
        log::debug!("found resource directory at {}", dir.display());
        Some(dir)
    } else {
        log::debug!("no resource directory at {}", dir.display());
        None
    }
}

/// The `Data` export target inside a resource directory.
pub fn data_dir(resource_dir: &Path) -> PathBuf {
    resource_dir.join(DATA_DIR_NAME)
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .or_else(|| env::var_os("USERPROFILE"))
        .map(PathBuf::from)
        .filter(|p| !p.as_os_str().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_dir_is_subfolder() {
        let root = Path::new("/some/REAPER");
        assert_eq!(data_dir(root), Path::new("/some/REAPER/Data"));
    }

    #[test]
    fn conventional_dir_ends_with_resource_name() {
        if let Some(dir) = conventional_resource_dir() {
            assert!(dir.ends_with(RESOURCE_DIR_NAME));
        }
    }
}
