use std::env;
use std::path::PathBuf;

/// Directory name used under the per-user data root.
pub const APP_DIR: &str = "linterhub";

pub fn user_home() -> Option<PathBuf> {
    home::home_dir()
}

pub fn user_data() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        env::var_os("LOCALAPPDATA").map(PathBuf::from)
    }
    #[cfg(target_os = "macos")]
    {
        user_home().map(|p| p.join("Library/Application Support"))
    }
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        env::var_os("XDG_DATA_HOME")
            .map(PathBuf::from)
            .or_else(|| user_home().map(|p| p.join(".local/share")))
    }
}

/// Default folder the linterhub CLI is installed into when the host does not
/// configure one. Falls back to the temp dir when no home is resolvable.
pub fn default_install_folder() -> PathBuf {
    user_data()
        .unwrap_or_else(env::temp_dir)
        .join(APP_DIR)
}
