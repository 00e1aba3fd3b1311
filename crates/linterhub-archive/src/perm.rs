//! Mode bits applied to extracted entries.
//!
//! Modes are set explicitly after creation so the process umask does not
//! alter them. On non-unix targets these are no-ops.

use std::io;
use std::path::Path;

pub const DIR_MODE: u32 = 0o775;
pub const EXEC_MODE: u32 = 0o755;
pub const FILE_MODE: u32 = 0o664;

#[cfg(unix)]
pub fn set_mode(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
pub fn set_mode(_path: &Path, _mode: u32) -> io::Result<()> { Ok(()) }

/// Create `dir` and any missing parents, then force [`DIR_MODE`] on `dir`.
pub fn create_dir(dir: &Path) -> io::Result<()> {
    let mut builder = std::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(DIR_MODE);
    }
    builder.create(dir)?;
    set_mode(dir, DIR_MODE)
}
