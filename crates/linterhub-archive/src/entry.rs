use std::path::{Component, Path, PathBuf};

use crate::error::{ExtractError, Result};
use crate::options::ExecutablePolicy;

/// One archive member, classified.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub relative_path: PathBuf,
    pub is_directory:  bool,
    pub is_executable: bool,
}

impl ArchiveEntry {
    /// Classify a raw entry name. Names ending in a separator are
    /// directories; paths that would land outside the target are rejected.
    pub fn classify(name: &str, policy: &ExecutablePolicy) -> Result<Self> {
        let is_directory = name.ends_with('/') || name.ends_with('\\');
        let relative_path = enclosed(name).ok_or_else(|| ExtractError::InvalidPath(name.to_string()))?;
        let is_executable = !is_directory && policy.is_executable(&relative_path);
        Ok(Self {
            relative_path,
            is_directory,
            is_executable,
        })
    }

    pub fn target_path(&self, target: &Path) -> PathBuf { target.join(&self.relative_path) }

    pub fn mode(&self) -> u32 {
        use crate::perm::{DIR_MODE, EXEC_MODE, FILE_MODE};
        match (self.is_directory, self.is_executable) {
            (true, _) => DIR_MODE,
            (false, true) => EXEC_MODE,
            (false, false) => FILE_MODE,
        }
    }
}

/// Normalise `name` into a relative path that stays under its root.
fn enclosed(name: &str) -> Option<PathBuf> {
    if name.contains('\0') {
        return None;
    }
    let mut out = PathBuf::new();
    for component in Path::new(&name.replace('\\', "/")).components() {
        match component {
            Component::Normal(part) => out.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    return None;
                }
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    (!out.as_os_str().is_empty()).then_some(out)
}
