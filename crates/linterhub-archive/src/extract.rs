use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use zip::ZipArchive;

use crate::entry::ArchiveEntry;
use crate::error::{ExtractError, Result};
use crate::options::ExtractOptions;
use crate::perm;

/// Outcome of a completed extraction.
#[derive(Clone, Debug)]
pub struct ExtractReport {
    pub target:  PathBuf,
    pub entries: Vec<ArchiveEntry>,
}

impl ExtractReport {
    pub fn file_count(&self) -> usize { self.entries.iter().filter(|e| !e.is_directory).count() }
}

/// Extract `archive` into `target`.
///
/// Entries are visited in archive order with at most one open at a time. A
/// directory entry creates its directory (parents included) with mode 0775;
/// a file entry creates its parent with the same mode, is streamed to disk
/// and then receives 0755 or 0664 according to the executable policy. The
/// first failure stops the walk. The archive handle is released on every
/// return path.
pub fn extract(archive: &Path, target: &Path, options: &ExtractOptions) -> Result<ExtractReport> {
    let open_error = |reason: String| ExtractError::ArchiveOpen {
        path: archive.to_path_buf(),
        reason,
    };
    let file = File::open(archive).map_err(|e| open_error(e.to_string()))?;
    let mut zip = ZipArchive::new(file).map_err(|e| open_error(e.to_string()))?;

    info!(archive = %archive.display(), target = %target.display(), entries = zip.len(), "extracting");

    let mut entries = Vec::with_capacity(zip.len());
    for index in 0..zip.len() {
        if options.is_cancelled() {
            return Err(ExtractError::Cancelled);
        }

        let mut member = zip.by_index(index).map_err(|e| ExtractError::EntryWrite {
            entry:  format!("#{index}"),
            source: io::Error::other(e),
        })?;
        let name = member.name().to_string();
        let entry = ArchiveEntry::classify(&name, &options.executables)?;
        let dest = entry.target_path(target);

        if entry.is_directory {
            perm::create_dir(&dest).map_err(|source| ExtractError::DirectoryCreate {
                entry: name.clone(),
                source,
            })?;
        } else {
            write_file(&mut member, &dest, entry.mode()).map_err(|source| ExtractError::EntryWrite {
                entry: name.clone(),
                source,
            })?;
        }

        debug!(entry = %name, mode = %format!("{:o}", entry.mode()), "extracted");
        entries.push(entry);
    }

    Ok(ExtractReport {
        target: target.to_path_buf(),
        entries,
    })
}

/// [`extract`] on the blocking pool.
pub async fn extract_async(archive: PathBuf, target: PathBuf, options: ExtractOptions) -> Result<ExtractReport> {
    tokio::task::spawn_blocking(move || extract(&archive, &target, &options)).await?
}

fn write_file(reader: &mut impl io::Read, dest: &Path, mode: u32) -> io::Result<()> {
    if let Some(parent) = dest.parent() {
        perm::create_dir(parent)?;
    }

    let mut out = open_for_write(dest, mode)?;
    io::copy(reader, &mut out)?;
    out.sync_all()?;
    drop(out);

    perm::set_mode(dest, mode)
}

fn open_for_write(dest: &Path, mode: u32) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;
    options.open(dest)
}
