use std::fmt;

/// A progress event emitted while a body is streaming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub downloaded_bytes: u64,
    /// From `content-length`, when present and non-zero.
    pub total_bytes:      Option<u64>,
    /// `ceil(100 * downloaded / total)`, capped at 100.
    pub percent:          Option<u32>,
}

impl Progress {
    /// Human-readable status line.
    pub fn label(&self) -> String { self.to_string() }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.percent {
            Some(percent) => write!(f, "Downloading.. ({percent}%)"),
            None => write!(f, "Downloading.. ({} bytes)", self.downloaded_bytes),
        }
    }
}

/// Per-download progress state.
///
/// Lives only for the duration of one transfer.
#[derive(Debug, Clone, Default)]
pub struct ProgressTracker {
    total:        Option<u64>,
    downloaded:   u64,
    last_percent: Option<u32>,
}

impl ProgressTracker {
    pub fn new(total: Option<u64>) -> Self {
        Self {
            total: total.filter(|t| *t > 0),
            downloaded: 0,
            last_percent: None,
        }
    }

    pub fn downloaded(&self) -> u64 { self.downloaded }

    /// Account for a received chunk. Returns the event to report, if any.
    pub fn advance(&mut self, chunk_len: u64) -> Option<Progress> {
        self.downloaded = self.downloaded.saturating_add(chunk_len);

        let Some(total) = self.total else {
            return Some(Progress {
                downloaded_bytes: self.downloaded,
                total_bytes:      None,
                percent:          None,
            });
        };

        let percent = percent_of(self.downloaded, total);
        if self.last_percent.is_some_and(|last| percent <= last) {
            return None;
        }
        self.last_percent = Some(percent);
        Some(Progress {
            downloaded_bytes: self.downloaded,
            total_bytes:      Some(total),
            percent:          Some(percent),
        })
    }
}

fn percent_of(downloaded: u64, total: u64) -> u32 {
    let scaled = u128::from(downloaded) * 100;
    let percent = scaled.div_ceil(u128::from(total));
    percent.min(100) as u32
}
