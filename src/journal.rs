//! Append-only trade journal.
//!
//! Side channel for observability: the engine writes human-readable
//! lines, the status surface serves the tail. Nothing in the decision
//! core ever reads it back, and a failed write never fails a tick.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Local;
use parking_lot::Mutex;
use tracing::warn;

#[derive(Clone)]
pub struct Journal {
    inner: Arc<Inner>,
}

struct Inner {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl Journal {
    pub fn new(path: PathBuf) -> Self {
        Self {
            inner: Arc::new(Inner {
                path,
                write_lock: Mutex::new(()),
            }),
        }
    }

    /// Append one timestamped line. Best-effort: IO errors are logged
    /// and dropped.
    pub fn append(&self, message: &str) {
        let line = format!("[SILVER] {} → {}\n", Local::now().format("%H:%M:%S"), message);

        let _guard = self.inner.write_lock.lock();
        let result = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.inner.path)
            .and_then(|mut f| f.write_all(line.as_bytes()));

        if let Err(e) = result {
            warn!(error = %e, path = %self.inner.path.display(), "journal append failed");
        }
    }

    /// Last `max_chars` characters of the journal, or `None` when the
    /// file does not exist yet.
    pub fn tail(&self, max_chars: usize) -> Option<String> {
        let text = std::fs::read_to_string(&self.inner.path).ok()?;
        if text.len() <= max_chars {
            return Some(text);
        }

        let mut idx = text.len() - max_chars;
        while !text.is_char_boundary(idx) {
            idx += 1;
        }
        Some(text[idx..].to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_journal(tag: &str) -> Journal {
        let path = std::env::temp_dir().join(format!(
            "silverbullet-journal-{}-{tag}.log",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        Journal::new(path)
    }

    #[test]
    fn appended_lines_show_up_in_the_tail() {
        let journal = temp_journal("roundtrip");

        journal.append("armed and hunting");
        journal.append("zone rejected");

        let tail = journal.tail(8000).unwrap();
        assert!(tail.contains("armed and hunting"));
        assert!(tail.contains("zone rejected"));
        assert!(tail.starts_with("[SILVER] "));
    }

    #[test]
    fn tail_is_bounded_and_respects_char_boundaries() {
        let journal = temp_journal("bounded");

        for i in 0..200 {
            journal.append(&format!("line number {i} →"));
        }

        let tail = journal.tail(500).unwrap();
        assert!(tail.len() <= 500);
        // Must not panic on the multi-byte arrow when slicing.
        assert!(tail.contains("line number 199"));
    }

    #[test]
    fn missing_file_yields_none() {
        let journal = temp_journal("missing");
        assert!(journal.tail(8000).is_none());
    }
}
