//! Persisted set of product URLs a restock notification was already sent for.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::Result;

/// Backing store for already-notified URLs.
///
/// `load` never fails: a missing or unreadable store reads as empty.
pub trait NotificationLedger: Send {
    fn load(&self) -> HashSet<String>;

    /// Replaces the stored set.
    fn save(&mut self, urls: &HashSet<String>) -> Result<()>;

    fn record_sent(&mut self, url: &str) -> Result<()> {
        self.record_all(&[url])
    }

    /// Adds `urls` to the stored set with a single rewrite.
    fn record_all(&mut self, urls: &[&str]) -> Result<()> {
        let mut notified = self.load();
        notified.extend(urls.iter().map(|url| url.to_string()));
        self.save(&notified)
    }
}

/// One URL per line in a plain text file. Order is not preserved.
#[derive(Debug, Clone)]
pub struct FileLedger {
    path: PathBuf,
}

impl FileLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the stored set. A missing file is empty; any other read error is returned.
    pub fn try_load(&self) -> Result<HashSet<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(parse_lines(&contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashSet::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl NotificationLedger for FileLedger {
    fn load(&self) -> HashSet<String> {
        self.try_load().unwrap_or_else(|e| {
            tracing::warn!("Could not read ledger {}: {}", self.path.display(), e);
            HashSet::new()
        })
    }

    /// Merges into the file's current contents. An unreadable file is left untouched.
    fn record_all(&mut self, urls: &[&str]) -> Result<()> {
        let mut notified = self.try_load()?;
        notified.extend(urls.iter().map(|url| url.to_string()));
        self.save(&notified)
    }

    fn save(&mut self, urls: &HashSet<String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut contents = String::new();
        for url in urls {
            contents.push_str(url);
            contents.push('\n');
        }
        fs::write(&self.path, contents)?;
        tracing::debug!("Saved {} URL(s) to {}", urls.len(), self.path.display());
        Ok(())
    }
}

/// Keeps the set in memory only; nothing is persisted.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedger {
    urls: HashSet<String>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_urls<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            urls: urls.into_iter().map(Into::into).collect(),
        }
    }
}

impl NotificationLedger for InMemoryLedger {
    fn load(&self) -> HashSet<String> {
        self.urls.clone()
    }

    fn save(&mut self, urls: &HashSet<String>) -> Result<()> {
        self.urls = urls.clone();
        Ok(())
    }
}

fn parse_lines(contents: &str) -> HashSet<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
