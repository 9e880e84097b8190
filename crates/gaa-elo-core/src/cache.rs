//! Memoized loaders keyed by workbook contents.
//!
//! A workbook's bytes are read and hashed on every request; the sheets are only
//! parsed when no entry exists for that (path, hash, parameters) triple, so an
//! edited file never serves a stale table.

use std::collections::BTreeSet;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use blake3::Hasher;
use gaa_elo_parser::{content_hash, Workbook};
use lru::LruCache;
use tracing::debug;

use crate::config::SportConfig;
use crate::error::Result;
use crate::match_detail::load_match_detail;
use crate::summary::load_summary;
use crate::types::{MatchTable, SummaryTable};

pub const DEFAULT_CAPACITY: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub path: PathBuf,
    pub content_hash: String,
    pub parameters: String,
}

/// Both tables of one sport, loaded together.
#[derive(Debug, Clone)]
pub struct SportData {
    pub summary: Arc<SummaryTable>,
    pub matches: Arc<MatchTable>,
}

pub struct LoadCache {
    summaries: Mutex<LruCache<CacheKey, Arc<SummaryTable>>>,
    details: Mutex<LruCache<CacheKey, Arc<MatchTable>>>,
}

impl Default for LoadCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl LoadCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            summaries: Mutex::new(LruCache::new(capacity)),
            details: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn summary(&self, sport: &SportConfig) -> Result<Arc<SummaryTable>> {
        let bytes = std::fs::read(&sport.workbook)?;
        let key = cache_key(&sport.workbook, &bytes, sport, None);

        if let Some(hit) = lock(&self.summaries).get(&key).cloned() {
            debug!(sport = %sport.name, hash = %key.content_hash, "Summary cache hit");
            return Ok(hit);
        }
        debug!(sport = %sport.name, hash = %key.content_hash, "Summary cache miss");

        let mut workbook = Workbook::from_bytes(bytes)?;
        let table = Arc::new(load_summary(&mut workbook, sport)?);
        lock(&self.summaries).put(key, Arc::clone(&table));
        Ok(table)
    }

    pub fn match_detail(
        &self,
        sport: &SportConfig,
        known_teams: &BTreeSet<String>,
    ) -> Result<Arc<MatchTable>> {
        let bytes = std::fs::read(&sport.workbook)?;
        let key = cache_key(&sport.workbook, &bytes, sport, Some(known_teams));

        if let Some(hit) = lock(&self.details).get(&key).cloned() {
            debug!(sport = %sport.name, hash = %key.content_hash, "Match detail cache hit");
            return Ok(hit);
        }
        debug!(sport = %sport.name, hash = %key.content_hash, "Match detail cache miss");

        let mut workbook = Workbook::from_bytes(bytes)?;
        let table = Arc::new(load_match_detail(&mut workbook, sport, known_teams)?);
        lock(&self.details).put(key, Arc::clone(&table));
        Ok(table)
    }

    /// Loads the summary, then the match detail using the summary's teams.
    pub fn sport_data(&self, sport: &SportConfig) -> Result<SportData> {
        let summary = self.summary(sport)?;
        let matches = self.match_detail(sport, &summary.teams())?;
        Ok(SportData { summary, matches })
    }

    pub fn len(&self) -> usize {
        lock(&self.summaries).len() + lock(&self.details).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        lock(&self.summaries).clear();
        lock(&self.details).clear();
    }
}

pub fn cache_key(
    path: &Path,
    contents: &[u8],
    sport: &SportConfig,
    known_teams: Option<&BTreeSet<String>>,
) -> CacheKey {
    let mut hasher = Hasher::new();
    hasher.update(format!("{sport:?}").as_bytes());
    if let Some(teams) = known_teams {
        for team in teams {
            hasher.update(b"\0");
            hasher.update(team.as_bytes());
        }
    }
    CacheKey {
        path: path.to_path_buf(),
        content_hash: content_hash(contents),
        parameters: hasher.finalize().to_hex().to_string(),
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
