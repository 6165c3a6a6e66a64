use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::SystemTime;

use super::loader::{DataSources, LoadError, LoadOutcome, load_sources};

// ---------------------------------------------------------------------------
// Source fingerprints
// ---------------------------------------------------------------------------

/// Cheap identity of a file: what `stat` reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SourceStat {
    modified: Option<SystemTime>,
    len: u64,
}

impl SourceStat {
    fn read(path: &Path) -> Result<Self, LoadError> {
        let meta = std::fs::metadata(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(SourceStat {
            modified: meta.modified().ok(),
            len: meta.len(),
        })
    }
}

/// Stat plus content hash. The hash is only recomputed when the stat changes.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Fingerprint {
    stat: SourceStat,
    hash: blake3::Hash,
}

impl Fingerprint {
    fn compute(path: &Path, stat: SourceStat) -> Result<Self, LoadError> {
        let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Fingerprint {
            stat,
            hash: blake3::hash(&bytes),
        })
    }
}

struct Entry {
    primary: Fingerprint,
    reference: Option<Fingerprint>,
    outcome: Arc<LoadOutcome>,
}

impl Entry {
    fn stat_matches(&self, primary: &SourceStat, reference: Option<&SourceStat>) -> bool {
        self.primary.stat == *primary && self.reference.as_ref().map(|f| &f.stat) == reference
    }

    fn content_matches(&self, primary: &Fingerprint, reference: Option<&Fingerprint>) -> bool {
        self.primary.hash == primary.hash
            && self.reference.as_ref().map(|f| f.hash) == reference.map(|f| f.hash)
    }
}

// ---------------------------------------------------------------------------
// LoadCache
// ---------------------------------------------------------------------------

/// Counters for cache behaviour.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the cache (stat or content match).
    pub hits: u64,
    /// Lookups for sources never loaded before.
    pub misses: u64,
    /// Lookups that found a stale entry and loaded again.
    pub reloads: u64,
}

/// Memoised loads keyed by [`DataSources`].
///
/// A lookup stats every source; an unchanged mtime and length is a hit with no
/// read. A changed stat triggers a content hash, and only a changed hash
/// reloads. Outcomes are immutable and handed out as `Arc` clones, so the
/// cache can be shared between sessions behind an `Arc<LoadCache>`.
#[derive(Default)]
pub struct LoadCache {
    entries: RwLock<HashMap<DataSources, Entry>>,
    hits: AtomicU64,
    misses: AtomicU64,
    reloads: AtomicU64,
}

impl LoadCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached outcome for `sources`, loading it when absent or stale.
    pub fn get_or_load(&self, sources: &DataSources) -> Result<Arc<LoadOutcome>, LoadError> {
        let primary_stat = SourceStat::read(&sources.primary)?;
        let reference_stat = sources
            .reference
            .as_deref()
            .map(SourceStat::read)
            .transpose()?;

        {
            let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(entry) = entries.get(sources) {
                if entry.stat_matches(&primary_stat, reference_stat.as_ref()) {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    log::debug!("Load cache hit for {}", sources.primary.display());
                    return Ok(Arc::clone(&entry.outcome));
                }
            }
        }

        let primary = Fingerprint::compute(&sources.primary, primary_stat)?;
        let reference = match (sources.reference.as_deref(), reference_stat) {
            (Some(path), Some(stat)) => Some(Fingerprint::compute(path, stat)?),
            _ => None,
        };

        {
            let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
            match entries.get_mut(sources) {
                Some(entry) if entry.content_matches(&primary, reference.as_ref()) => {
                    log::debug!(
                        "Sources touched but unchanged, keeping cached load of {}",
                        sources.primary.display()
                    );
                    entry.primary = primary;
                    entry.reference = reference;
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    return Ok(Arc::clone(&entry.outcome));
                }
                Some(_) => {
                    log::info!("Sources changed, reloading {}", sources.primary.display());
                    self.reloads.fetch_add(1, Ordering::Relaxed);
                }
                None => {
                    log::debug!("Load cache miss for {}", sources.primary.display());
                    self.misses.fetch_add(1, Ordering::Relaxed);
                }
            }
        }

        let outcome = Arc::new(load_sources(sources)?);
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                sources.clone(),
                Entry {
                    primary,
                    reference,
                    outcome: Arc::clone(&outcome),
                },
            );
        Ok(outcome)
    }

    /// Drop the entry for `sources`; the next lookup loads from disk.
    pub fn invalidate(&self, sources: &DataSources) -> bool {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(sources)
            .is_some()
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            reloads: self.reloads.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{File, OpenOptions};
    use std::path::PathBuf;
    use std::time::Duration;

    use anyhow::Result;
    use tempfile::tempdir;

    const HEADER: &str = "Building,Timestamp,CTR01_BuildingEnergy_kWhHourly(kW-hr)\n";

    fn write_energy(path: &Path, rows: &str) -> Result<()> {
        std::fs::write(path, format!("{HEADER}{rows}"))?;
        Ok(())
    }

    /// Move the mtime forward so the change is visible even on coarse clocks.
    fn bump_mtime(path: &Path, secs: u64) -> Result<()> {
        let file: File = OpenOptions::new().write(true).open(path)?;
        file.set_modified(SystemTime::now() + Duration::from_secs(secs))?;
        Ok(())
    }

    fn sources(path: &Path) -> DataSources {
        DataSources::new(PathBuf::from(path), None)
    }

    #[test]
    fn repeated_lookup_shares_the_same_outcome() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("energy.csv");
        write_energy(&path, "A,2024-01-01 00:00,1\n")?;
        let cache = LoadCache::new();

        let first = cache.get_or_load(&sources(&path))?;
        let second = cache.get_or_load(&sources(&path))?;

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 1, reloads: 0 });
        assert_eq!(cache.len(), 1);
        Ok(())
    }

    #[test]
    fn changed_content_reloads() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("energy.csv");
        write_energy(&path, "A,2024-01-01 00:00,1\n")?;
        let cache = LoadCache::new();

        let before = cache.get_or_load(&sources(&path))?;
        write_energy(&path, "A,2024-01-01 00:00,1\nB,2024-01-01 00:00,2\n")?;
        bump_mtime(&path, 10)?;
        let after = cache.get_or_load(&sources(&path))?;

        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(before.table.len(), 1);
        assert_eq!(after.table.len(), 2);
        assert_eq!(cache.stats().reloads, 1);
        Ok(())
    }

    #[test]
    fn touched_but_identical_content_is_a_hit() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("energy.csv");
        write_energy(&path, "A,2024-01-01 00:00,1\n")?;
        let cache = LoadCache::new();

        let before = cache.get_or_load(&sources(&path))?;
        bump_mtime(&path, 20)?;
        let after = cache.get_or_load(&sources(&path))?;

        assert!(Arc::ptr_eq(&before, &after));
        assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 1, reloads: 0 });
        Ok(())
    }

    #[test]
    fn reference_is_part_of_the_key() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("energy.csv");
        let zones = dir.path().join("zones.csv");
        write_energy(&path, "A,2024-01-01 00:00,1\n")?;
        std::fs::write(&zones, "Building Name,Climate zone,Peak load,Base load,Area\nA,Z1,2,1,10\n")?;
        let cache = LoadCache::new();

        let plain = cache.get_or_load(&sources(&path))?;
        let joined = cache.get_or_load(&DataSources::new(&path, Some(zones)))?;

        assert!(!Arc::ptr_eq(&plain, &joined));
        assert_eq!(joined.table.rows[0].climate_zone.as_deref(), Some("Z1"));
        assert_eq!(cache.stats().misses, 2);
        Ok(())
    }

    #[test]
    fn invalidate_forces_a_fresh_load() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("energy.csv");
        write_energy(&path, "A,2024-01-01 00:00,1\n")?;
        let cache = LoadCache::new();

        let first = cache.get_or_load(&sources(&path))?;
        assert!(cache.invalidate(&sources(&path)));
        assert!(!cache.invalidate(&sources(&path)));
        let second = cache.get_or_load(&sources(&path))?;

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(cache.stats().misses, 2);

        cache.clear();
        assert!(cache.is_empty());
        Ok(())
    }

    #[test]
    fn failed_load_is_not_cached() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("energy.csv");
        std::fs::write(&path, "Building,Timestamp\nA,2024-01-01\n")?;
        let cache = LoadCache::new();

        assert!(cache.get_or_load(&sources(&path)).is_err());
        assert!(cache.is_empty());
        assert!(matches!(
            cache.get_or_load(&sources(&dir.path().join("missing.csv"))),
            Err(LoadError::Io { .. })
        ));
        Ok(())
    }

    #[test]
    fn cache_is_shareable_across_threads() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("energy.csv");
        write_energy(&path, "A,2024-01-01 00:00,1\n")?;
        let cache = Arc::new(LoadCache::new());
        let first = cache.get_or_load(&sources(&path))?;

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let src = sources(&path);
                std::thread::spawn(move || cache.get_or_load(&src).map(|o| o.table.len()))
            })
            .collect();
        for handle in handles {
            let len = handle.join().expect("reader thread panicked")?;
            assert_eq!(len, first.table.len());
        }
        Ok(())
    }
}
