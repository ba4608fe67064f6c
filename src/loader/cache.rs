use crate::error::Result;
use crate::loader::{load_with_report, LoadedDataset};
use crate::readers::StationFileReader;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use tracing::debug;

/// Identity of a source file: where it is, when it was last written and how big it is.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceKey {
    pub path: PathBuf,
    pub modified: Option<SystemTime>,
    pub len: u64,
}

impl SourceKey {
    pub fn from_path(path: &Path) -> Result<Self> {
        let path = path.canonicalize()?;
        let metadata = std::fs::metadata(&path)?;

        Ok(Self {
            path,
            modified: metadata.modified().ok(),
            len: metadata.len(),
        })
    }
}

/// Memoizes load-and-clean per source identity.
///
/// A file that changes on disk gets a new key, so the next lookup reloads it and drops the
/// stale entry for the same path.
pub struct DatasetCache {
    reader: StationFileReader,
    entries: HashMap<SourceKey, Arc<LoadedDataset>>,
    hits: usize,
    misses: usize,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::with_reader(StationFileReader::new())
    }

    pub fn with_reader(reader: StationFileReader) -> Self {
        Self {
            reader,
            entries: HashMap::new(),
            hits: 0,
            misses: 0,
        }
    }

    pub fn get_or_load(&mut self, path: &Path) -> Result<Arc<LoadedDataset>> {
        let key = SourceKey::from_path(path)?;

        if let Some(dataset) = self.entries.get(&key) {
            self.hits += 1;
            debug!(path = %key.path.display(), "Dataset cache hit");
            return Ok(Arc::clone(dataset));
        }

        self.misses += 1;
        let stale = self.invalidate_key_path(&key.path);
        debug!(path = %key.path.display(), stale, "Dataset cache miss");

        let dataset = Arc::new(load_with_report(&key.path, &self.reader)?);
        self.entries.insert(key, Arc::clone(&dataset));

        Ok(dataset)
    }

    /// Drop any cached entry for `path`. Returns how many entries were removed.
    pub fn invalidate(&mut self, path: &Path) -> usize {
        let path = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        self.invalidate_key_path(&path)
    }

    fn invalidate_key_path(&mut self, path: &Path) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| key.path != path);
        before - self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn misses(&self) -> usize {
        self.misses
    }
}

impl Default for DatasetCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const CSV: &str = "year,month,day,hour,PM2.5,PM10,SO2,NO2,CO,O3,WSPM\n\
                       2013,3,1,0,NA,10,1,1,1,1,1\n\
                       2013,3,1,1,20,10,1,1,1,1,1\n\
                       2013,3,1,2,40,10,1,1,1,1,1\n";

    #[test]
    fn test_second_lookup_is_a_hit() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        file.write_all(CSV.as_bytes())?;
        file.flush()?;

        let mut cache = DatasetCache::new();
        let first = cache.get_or_load(file.path())?;
        let second = cache.get_or_load(file.path())?;

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!((cache.hits(), cache.misses()), (1, 1));
        assert_eq!(cache.len(), 1);
        Ok(())
    }

    #[test]
    fn test_invalidate_forces_reload() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        file.write_all(CSV.as_bytes())?;
        file.flush()?;

        let mut cache = DatasetCache::new();
        let first = cache.get_or_load(file.path())?;
        assert_eq!(cache.invalidate(file.path()), 1);
        assert!(cache.is_empty());

        let reloaded = cache.get_or_load(file.path())?;
        assert!(!Arc::ptr_eq(&first, &reloaded));
        assert_eq!(first.table, reloaded.table);
        assert_eq!(cache.misses(), 2);
        Ok(())
    }

    #[test]
    fn test_changed_file_replaces_stale_entry() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        file.write_all(CSV.as_bytes())?;
        file.flush()?;

        let mut cache = DatasetCache::new();
        let first = cache.get_or_load(file.path())?;
        assert_eq!(first.table.len(), 3);

        // Length changes even if the mtime resolution is coarse
        writeln!(file, "2013,3,1,3,50,10,1,1,1,1,1")?;
        file.flush()?;

        let second = cache.get_or_load(file.path())?;
        assert_eq!(second.table.len(), 4);
        assert_eq!(cache.len(), 1);
        Ok(())
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let mut cache = DatasetCache::new();
        let result = cache.get_or_load(Path::new("/definitely/not/here.csv"));
        assert!(matches!(result, Err(crate::error::ProcessingError::Io(_))));
    }
}
