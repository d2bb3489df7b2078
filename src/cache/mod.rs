use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

mod compression;
mod key_gen;

pub use compression::{compress_data, decompress_data};
pub use key_gen::generate_cache_key;

/// File cache for raw GitHub responses, keyed by repository.
///
/// Entries expire by file age; expired entries are dropped on read so a
/// stale cache never feeds the dashboard.
pub struct CacheManager {
    cache_dir: PathBuf,
    ttl_hours: u32,
    compression_enabled: bool,
}

impl CacheManager {
    pub fn new(cache_dir: PathBuf, ttl_hours: u32, compression_enabled: bool) -> Self {
        CacheManager {
            cache_dir,
            ttl_hours,
            compression_enabled,
        }
    }

    /// Create the cache directory structure.
    pub fn initialize(&self) -> Result<()> {
        let path = self.cache_dir.join("records");
        fs::create_dir_all(&path)
            .with_context(|| format!("Failed to create cache directory: {:?}", path))?;

        debug!("Cache initialized at {:?}", self.cache_dir);
        Ok(())
    }

    /// Get the cached record list for a repository key.
    pub fn get_records(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.records_path(key);
        self.get_cached_data(&path)
    }

    /// Store the record list for a repository key.
    pub fn store_records(&self, key: &str, data: &[u8]) -> Result<()> {
        let path = self.records_path(key);
        self.cache_data(&path, data)
    }

    /// Drop everything and recreate the empty structure.
    pub fn clear_all(&self) -> Result<()> {
        info!("Clearing cache at {:?}", self.cache_dir);

        if self.cache_dir.exists() {
            fs::remove_dir_all(&self.cache_dir)
                .with_context(|| format!("Failed to clear cache: {:?}", self.cache_dir))?;
        }

        self.initialize()
    }

    fn records_path(&self, key: &str) -> PathBuf {
        self.cache_dir.join("records").join(format!("{}.cache", key))
    }

    fn get_cached_data(&self, path: &Path) -> Result<Option<Vec<u8>>> {
        if !path.exists() {
            return Ok(None);
        }

        let metadata = fs::metadata(path)?;
        if let Ok(modified) = metadata.modified() {
            let age = modified.elapsed().unwrap_or_default();
            let max_age = std::time::Duration::from_secs((self.ttl_hours as u64) * 3600);

            if age > max_age {
                debug!("Cache expired: {:?}", path);
                let _ = fs::remove_file(path);
                return Ok(None);
            }
        }

        let data = fs::read(path).with_context(|| format!("Failed to read cache: {:?}", path))?;

        if self.compression_enabled {
            decompress_data(&data).map(Some)
        } else {
            Ok(Some(data))
        }
    }

    fn cache_data(&self, path: &Path, data: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create cache directory: {:?}", parent))?;
        }

        let data_to_store = if self.compression_enabled {
            compress_data(data)?
        } else {
            data.to_vec()
        };

        fs::write(path, data_to_store)
            .with_context(|| format!("Failed to write cache: {:?}", path))?;

        debug!("Cached data to {:?}", path);
        Ok(())
    }
}
