//! File path generation and organization
//!
//! Items are written to `{root}/{year}/{filename}` or
//! `{root}/other/{filename}`. The existence check additionally probes a
//! fixed list of legacy buckets and the flat root, so files organized
//! before the bucket scheme are still recognized.

use std::path::{Path, PathBuf};

use crate::app::models::Item;
use crate::constants::files;

/// Path generation utility for output files
pub struct PathGenerator;

impl PathGenerator {
    /// Bucket directory an item is written to
    pub fn bucket_dir(root: &Path, item: &Item) -> PathBuf {
        root.join(item.bucket())
    }

    /// Final path an item is written to
    pub fn file_path(root: &Path, item: &Item) -> PathBuf {
        Self::bucket_dir(root, item).join(item.filename())
    }

    /// Sibling temporary path used while streaming
    pub fn temp_path(final_path: &Path) -> PathBuf {
        let mut name = final_path.as_os_str().to_owned();
        name.push(files::TEMP_FILE_SUFFIX);
        PathBuf::from(name)
    }

    /// Locations probed by the existence check, in order
    ///
    /// Only the hardcoded legacy buckets are probed, then the root. A file
    /// written to a bucket outside that list is not found here.
    pub fn existence_candidates(root: &Path, filename: &str) -> Vec<PathBuf> {
        files::LEGACY_BUCKETS
            .iter()
            .map(|bucket| root.join(bucket).join(filename))
            .chain(std::iter::once(root.join(filename)))
            .collect()
    }
}
